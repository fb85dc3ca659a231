//! # Paths Command Implementation
//!
//! This module implements the `paths` subcommand, which lists every file of a
//! component (its descriptor, its content and the descriptors of decomposed
//! children) next to the path the file takes in packaged output.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::{resolve_root, ComponentArgs};
use component_tree::component::{ComponentArena, ComponentId, FileFormat};

/// List a component's files with their packaged paths
#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub component: ComponentArgs,

    /// Packaging layout to compute paths for.
    #[arg(short, long, value_enum, default_value = "source")]
    pub format: Format,
}

/// Packaging layouts selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Nested under the package root
    Source,
    /// Flat
    Metadata,
}

impl From<Format> for FileFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Source => FileFormat::Source,
            Format::Metadata => FileFormat::Metadata,
        }
    }
}

/// Execute the `paths` command.
pub fn execute(args: PathsArgs) -> Result<()> {
    let (mut arena, root) = resolve_root(&args.component)?;
    let children = arena
        .get_children(root)
        .map_err(|e| anyhow::anyhow!("Failed to resolve children: {}", e))?;

    for (source, packaged) in collect_paths(&arena, root, &children, args.format.into())? {
        println!("{} -> {}", source.display(), packaged.display());
    }
    Ok(())
}

/// Pair every file of the component with its packaged path
fn collect_paths(
    arena: &ComponentArena,
    root: ComponentId,
    children: &[ComponentId],
    format: FileFormat,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let component = &arena[root];
    let mut files: Vec<(ComponentId, PathBuf)> = Vec::new();
    if let Some(xml) = component.xml() {
        files.push((root, xml.to_path_buf()));
    }
    for child in children {
        // Nested children live in the root's descriptor
        if let Some(xml) = arena[*child].xml().filter(|xml| Some(*xml) != component.xml()) {
            files.push((*child, xml.to_path_buf()));
        }
    }
    for path in component.walk_content()? {
        if !files.iter().any(|(_, listed)| *listed == path) {
            files.push((root, path));
        }
    }

    Ok(files
        .into_iter()
        .map(|(id, path)| {
            let packaged = arena.package_relative_path(id, &path, format);
            (path, packaged)
        })
        .collect())
}
