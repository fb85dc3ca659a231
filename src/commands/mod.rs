//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `component-tree` command-line tool. Each subcommand is defined in its own
//! file and exposes an `Args` struct (derived with `clap`) and an `execute`
//! function.
//!
//! Both commands resolve a single root component from the local filesystem,
//! described by the shared [`ComponentArgs`].

pub mod paths;
pub mod tree;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use component_tree::component::{ComponentArena, ComponentId, ComponentProperties};
use component_tree::defaults::REGISTRY_ENV_VAR;
use component_tree::path::base_name;
use component_tree::registry::Registry;

/// Arguments locating the root component
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Registry file describing the metadata types (YAML, or JSON by extension).
    #[arg(short, long, value_name = "FILE", env = REGISTRY_ENV_VAR)]
    pub registry: PathBuf,

    /// Type of the root component, by id or name.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub metadata_type: String,

    /// Descriptor file of the component.
    #[arg(long, value_name = "FILE")]
    pub xml: Option<PathBuf>,

    /// Content file or directory of the component.
    #[arg(long, value_name = "PATH")]
    pub content: Option<PathBuf>,

    /// Component name.
    ///
    /// Defaults to the base name of the descriptor, or of the content path.
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Load the registry and add the described component to a fresh arena
pub fn resolve_root(args: &ComponentArgs) -> Result<(ComponentArena, ComponentId)> {
    let registry = Registry::from_file(&args.registry).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load registry from {}: {}",
            args.registry.display(),
            e
        )
    })?;
    let metadata_type = registry.require_type(&args.metadata_type)?.clone();

    let name = match (&args.name, &args.xml, &args.content) {
        (Some(name), _, _) => name.clone(),
        (None, Some(xml), _) => base_name(xml),
        (None, None, Some(content)) => base_name(content),
        (None, None, None) => anyhow::bail!("Either --xml or --content is required"),
    };

    let mut props = ComponentProperties::new(name, metadata_type);
    props.xml = args.xml.clone();
    props.content = args.content.clone();

    let mut arena = ComponentArena::new();
    let root = arena.add_on_disk(props)?;
    Ok((arena, root))
}
