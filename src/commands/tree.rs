//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which resolves a root
//! component and its children and displays them hierarchically by full name.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use super::{resolve_root, ComponentArgs};
use component_tree::component::{ComponentArena, ComponentId};

/// Display a component and its children
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub component: ComponentArgs,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let (mut arena, root) = resolve_root(&args.component)?;
    let children = arena
        .get_children(root)
        .map_err(|e| anyhow::anyhow!("Failed to resolve children: {}", e))?;

    let tree_root = build_tree_node(&arena, root, &children);
    print_tree(&tree_root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

fn label(arena: &ComponentArena, id: ComponentId) -> String {
    format!("{} ({})", arena.full_name(id), arena[id].metadata_type().name)
}

/// Build the display tree for a root component and its children
fn build_tree_node(arena: &ComponentArena, root: ComponentId, children: &[ComponentId]) -> TreeNode {
    TreeNode {
        label: label(arena, root),
        children: children
            .iter()
            .map(|child| TreeNode {
                label: label(arena, *child),
                children: vec![],
            })
            .collect(),
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
