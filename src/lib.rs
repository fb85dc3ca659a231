//! # Component Tree Library
//!
//! This library resolves typed metadata components from a tree of source
//! files. A component is a named, typed unit of configuration backed by an
//! optional XML descriptor and optional bulk content, and may decompose into
//! child components.
//!
//! ## Quick Example
//!
//! ```
//! use component_tree::component::{ComponentArena, ComponentProperties, FileFormat};
//! use component_tree::filesystem::VirtualTree;
//! use component_tree::ignore_file::IgnoreFile;
//! use component_tree::registry::Registry;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let registry = Registry::from_yaml_str(r#"
//! types:
//!   apexclass:
//!     name: ApexClass
//!     directoryName: classes
//!     suffix: cls
//! "#).unwrap();
//!
//! let tree = VirtualTree::from_file_paths(["app/classes/Foo.cls", "app/classes/Foo.cls-meta.xml"]);
//! let apex_class = registry.get_type_by_name("ApexClass").unwrap().clone();
//!
//! let mut arena = ComponentArena::new();
//! let foo = arena.add(
//!     ComponentProperties::new("Foo", apex_class)
//!         .with_xml("app/classes/Foo.cls-meta.xml")
//!         .with_content("app/classes/Foo.cls"),
//!     Arc::new(tree),
//!     Arc::new(IgnoreFile::default()),
//! );
//!
//! assert_eq!(
//!     arena.package_relative_path(foo, Path::new("app/classes/Foo.cls"), FileFormat::Source),
//!     Path::new("main/default/classes/Foo.cls")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Registry (`registry`)**: per-type layout rules (directory, suffix,
//!   folder flags, children schema), loaded from YAML or JSON.
//! - **Tree containers (`filesystem`)**: the read-only file tree the resolver
//!   works against, either the local disk or an in-memory tree.
//! - **Ignore rules (`ignore_file`)**: gitignore-style patterns that hide
//!   files and directories from every walk.
//! - **Descriptors (`descriptor`)**: XML decoded into a `serde_json::Value`
//!   tree, and the routing that slices a nested child out of its parent's file.
//! - **Components (`component`)**: the arena of resolved components, child
//!   discovery, full names, packaged paths and deletion marking.

pub mod component;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod filesystem;
pub mod ignore_file;
pub mod path;
pub mod registry;
pub mod walk;

#[cfg(test)]
mod path_proptest;
