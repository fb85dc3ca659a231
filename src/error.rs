//! # Error Handling
//!
//! This module defines the centralized error type for component resolution.
//! It uses `thiserror` to build a single `Error` enum covering every failure
//! the resolver can surface, each variant carrying enough context (paths,
//! type names) to diagnose the problem without a debugger.
//!
//! ## Failure Classes
//!
//! - **Structural mismatch**: a discovered child is not a declared child type
//!   of its parent (`UnexpectedChildType`). Discovery fails as a whole.
//! - **Read failure**: propagated unchanged from the tree container (`Io`,
//!   `PathNotFound`). Never retried.
//! - **Malformed descriptor**: the descriptor bytes are not valid UTF-8 or not
//!   well-formed XML (`MalformedDescriptor`).
//! - **Configuration**: registry files and ignore patterns that cannot be
//!   loaded (`Registry`, `Yaml`, `Json`, `Ignore`, `UnknownType`).
//!
//! The `Result` alias is used throughout the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for component resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A child discovered under a parent component is not one of the parent's
    /// declared child types.
    ///
    /// Typically caused by an unrelated component type placed inside the
    /// directory of a decomposed parent.
    #[error("Unexpected child metadata [{}] found for parent type [{parent_type}]", path.display())]
    UnexpectedChildType { path: PathBuf, parent_type: String },

    /// A descriptor file could not be decoded.
    #[error("Malformed descriptor {}: {message}", path.display())]
    MalformedDescriptor { path: PathBuf, message: String },

    /// A path does not exist in the tree container.
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// The type registry is internally inconsistent.
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// A type name could not be resolved against the registry.
    #[error("Unknown metadata type: {name}")]
    UnknownType { name: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// An invalid ignore pattern, wrapped from `ignore::Error`.
    #[error("Ignore pattern error: {0}")]
    Ignore(#[from] ignore::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
