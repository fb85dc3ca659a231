//! Default values shared across the resolver.
//!
//! Centralizes the constants that shape packaged output and ignore handling,
//! so the library and the CLI agree on them.

/// Package directory that prefixes every path in the source layout.
pub const DEFAULT_PACKAGE_ROOT: &str = "main/default";

/// Name of the ignore file searched for by [`crate::ignore_file::IgnoreFile::find_and_create`].
pub const IGNORE_FILE_NAME: &str = ".forceignore";

/// Patterns applied ahead of the contents of every loaded ignore file.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/*.dup",
    "**/.*",
    "**/package2-descriptor.json",
    "**/package2-manifest.json",
];

/// Suffix shared by every descriptor file name (`<name>.<suffix>-meta.xml`).
pub const DESCRIPTOR_FILE_SUFFIX: &str = "-meta.xml";

/// Environment variable naming the registry file used by the CLI.
pub const REGISTRY_ENV_VAR: &str = "COMPONENT_TREE_REGISTRY";
