//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a registry fixture, in-memory trees and an on-disk
//! project fixture, to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let registry = registry();
//!     let object = object_type(&registry);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

use component_tree::registry::{MetadataType, Registry};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::descriptors;
    pub use super::{labels_type, object_type, registry, ProjectFixture, REGISTRY_YAML};
}

/// Registry used across the integration tests.
///
/// `CustomObject` decomposes into field and record type files;
/// `CustomLabels` holds its labels as nested elements.
pub const REGISTRY_YAML: &str = r#"
types:
  apexclass:
    name: ApexClass
    directoryName: classes
    suffix: cls
  customobject:
    name: CustomObject
    directoryName: objects
    suffix: object
    children:
      types:
        customfield:
          name: CustomField
          directoryName: fields
          suffix: field
        recordtype:
          name: RecordType
          directoryName: recordTypes
          suffix: recordType
      suffixes:
        field: customfield
        recordType: recordtype
  customlabels:
    name: CustomLabels
    directoryName: labels
    suffix: labels
    children:
      types:
        customlabel:
          name: CustomLabel
          directoryName: labels
          suffix: label
          xmlElementName: labels
          uniqueIdElement: fullName
  report:
    name: Report
    directoryName: reports
    suffix: report
    inFolder: true
  staticresource:
    name: StaticResource
    directoryName: staticresources
    suffix: resource
"#;

/// Descriptor file contents.
#[allow(dead_code)]
pub mod descriptors {
    pub const ACCOUNT_OBJECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Account</label>
</CustomObject>
"#;

    pub const NAME_FIELD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomField xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>Name__c</fullName>
    <length>80</length>
</CustomField>
"#;

    pub const CUSTOM_LABELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomLabels xmlns="http://soap.sforce.com/2006/04/metadata">
    <labels>
        <fullName>x</fullName>
        <language>en_US</language>
        <value>Label X</value>
    </labels>
    <labels>
        <fullName>y</fullName>
        <language>en_US</language>
        <value>Label Y</value>
    </labels>
</CustomLabels>
"#;

    pub const APEX_CLASS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ApexClass xmlns="http://soap.sforce.com/2006/04/metadata">
    <apiVersion>60.0</apiVersion>
    <status>Active</status>
</ApexClass>
"#;
}

/// Parse [`REGISTRY_YAML`].
pub fn registry() -> Registry {
    Registry::from_yaml_str(REGISTRY_YAML).expect("Test registry should parse")
}

/// The `CustomObject` type from the test registry.
#[allow(dead_code)]
pub fn object_type(registry: &Registry) -> MetadataType {
    registry
        .get_type_by_name("CustomObject")
        .expect("CustomObject registered")
        .clone()
}

/// The `CustomLabels` type from the test registry.
#[allow(dead_code)]
pub fn labels_type(registry: &Registry) -> MetadataType {
    registry
        .get_type_by_name("CustomLabels")
        .expect("CustomLabels registered")
        .clone()
}

/// A project directory on disk with a registry file.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = ProjectFixture::new()
///     .with_file("classes/Foo.cls", "public class Foo {}");
///
/// fixture
///     .command()
///     .args(["tree", "--type", "ApexClass"])
///     .arg("--content")
///     .arg(fixture.child_path("classes/Foo.cls"))
///     .assert()
///     .success();
/// ```
#[allow(dead_code)]
pub struct ProjectFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl ProjectFixture {
    /// Create a fixture holding only `registry.yaml`.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("registry.yaml")
            .write_str(REGISTRY_YAML)
            .expect("Failed to write registry file");
        Self { temp_dir }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a file inside the fixture.
    pub fn child_path(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Get the path to the registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.child_path("registry.yaml")
    }

    /// Create a command for the binary, run in the fixture with its registry.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("component-tree");
        cmd.current_dir(self.path())
            .env("COMPONENT_TREE_REGISTRY", self.registry_path())
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_fixture_parses() {
        let registry = registry();
        assert_eq!(registry.types.len(), 5);
        assert!(registry.get_type_by_suffix("labels").is_some());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = ProjectFixture::new().with_file("classes/Foo.cls", "class Foo {}");
        assert!(fixture.registry_path().exists());
        assert!(fixture.child_path("classes/Foo.cls").exists());
    }
}
