//! # Metadata Type Registry
//!
//! This module defines the schema entries that tell the resolver how each
//! component type is laid out on disk, and the [`Registry`] that loads them
//! from a YAML or JSON file.
//!
//! ## Key Components
//!
//! - **`MetadataType`**: one type's layout rules: directory name, file suffix,
//!   folder flags, naming flags and an optional children schema.
//!
//! - **`ChildrenSchema`**: the child types a type decomposes into, plus either
//!   a suffix → child type mapping (children live in their own descriptor
//!   files) or per-child `xmlElementName`/`uniqueIdElement` locators (children
//!   are nested elements of the parent's descriptor).
//!
//! - **`Registry`**: all known types keyed by id, with a suffix index.
//!
//! ## File Format
//!
//! ```yaml
//! types:
//!   customlabels:
//!     name: CustomLabels
//!     directoryName: labels
//!     suffix: labels
//!     children:
//!       types:
//!         customlabel:
//!           name: CustomLabel
//!           directoryName: labels
//!           suffix: label
//!           xmlElementName: labels
//!           uniqueIdElement: fullName
//! ```
//!
//! Type ids may be omitted; they default to the key they are declared under.
//! The `suffixes` index may be omitted; it is derived from the top-level types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Layout rules for one component type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataType {
    /// Registry key, lowercase by convention
    #[serde(default)]
    pub id: String,
    /// Type name, also the root element of the type's descriptor
    pub name: String,
    /// Directory the type's files live under in packaged output
    pub directory_name: String,
    /// Descriptor suffix (`<name>.<suffix>-meta.xml`); absent for bundle-like types
    #[serde(default)]
    pub suffix: Option<String>,
    /// Components of this type live inside a named folder
    #[serde(default)]
    pub in_folder: bool,
    /// Id of the folder type this type is organized by
    #[serde(default)]
    pub folder_type: Option<String>,
    /// Set on folder types: the id of the type they contain
    #[serde(default)]
    pub folder_content_type: Option<String>,
    #[serde(default)]
    pub children: Option<ChildrenSchema>,
    /// Element name of this type when nested in a parent descriptor
    #[serde(default)]
    pub xml_element_name: Option<String>,
    /// Field identifying one nested element among its siblings
    #[serde(default)]
    pub unique_id_element: Option<String>,
    /// The full name is always the type name
    #[serde(default)]
    pub ignore_parsed_full_name: bool,
    /// Children are not prefixed with their parent's full name
    #[serde(default)]
    pub ignore_parent_name: bool,
    /// Whether components appear in manifests; absent means yes
    #[serde(default)]
    pub is_addressable: Option<bool>,
}

impl MetadataType {
    /// A plain type with a name, directory and optional suffix
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        directory_name: impl Into<String>,
        suffix: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            directory_name: directory_name.into(),
            suffix: suffix.map(str::to_string),
            in_folder: false,
            folder_type: None,
            folder_content_type: None,
            children: None,
            xml_element_name: None,
            unique_id_element: None,
            ignore_parsed_full_name: false,
            ignore_parent_name: false,
            is_addressable: None,
        }
    }

    pub fn is_addressable(&self) -> bool {
        self.is_addressable != Some(false)
    }

    /// Element name used when this type is nested in a parent descriptor
    pub fn nested_element_name(&self) -> &str {
        self.xml_element_name
            .as_deref()
            .unwrap_or(&self.directory_name)
    }

    /// Fill missing ids from their map keys, recursively
    fn assign_ids(&mut self, key: &str) {
        if self.id.is_empty() {
            self.id = key.to_string();
        }
        if let Some(children) = &mut self.children {
            for (child_key, child) in children.types.iter_mut() {
                child.assign_ids(child_key);
            }
        }
    }
}

/// The child types a type decomposes into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenSchema {
    /// Child types keyed by id
    pub types: BTreeMap<String, MetadataType>,
    /// Descriptor suffix → child type id, for children with their own files
    #[serde(default)]
    pub suffixes: BTreeMap<String, String>,
}

impl ChildrenSchema {
    /// The child type id a descriptor suffix maps to
    pub fn type_id_for_suffix(&self, suffix: &str) -> Option<&str> {
        self.suffixes.get(suffix).map(String::as_str)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }
}

/// All known component types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub types: BTreeMap<String, MetadataType>,
    /// Descriptor suffix → top-level type id
    #[serde(default)]
    pub suffixes: BTreeMap<String, String>,
}

impl Registry {
    /// Build a registry from types, deriving ids and the suffix index
    pub fn new(types: impl IntoIterator<Item = MetadataType>) -> Result<Self> {
        let types = types
            .into_iter()
            .map(|metadata_type| (metadata_type.id.clone(), metadata_type))
            .collect();
        Self {
            types,
            suffixes: BTreeMap::new(),
        }
        .finish()
    }

    /// Parse a registry from YAML
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        serde_yaml::from_str::<Self>(yaml_content)?.finish()
    }

    /// Parse a registry from JSON
    pub fn from_json_str(json_content: &str) -> Result<Self> {
        serde_json::from_str::<Self>(json_content)?.finish()
    }

    /// Load a registry file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Look up a type by id or name, ignoring case
    pub fn get_type_by_name(&self, name: &str) -> Option<&MetadataType> {
        let needle = name.to_lowercase();
        self.types.get(&needle).or_else(|| {
            self.types
                .values()
                .find(|metadata_type| metadata_type.name.to_lowercase() == needle)
        })
    }

    /// Like [`Registry::get_type_by_name`], failing with [`Error::UnknownType`]
    pub fn require_type(&self, name: &str) -> Result<&MetadataType> {
        self.get_type_by_name(name).ok_or_else(|| Error::UnknownType {
            name: name.to_string(),
        })
    }

    /// Look up the top-level type owning a descriptor suffix
    pub fn get_type_by_suffix(&self, suffix: &str) -> Option<&MetadataType> {
        self.suffixes
            .get(suffix)
            .and_then(|type_id| self.types.get(type_id))
    }

    fn finish(mut self) -> Result<Self> {
        for (key, metadata_type) in self.types.iter_mut() {
            metadata_type.assign_ids(key);
        }
        if self.suffixes.is_empty() {
            self.suffixes = self
                .types
                .values()
                .filter_map(|metadata_type| {
                    metadata_type
                        .suffix
                        .clone()
                        .map(|suffix| (suffix, metadata_type.id.clone()))
                })
                .collect();
        }
        for (suffix, type_id) in &self.suffixes {
            if !self.types.contains_key(type_id) {
                return Err(Error::Registry {
                    message: format!("suffix '{}' maps to unknown type '{}'", suffix, type_id),
                });
            }
        }
        Ok(self)
    }
}
