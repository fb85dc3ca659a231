//! # Source Components
//!
//! A [`SourceComponent`] is a named, typed unit of configuration bound to the
//! files that represent it: an optional descriptor file (`xml`) and optional
//! bulk content (`content`, a single file or a directory).
//!
//! Components live in a [`ComponentArena`] and refer to their parent through a
//! [`ComponentId`] handle. Parents never hold their children, so the arena has
//! no ownership cycles and every record other than its deletion mark is
//! immutable once inserted.
//!
//! ## Children
//!
//! Only root components whose type declares a children schema have children.
//! They are discovered in one of two ways:
//!
//! - **Decomposed**: the component has a content directory. Every descriptor
//!   file below it, other than the parent's own, is a child whose type is
//!   found through the schema's suffix mapping.
//! - **Non-decomposed**: the component has no content. Its descriptor holds
//!   the children as repeated `xmlElementName` elements, each named by the
//!   child type's unique-id field, and every child shares the parent's
//!   descriptor path. Child types without both fields are not discovered.
//!
//! Every discovered child must be a declared child type of the parent;
//! otherwise discovery fails as a whole and nothing is added to the arena.
//!
//! ## Example
//!
//! ```
//! use component_tree::component::{ComponentArena, ComponentProperties};
//! use component_tree::filesystem::{VirtualDirectory, VirtualFile, VirtualTree};
//! use component_tree::ignore_file::IgnoreFile;
//! use component_tree::registry::MetadataType;
//! use std::sync::Arc;
//!
//! let tree = VirtualTree::new(vec![VirtualDirectory::new(
//!     "classes",
//!     vec![VirtualFile::new("Foo.cls"), VirtualFile::new("Foo.cls-meta.xml")],
//! )]);
//! let apex_class = MetadataType::new("apexclass", "ApexClass", "classes", Some("cls"));
//!
//! let mut arena = ComponentArena::new();
//! let foo = arena.add(
//!     ComponentProperties::new("Foo", apex_class)
//!         .with_xml("classes/Foo.cls-meta.xml")
//!         .with_content("classes/Foo.cls"),
//!     Arc::new(tree),
//!     Arc::new(IgnoreFile::default()),
//! );
//! assert_eq!(arena.full_name(foo), "Foo");
//! assert!(arena.get_children(foo).unwrap().is_empty());
//! ```

use crate::defaults::DEFAULT_PACKAGE_ROOT;
use crate::descriptor::{self, Descriptor, NestedLocator};
use crate::error::{Error, Result};
use crate::filesystem::{DiskTree, TreeContainer, VirtualDirectory, VirtualTree};
use crate::ignore_file::IgnoreFile;
use crate::path::{base_name, parse_metadata_xml, trim_until};
use crate::registry::MetadataType;
use crate::walk::Walk;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Which destructive manifest a deleted component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestructiveChangesType {
    /// Deleted before the rest of the deployment
    Pre,
    /// Deleted after the rest of the deployment
    Post,
}

/// Packaged output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Source layout, nested under [`DEFAULT_PACKAGE_ROOT`]
    #[default]
    Source,
    /// Flat layout
    Metadata,
}

/// Handle to a component in a [`ComponentArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Everything needed to create a component, other than its tree bindings
#[derive(Debug, Clone)]
pub struct ComponentProperties {
    pub name: String,
    pub metadata_type: Arc<MetadataType>,
    pub xml: Option<PathBuf>,
    pub content: Option<PathBuf>,
    /// Type of an enclosing folder, consulted by folder layout rules
    pub parent_type: Option<Arc<MetadataType>>,
}

impl ComponentProperties {
    pub fn new(name: impl Into<String>, metadata_type: impl Into<Arc<MetadataType>>) -> Self {
        Self {
            name: name.into(),
            metadata_type: metadata_type.into(),
            xml: None,
            content: None,
            parent_type: None,
        }
    }

    pub fn with_xml(mut self, xml: impl Into<PathBuf>) -> Self {
        self.xml = Some(xml.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<PathBuf>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_parent_type(mut self, parent_type: impl Into<Arc<MetadataType>>) -> Self {
        self.parent_type = Some(parent_type.into());
        self
    }
}

#[derive(Debug, Default)]
struct DeletionMark {
    marked: bool,
    kind: Option<DestructiveChangesType>,
}

/// A component and the files that represent it
#[derive(Debug)]
pub struct SourceComponent {
    name: String,
    metadata_type: Arc<MetadataType>,
    xml: Option<PathBuf>,
    content: Option<PathBuf>,
    parent: Option<ComponentId>,
    parent_type: Option<Arc<MetadataType>>,
    tree: Arc<dyn TreeContainer>,
    ignore: Arc<IgnoreFile>,
    deletion: Mutex<DeletionMark>,
}

impl SourceComponent {
    fn new(
        props: ComponentProperties,
        parent: Option<ComponentId>,
        tree: Arc<dyn TreeContainer>,
        ignore: Arc<IgnoreFile>,
    ) -> Self {
        Self {
            name: props.name,
            metadata_type: props.metadata_type,
            xml: props.xml,
            content: props.content,
            parent,
            parent_type: props.parent_type,
            tree,
            ignore,
            deletion: Mutex::new(DeletionMark::default()),
        }
    }

    /// Local name, without any parent prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata_type(&self) -> &MetadataType {
        &self.metadata_type
    }

    /// Descriptor file, which for nested children is the parent's descriptor
    pub fn xml(&self) -> Option<&Path> {
        self.xml.as_deref()
    }

    pub fn content(&self) -> Option<&Path> {
        self.content.as_deref()
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn parent_type(&self) -> Option<&MetadataType> {
        self.parent_type.as_deref()
    }

    pub fn tree(&self) -> &dyn TreeContainer {
        self.tree.as_ref()
    }

    /// The ignore rules applied when walking this component's files
    pub fn ignore(&self) -> &IgnoreFile {
        &self.ignore
    }

    /// Whether the component belongs in a manifest
    pub fn is_addressable(&self) -> bool {
        self.metadata_type.is_addressable()
    }

    /// Walk files under `path` with this component's tree and ignore rules
    pub fn walk(&self, path: &Path) -> Walk<'_> {
        Walk::new(self.tree.as_ref(), &self.ignore, path)
    }

    /// Every content file except the component's own descriptor
    pub fn walk_content(&self) -> Result<Vec<PathBuf>> {
        let Some(content) = self.content.as_deref() else {
            return Ok(Vec::new());
        };
        let mut sources = Vec::new();
        for path in self.walk(content) {
            let path = path?;
            if self.xml.as_deref() != Some(path.as_path()) {
                sources.push(path);
            }
        }
        Ok(sources)
    }

    pub fn is_marked_for_delete(&self) -> bool {
        self.deletion_mark().marked
    }

    /// Set only while the component is marked for delete
    pub fn destructive_changes_type(&self) -> Option<DestructiveChangesType> {
        self.deletion_mark().kind
    }

    /// Mark the component for deletion; no kind means [`DestructiveChangesType::Post`]
    pub fn set_marked_for_delete(&self, kind: Option<DestructiveChangesType>) {
        let mut mark = self.deletion_mark();
        mark.marked = true;
        mark.kind = Some(kind.unwrap_or(DestructiveChangesType::Post));
    }

    /// Clear the deletion mark and its kind
    pub fn unset_marked_for_delete(&self) {
        let mut mark = self.deletion_mark();
        mark.marked = false;
        mark.kind = None;
    }

    fn deletion_mark(&self) -> std::sync::MutexGuard<'_, DeletionMark> {
        // The mark is two plain fields, so a poisoned lock still holds a usable value
        self.deletion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A child found during discovery, before it is validated
#[derive(Debug)]
struct ChildCandidate {
    name: String,
    type_id: Option<String>,
    xml: PathBuf,
}

/// Owner of every resolved component
///
/// Handles are only valid for the arena that issued them.
#[derive(Debug, Default)]
pub struct ComponentArena {
    components: Vec<SourceComponent>,
    /// Children of every component whose discovery succeeded
    resolved: HashMap<ComponentId, Vec<ComponentId>>,
}

impl ComponentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: ComponentId) -> Option<&SourceComponent> {
        self.components.get(id.0)
    }

    /// All components with their handles, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &SourceComponent)> {
        self.components
            .iter()
            .enumerate()
            .map(|(index, component)| (ComponentId(index), component))
    }

    /// Add a root component
    pub fn add(
        &mut self,
        props: ComponentProperties,
        tree: Arc<dyn TreeContainer>,
        ignore: Arc<IgnoreFile>,
    ) -> ComponentId {
        self.push(SourceComponent::new(props, None, tree, ignore))
    }

    /// Add a component under `parent`, sharing the parent's tree and ignore rules
    pub fn add_child(&mut self, parent: ComponentId, props: ComponentProperties) -> ComponentId {
        let (tree, ignore) = {
            let parent = &self[parent];
            (Arc::clone(&parent.tree), Arc::clone(&parent.ignore))
        };
        self.push(SourceComponent::new(props, Some(parent), tree, ignore))
    }

    /// Add a root component read from the local filesystem
    ///
    /// Ignore rules are searched for from the content path, falling back to
    /// the descriptor's directory.
    pub fn add_on_disk(&mut self, props: ComponentProperties) -> Result<ComponentId> {
        let search_from = props
            .content
            .clone()
            .or_else(|| {
                props
                    .xml
                    .as_deref()
                    .and_then(Path::parent)
                    .map(Path::to_path_buf)
            })
            .unwrap_or_else(|| PathBuf::from("."));
        let ignore = IgnoreFile::find_and_create(&search_from)?;
        Ok(self.add(props, Arc::new(DiskTree::new()), Arc::new(ignore)))
    }

    /// Add a root component backed by an in-memory tree
    pub fn add_virtual(
        &mut self,
        props: ComponentProperties,
        directories: Vec<VirtualDirectory>,
        ignore: Option<IgnoreFile>,
    ) -> ComponentId {
        self.add(
            props,
            Arc::new(VirtualTree::new(directories)),
            Arc::new(ignore.unwrap_or_default()),
        )
    }

    fn push(&mut self, component: SourceComponent) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components.push(component);
        id
    }

    /// Parent of a component, if it has one
    pub fn parent(&self, id: ComponentId) -> Option<&SourceComponent> {
        self[id].parent.map(|parent| &self[parent])
    }

    /// Ancestor-qualified name, recomputed on every call
    pub fn full_name(&self, id: ComponentId) -> String {
        let component = &self[id];
        let metadata_type = &component.metadata_type;
        if metadata_type.ignore_parsed_full_name {
            return metadata_type.name.clone();
        }
        match component.parent {
            Some(_) if metadata_type.ignore_parent_name => component.name.clone(),
            Some(parent) => format!("{}.{}", self.full_name(parent), component.name),
            None => component.name.clone(),
        }
    }

    /// Discover, validate and insert the direct children of a component
    ///
    /// Children are resolved once: after a successful discovery, later calls
    /// return the same handles without reading the tree again. A failed
    /// discovery adds nothing and is retried on the next call. Components that
    /// have a parent, or whose type has no children schema, have no children.
    pub fn get_children(&mut self, id: ComponentId) -> Result<Vec<ComponentId>> {
        if let Some(children) = self.resolved.get(&id) {
            return Ok(children.clone());
        }
        let records = {
            let component = &self[id];
            let Some(schema) = component.metadata_type.children.as_ref() else {
                return Ok(Vec::new());
            };
            if component.parent.is_some() {
                return Ok(Vec::new());
            }

            let candidates = match component.content.as_deref() {
                Some(content) => self.decomposed_candidates(component, content)?,
                None => self.non_decomposed_candidates(id)?,
            };

            for candidate in &candidates {
                let declared = candidate
                    .type_id
                    .as_deref()
                    .is_some_and(|type_id| schema.contains(type_id));
                if !declared {
                    return Err(Error::UnexpectedChildType {
                        path: candidate.xml.clone(),
                        parent_type: component.metadata_type.name.clone(),
                    });
                }
            }

            let mut child_types: HashMap<String, Arc<MetadataType>> = HashMap::new();
            candidates
                .into_iter()
                .filter_map(|candidate| {
                    let type_id = candidate.type_id?;
                    let child_type = child_types
                        .entry(type_id.clone())
                        .or_insert_with(|| Arc::new(schema.types[&type_id].clone()))
                        .clone();
                    let props = ComponentProperties {
                        name: candidate.name,
                        metadata_type: child_type,
                        xml: Some(candidate.xml),
                        content: None,
                        parent_type: None,
                    };
                    Some(SourceComponent::new(
                        props,
                        Some(id),
                        Arc::clone(&component.tree),
                        Arc::clone(&component.ignore),
                    ))
                })
                .collect::<Vec<_>>()
        };

        let children: Vec<ComponentId> = records
            .into_iter()
            .map(|record| self.push(record))
            .collect();
        self.resolved.insert(id, children.clone());
        debug!(
            "Resolved {} children of {}",
            children.len(),
            self.full_name(id)
        );
        Ok(children)
    }

    fn decomposed_candidates(
        &self,
        component: &SourceComponent,
        content: &Path,
    ) -> Result<Vec<ChildCandidate>> {
        let metadata_type = &component.metadata_type;
        let Some(schema) = metadata_type.children.as_ref() else {
            return Ok(Vec::new());
        };

        let mut candidates = Vec::new();
        for path in component.walk(content) {
            let path = path?;
            let Some(child_xml) = parse_metadata_xml(&path) else {
                continue;
            };
            // The parent's own descriptor
            if metadata_type.suffix.as_deref() == Some(child_xml.suffix.as_str()) {
                continue;
            }
            let type_id = schema.type_id_for_suffix(&child_xml.suffix);
            if type_id.is_none() {
                warn!(
                    "No child type of {} is registered for suffix '{}' ({})",
                    metadata_type.name,
                    child_xml.suffix,
                    path.display()
                );
            }
            candidates.push(ChildCandidate {
                name: base_name(&path),
                type_id: type_id.map(str::to_string),
                xml: path,
            });
        }
        Ok(candidates)
    }

    fn non_decomposed_candidates(&self, id: ComponentId) -> Result<Vec<ChildCandidate>> {
        let component = &self[id];
        let metadata_type = &component.metadata_type;
        let (Some(schema), Some(xml)) = (metadata_type.children.as_ref(), component.xml.as_deref())
        else {
            return Ok(Vec::new());
        };

        let parsed = self.parse_xml_sync(id)?.into_value();
        let mut candidates = Vec::new();
        for (type_id, child_type) in &schema.types {
            // Discovery reads only the declared element name; slicing falls
            // back to the directory name
            let (Some(unique_id_element), Some(element_name)) = (
                child_type.unique_id_element.as_deref(),
                child_type.xml_element_name.as_deref(),
            ) else {
                continue;
            };
            let elements = descriptor::normalize_to_array(descriptor::get_path(
                &parsed,
                &[metadata_type.name.as_str(), element_name],
            ));
            for element in elements {
                let name = descriptor::get_string(element, unique_id_element).ok_or_else(|| {
                    Error::MalformedDescriptor {
                        path: xml.to_path_buf(),
                        message: format!(
                            "<{}> element without <{}>",
                            element_name, unique_id_element
                        ),
                    }
                })?;
                candidates.push(ChildCandidate {
                    name,
                    type_id: Some(type_id.clone()),
                    xml: xml.to_path_buf(),
                });
            }
        }
        Ok(candidates)
    }

    /// Read and route the component's descriptor, blocking
    pub fn parse_xml_sync(&self, id: ComponentId) -> Result<Descriptor> {
        match self[id].xml.as_deref() {
            Some(xml) => self.parse_xml_sync_at(id, xml),
            None => Ok(Descriptor::Empty),
        }
    }

    /// Read and route the descriptor at `xml` on behalf of the component, blocking
    pub fn parse_xml_sync_at(&self, id: ComponentId, xml: &Path) -> Result<Descriptor> {
        let bytes = self[id].tree.read_file_sync(xml)?;
        Ok(self.route_descriptor(id, descriptor::decode(xml, &bytes)?))
    }

    /// Read and route the component's descriptor
    pub async fn parse_xml(&self, id: ComponentId) -> Result<Descriptor> {
        match self[id].xml.as_deref() {
            Some(xml) => self.parse_xml_at(id, xml).await,
            None => Ok(Descriptor::Empty),
        }
    }

    /// Read and route the descriptor at `xml` on behalf of the component
    pub async fn parse_xml_at(&self, id: ComponentId, xml: &Path) -> Result<Descriptor> {
        let bytes = self[id].tree.read_file(xml).await?;
        Ok(self.route_descriptor(id, descriptor::decode(xml, &bytes)?))
    }

    /// Cut a nested component's element out of its parent's decoded descriptor
    ///
    /// Saves re-reading the shared file once per child. A root component gets
    /// `parent_xml` back unchanged.
    pub fn parse_from_parent_xml(&self, id: ComponentId, parent_xml: &Value) -> Option<Value> {
        match self.nested_locator(id) {
            Some(locator) => locator.select(parent_xml),
            None => Some(parent_xml.clone()),
        }
    }

    fn nested_locator(&self, id: ComponentId) -> Option<NestedLocator<'_>> {
        let component = &self[id];
        let parent = &self[component.parent?];
        Some(NestedLocator {
            parent_type_name: &parent.metadata_type.name,
            element_name: component.metadata_type.nested_element_name(),
            unique_id_element: component.metadata_type.unique_id_element.as_deref(),
            name: &component.name,
        })
    }

    fn route_descriptor(&self, id: ComponentId, decoded: Value) -> Descriptor {
        descriptor::route(
            decoded,
            &self[id].metadata_type.name,
            self.nested_locator(id),
        )
    }

    /// Where `path`, one of the component's files, goes in packaged output
    pub fn package_relative_path(&self, id: ComponentId, path: &Path, format: FileFormat) -> PathBuf {
        let relative = self.calculate_relative_path(id, path);
        match format {
            FileFormat::Source => Path::new(DEFAULT_PACKAGE_ROOT).join(relative),
            FileFormat::Metadata => relative,
        }
    }

    fn calculate_relative_path(&self, id: ComponentId, path: &Path) -> PathBuf {
        let component = &self[id];
        let metadata_type = &component.metadata_type;

        // Bundles, in-folder types and folders keep the structure below their directory
        if metadata_type.suffix.is_none()
            || metadata_type.in_folder
            || metadata_type.folder_content_type.is_some()
        {
            return trim_until(path, &metadata_type.directory_name);
        }

        let file_name = path.file_name().map(PathBuf::from).unwrap_or_default();
        if metadata_type.folder_type.is_some() {
            // Nested folder hierarchies keep the enclosing type's structure
            if let Some(parent_type) = component.parent_type.as_deref() {
                if parent_type
                    .folder_type
                    .as_deref()
                    .is_some_and(|folder_type| folder_type != metadata_type.id)
                {
                    return trim_until(path, &parent_type.directory_name);
                }
            }
            let full_name = self.full_name(id);
            let folder = full_name.split('/').next().unwrap_or_default();
            return Path::new(&metadata_type.directory_name)
                .join(folder)
                .join(file_name);
        }

        Path::new(&metadata_type.directory_name).join(file_name)
    }
}

impl Index<ComponentId> for ComponentArena {
    type Output = SourceComponent;

    fn index(&self, id: ComponentId) -> &SourceComponent {
        &self.components[id.0]
    }
}
