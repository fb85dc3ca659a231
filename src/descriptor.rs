//! # Descriptor Decoding and Routing
//!
//! Descriptor files are XML. They are decoded into a `serde_json::Value` tree
//! so callers can address any field by path without a schema:
//!
//! - the document becomes `{ "<RootElement>": <value> }`;
//! - an element holding only text becomes a string (never a number: `007`
//!   stays `"007"`), an empty element becomes `""`;
//! - attributes become fields prefixed with `@_`, keeping any namespace
//!   prefix (`xsi:nil` becomes `@_xsi:nil`);
//! - text mixed with attributes or child elements is stored under `#text`;
//! - repeated sibling elements become an array, in document order.
//!
//! A component's descriptor is either its own file, or (for components
//! nested inside a shared parent file) one element of the parent's
//! descriptor. [`route`] makes that decision once and reports it through the
//! [`Descriptor`] variants.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;
use xot::{NameId, Node, Xot};

/// Key prefix for attributes
pub const ATTRIBUTE_PREFIX: &str = "@_";
/// Key for text content of elements that also have attributes or children
pub const TEXT_NODE_NAME: &str = "#text";

/// Decode descriptor bytes read from `path`
pub fn decode(path: &Path, bytes: &[u8]) -> Result<Value> {
    let malformed = |message: String| Error::MalformedDescriptor {
        path: path.to_path_buf(),
        message,
    };
    let text = std::str::from_utf8(bytes).map_err(|e| malformed(e.to_string()))?;
    decode_str(text).map_err(malformed)
}

/// Decode descriptor text; the error is the parser's message
pub fn decode_str(text: &str) -> std::result::Result<Value, String> {
    let mut xot = Xot::new();
    let document = xot.parse(text).map_err(|e| e.to_string())?;
    let root = xot.document_element(document).map_err(|e| e.to_string())?;

    let mut document_map = Map::new();
    document_map.insert(element_name(&xot, root), element_value(&xot, root));
    Ok(Value::Object(document_map))
}

fn element_name(xot: &Xot, node: Node) -> String {
    xot.element(node)
        .map(|element| xot.local_name_str(element.name()).to_string())
        .unwrap_or_default()
}

fn element_value(xot: &Xot, node: Node) -> Value {
    let mut fields = Map::new();
    for (name, value) in xot.attributes(node).iter() {
        fields.insert(
            format!("{}{}", ATTRIBUTE_PREFIX, attribute_name(xot, node, name)),
            Value::String(value.to_string()),
        );
    }

    let mut text = String::new();
    for child in xot.children(node) {
        if let Some(child_text) = xot.text_str(child) {
            text.push_str(child_text);
        } else if xot.element(child).is_some() {
            insert_repeated(
                &mut fields,
                element_name(xot, child),
                element_value(xot, child),
            );
        }
    }

    let text = text.trim();
    if fields.is_empty() {
        return Value::String(text.to_string());
    }
    if !text.is_empty() {
        fields.insert(TEXT_NODE_NAME.to_string(), Value::String(text.to_string()));
    }
    Value::Object(fields)
}

/// `prefix:local` for namespaced attributes, `local` otherwise
fn attribute_name(xot: &Xot, node: Node, name: NameId) -> String {
    let local = xot.local_name_str(name);
    let namespace = xot.namespace_for_name(name);
    if namespace == xot.no_namespace() {
        return local.to_string();
    }
    match xot.prefix_for_namespace(node, namespace) {
        Some(prefix) if !xot.prefix_str(prefix).is_empty() => {
            format!("{}:{}", xot.prefix_str(prefix), local)
        }
        _ => local.to_string(),
    }
}

fn insert_repeated(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Treat a missing value as no elements and a single value as one element
pub fn normalize_to_array(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// Follow `segments` through nested objects
pub fn get_path<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(value, |current, segment| current.get(*segment))
}

/// The text of field `key`, also when the field carries attributes
pub fn get_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Object(fields) => fields
            .get(TEXT_NODE_NAME)
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Name of the root element of a decoded descriptor
pub fn root_element_name(decoded: &Value) -> Option<&str> {
    decoded
        .as_object()
        .and_then(|fields| fields.keys().next())
        .map(String::as_str)
}

/// A component's descriptor, tagged with where it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// The component has no descriptor file
    Empty,
    /// The descriptor file's root element is the component's own type
    Own(Value),
    /// The file belongs to the parent; this is the component's element in it,
    /// or `None` when no element carries the component's name
    SlicedFromParent(Option<Value>),
    /// A root component whose file has a foreign root element, returned as decoded
    Unrouted(Value),
}

impl Descriptor {
    /// The structural tree, if there is one
    pub fn value(&self) -> Option<&Value> {
        match self {
            Descriptor::Own(value) | Descriptor::Unrouted(value) => Some(value),
            Descriptor::SlicedFromParent(value) => value.as_ref(),
            Descriptor::Empty => None,
        }
    }

    /// The structural tree; `Empty` gives an empty object
    pub fn into_value(self) -> Value {
        match self {
            Descriptor::Own(value) | Descriptor::Unrouted(value) => value,
            Descriptor::SlicedFromParent(value) => value.unwrap_or(Value::Null),
            Descriptor::Empty => Value::Object(Map::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Descriptor::Empty)
    }
}

/// Where a nested component's element sits inside its parent's descriptor
#[derive(Debug, Clone, Copy)]
pub struct NestedLocator<'a> {
    /// Root element of the parent descriptor
    pub parent_type_name: &'a str,
    /// Element name of the nested collection
    pub element_name: &'a str,
    /// Field naming each nested element
    pub unique_id_element: Option<&'a str>,
    /// Name of the component to select
    pub name: &'a str,
}

impl NestedLocator<'_> {
    /// The element of `parent` whose unique id equals the component name
    pub fn select(&self, parent: &Value) -> Option<Value> {
        let unique_id_element = self.unique_id_element?;
        normalize_to_array(get_path(
            parent,
            &[self.parent_type_name, self.element_name],
        ))
        .into_iter()
        .find(|element| get_string(element, unique_id_element).as_deref() == Some(self.name))
        .cloned()
    }
}

/// Decide what a decoded descriptor is for the component reading it
///
/// `nested` is set for components that have a parent.
pub fn route(decoded: Value, type_name: &str, nested: Option<NestedLocator<'_>>) -> Descriptor {
    if root_element_name(&decoded) == Some(type_name) {
        return Descriptor::Own(decoded);
    }
    match nested {
        Some(locator) => Descriptor::SlicedFromParent(locator.select(&decoded)),
        None => Descriptor::Unrouted(decoded),
    }
}
