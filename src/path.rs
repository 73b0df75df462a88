//! Path-based access into untyped JSON trees
//!
//! A [`SchemaPath`] is a list of object keys and array indices. The three
//! operations here never fail:
//!
//! - [`get`] returns `None` as soon as a segment is missing
//! - [`set`] creates missing or non-container intermediates as empty objects
//!   (numeric segments included) before assigning the leaf
//! - [`remove`] does nothing when any intermediate segment is missing

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// One step of a path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    /// Key used when the parent is an object
    pub fn to_key(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Key(key) => Cow::Borrowed(key),
            PathSegment::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Index used when the parent is an array; all-digit keys qualify
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(key) if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => {
                key.parse().ok()
            }
            PathSegment::Key(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a node inside a schema document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SchemaPath(Vec<PathSegment>);

impl SchemaPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Parse `properties.items.0` style paths; all-digit parts become indices
    pub fn parse_dotted(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::default();
        }
        dotted
            .split('.')
            .map(|part| match part.parse::<usize>() {
                Ok(index) if part.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(index),
                _ => PathSegment::Key(part.to_string()),
            })
            .collect()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl Deref for SchemaPath {
    type Target = [PathSegment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for SchemaPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self.0.iter().map(|s| s.to_key()).collect();
        f.write_str(&parts.join("."))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPath {
    Segments(Vec<PathSegment>),
    Dotted(String),
}

impl<'de> Deserialize<'de> for SchemaPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPath::deserialize(deserializer)? {
            RawPath::Segments(segments) => Self(segments),
            RawPath::Dotted(dotted) => Self::parse_dotted(&dotted),
        })
    }
}

/// Read the node at `path`
pub fn get<'a>(tree: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get(&*segment.to_key()),
        Value::Array(items) => segment.as_index().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Write `value` at `path`, creating intermediate objects as needed.
/// An empty path replaces the whole tree.
pub fn set(tree: &mut Value, path: &[PathSegment], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return;
    };

    let mut node = tree;
    for segment in parents {
        let child = slot(node, segment);
        if !is_container(child) {
            *child = Value::Object(Map::new());
        }
        node = child;
    }
    *slot(node, last) = value;
}

/// Delete the node at `path`, returning it when it existed
pub fn remove(tree: &mut Value, path: &[PathSegment]) -> Option<Value> {
    let (last, parents) = path.split_last()?;

    let mut node = tree;
    for segment in parents {
        node = match node {
            Value::Object(map) => map.get_mut(&*segment.to_key())?,
            Value::Array(items) => items.get_mut(segment.as_index()?)?,
            _ => return None,
        };
    }

    match node {
        Value::Object(map) => map.remove(&*last.to_key()),
        Value::Array(items) => {
            let index = last.as_index().filter(|&i| i < items.len())?;
            Some(items.remove(index))
        }
        _ => None,
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Mutable slot for `segment` inside `node`, inserted as `null` when absent.
/// An array grows by one for the index just past its end; indices further
/// out turn the array into an object keyed by index.
fn slot<'a>(node: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    let array_index = segment
        .as_index()
        .filter(|&index| matches!(node, Value::Array(items) if index <= items.len()));
    match (node, array_index) {
        (Value::Array(items), Some(index)) => {
            if index == items.len() {
                items.push(Value::Null);
            }
            &mut items[index]
        }
        (node, _) => as_object(node)
            .entry(segment.to_key().into_owned())
            .or_insert(Value::Null),
    }
}

/// Coerce `node` into an object. Arrays keep their items under index keys;
/// scalars are discarded.
fn as_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        let map = match node.take() {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            _ => Map::new(),
        };
        *node = Value::Object(map);
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was coerced into an object above"),
    }
}
