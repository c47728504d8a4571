use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{EndpointError, Result};
use crate::path::{CompiledPath, Segment};

/// Kind of a located node. `Missing` stands for the absent-field marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Missing,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Boolean,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Null => "null",
            NodeKind::Boolean => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
            NodeKind::Missing => "missing",
        };
        f.write_str(s)
    }
}

/// Outcome of navigating a document: a borrowed node, or the marker for
/// "no such field". `Missing` is not `Value::Null` and not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Located<'a> {
    Found(&'a Value),
    Missing,
}

impl<'a> Located<'a> {
    pub fn node(self) -> Option<&'a Value> {
        match self {
            Located::Found(v) => Some(v),
            Located::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Located::Missing)
    }

    pub fn kind(self) -> NodeKind {
        match self {
            Located::Found(v) => NodeKind::of(v),
            Located::Missing => NodeKind::Missing,
        }
    }
}

/// Property lookup that never fails: non-objects, absent keys and the
/// missing marker itself all yield `Missing`.
pub fn lookup_field<'a>(current: Located<'a>, name: &str) -> Located<'a> {
    match current {
        Located::Found(Value::Object(map)) => match map.get(name) {
            Some(v) => Located::Found(v),
            None => {
                debug!(field = name, "field not present, continuing with missing");
                Located::Missing
            }
        },
        Located::Found(other) => {
            debug!(field = name, kind = %NodeKind::of(other), "field lookup on non-object");
            Located::Missing
        }
        Located::Missing => Located::Missing,
    }
}

/// Walk `root` along `path`.
///
/// A missing field degrades to [`Located::Missing`] and the walk carries on;
/// an array position past the end aborts with `ArrayIndexNotFound`.
pub fn evaluate<'a>(root: &'a Value, path: &CompiledPath) -> Result<Located<'a>> {
    let mut current = Located::Found(root);
    for seg in path.segments() {
        trace!(segment = %seg, kind = %current.kind(), "step");
        current = match seg {
            Segment::Field { name } => lookup_field(current, name),
            Segment::IndexedField { name, indices } => {
                let mut cursor = if name.is_empty() {
                    current
                } else {
                    lookup_field(current, name)
                };
                for &index in indices {
                    cursor = Located::Found(element_at(cursor, index, path)?);
                }
                cursor
            }
        };
    }
    Ok(current)
}

fn element_at<'a>(cursor: Located<'a>, index: usize, path: &CompiledPath) -> Result<&'a Value> {
    let elements: &'a [Value] = match cursor {
        Located::Found(Value::Array(arr)) => arr,
        // Anything that is not an array has no positions to scan.
        _ => &[],
    };
    match elements.get(index) {
        Some(v) => Ok(v),
        None => {
            debug!(path = path.source(), index, len = elements.len(), "array index not found");
            Err(EndpointError::ArrayIndexNotFound {
                path: path.source().to_string(),
                index,
                len: elements.len(),
            })
        }
    }
}
