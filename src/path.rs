use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::{EndpointError, Result};

/// Characters that may never appear in a path token.
pub const RESERVED_CHARS: &str = ",<>?^:()=!%\\|/*+-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.foo`
    Field { name: String },
    /// `foo[0][1]`, or `[0]` with an empty name to index the current node.
    IndexedField { name: String, indices: Vec<usize> },
}

impl Segment {
    pub fn name(&self) -> &str {
        match self {
            Segment::Field { name } | Segment::IndexedField { name, .. } => name,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field { name } => f.write_str(name),
            Segment::IndexedField { name, indices } => {
                f.write_str(name)?;
                for i in indices {
                    write!(f, "[{i}]")?;
                }
                Ok(())
            }
        }
    }
}

/// A path string compiled into the ordered segments walked by the evaluator.
///
/// Pure data: build once, share freely between threads and evaluations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    source: String,
    segments: Vec<Segment>,
}

impl CompiledPath {
    /// The path text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; empty paths are rejected by [`compile`].
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("."))
    }
}

impl FromStr for CompiledPath {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self> {
        compile(s)
    }
}

/// Compile a dotted/bracketed path such as `data[0].timestamp` or `m[1][0]`.
pub fn compile(path: &str) -> Result<CompiledPath> {
    if path.is_empty() {
        return Err(EndpointError::EmptyPath);
    }
    let segments = path.split('.').map(compile_token).collect::<Result<Vec<_>>>()?;
    tracing::trace!(path, segments = segments.len(), "compiled path");
    Ok(CompiledPath {
        source: path.to_string(),
        segments,
    })
}

fn compile_token(token: &str) -> Result<Segment> {
    if token.chars().any(|c| RESERVED_CHARS.contains(c)) {
        return Err(EndpointError::InvalidSegmentName {
            token: token.to_string(),
        });
    }

    let mut parts = token.split('[');
    // split always yields at least one part
    let name = parts.next().unwrap_or_default().to_string();
    let indices = parts
        .map(|part| parse_index(part, token))
        .collect::<Result<Vec<_>>>()?;

    if indices.is_empty() {
        Ok(Segment::Field { name })
    } else {
        Ok(Segment::IndexedField { name, indices })
    }
}

fn parse_index(part: &str, token: &str) -> Result<usize> {
    let invalid = || EndpointError::InvalidIndex {
        token: token.to_string(),
    };
    let digits = part.strip_suffix(']').ok_or_else(invalid)?;
    digits.trim().parse::<usize>().map_err(|_| invalid())
}
