use thiserror::Error;

use crate::NodeKind;

/// Field-less mirror of [`EndpointError`] for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyPath,
    InvalidSegmentName,
    InvalidIndex,
    ArrayIndexNotFound,
    FormatConversion,
    Parse,
    Overflow,
    Decode,
}

#[derive(Debug, Error)]
pub enum EndpointError {
    // Compile time
    #[error("path is empty")]
    EmptyPath,

    #[error("invalid name param: {token}")]
    InvalidSegmentName { token: String },

    #[error("invalid array index in param: {token}")]
    InvalidIndex { token: String },

    // Evaluation time
    #[error("not found array index {index} (length {len}) for json key: {path}")]
    ArrayIndexNotFound { path: String, index: usize, len: usize },

    // Coercion time
    #[error("cannot convert a {kind} node to the {target} type")]
    FormatConversion { target: &'static str, kind: NodeKind },

    #[error("cannot parse {text:?} as {target}: {reason}")]
    Parse {
        target: &'static str,
        text: String,
        reason: String,
    },

    #[error("value {value} is out of range for {target}")]
    Overflow { target: &'static str, value: String },

    #[error("structural decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl EndpointError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EndpointError::EmptyPath => ErrorKind::EmptyPath,
            EndpointError::InvalidSegmentName { .. } => ErrorKind::InvalidSegmentName,
            EndpointError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            EndpointError::ArrayIndexNotFound { .. } => ErrorKind::ArrayIndexNotFound,
            EndpointError::FormatConversion { .. } => ErrorKind::FormatConversion,
            EndpointError::Parse { .. } => ErrorKind::Parse,
            EndpointError::Overflow { .. } => ErrorKind::Overflow,
            EndpointError::Decode(_) => ErrorKind::Decode,
        }
    }
}

pub type Result<T> = std::result::Result<T, EndpointError>;
