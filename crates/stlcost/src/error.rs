//! Error types for volume decoding and cost estimation.

use thiserror::Error;

/// Errors that can occur while decoding a mesh or estimating its cost.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    /// Buffer is shorter than the binary STL header plus triangle count.
    #[error("buffer of {len} bytes is shorter than the {min}-byte STL header")]
    TooShort {
        /// Actual buffer length.
        len: usize,
        /// Minimum valid length.
        min: usize,
    },

    /// Buffer is shorter than its declared triangle count requires.
    #[error("buffer of {len} bytes is truncated: {triangles} triangles need {expected} bytes")]
    Truncated {
        /// Actual buffer length.
        len: usize,
        /// Declared triangle count.
        triangles: u32,
        /// Length implied by the triangle count.
        expected: usize,
    },

    /// Byte layout is structurally inconsistent.
    #[error("parse error: {0}")]
    Parse(String),

    /// A print profile parameter is out of range or non-finite.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Coarse classification of a [`CostError`], for callers that map
/// failures onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Buffer too short or truncated relative to its triangle count.
    MalformedInput,
    /// Structurally inconsistent byte layout.
    Parse,
    /// Out-of-range or non-finite profile parameter.
    InvalidParameter,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::Parse => "parse_error",
            ErrorKind::InvalidParameter => "invalid_parameter",
        }
    }
}

impl CostError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CostError::TooShort { .. } | CostError::Truncated { .. } => ErrorKind::MalformedInput,
            CostError::Parse(_) => ErrorKind::Parse,
            CostError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CostError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for decoding and estimation.
pub type Result<T> = std::result::Result<T, CostError>;
