//! Error types for the document codec

use thiserror::Error;

/// Errors raised while reading or decoding a document.
///
/// Every variant that can be tied to a place in the source carries its
/// 1-based line number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocError {
    #[error("line {line}: syntax error: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedNode {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: cannot read '{value}' as {expected}")]
    InvalidScalar {
        line: usize,
        expected: &'static str,
        value: String,
    },

    #[error("line {line}: unsupported construct: {construct}")]
    Unsupported { line: usize, construct: &'static str },

    #[error("line {line}: duplicate key '{key}'")]
    DuplicateKey { line: usize, key: String },

    #[error("unexpected end of document")]
    UnexpectedEnd,
}

impl DocError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::UnexpectedNode { line, .. }
            | Self::InvalidScalar { line, .. }
            | Self::Unsupported { line, .. }
            | Self::DuplicateKey { line, .. } => Some(*line),
            Self::UnexpectedEnd => None,
        }
    }
}

/// Result type for document operations
pub type DocResult<T> = Result<T, DocError>;
