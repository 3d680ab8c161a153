//! Asset error types

use std::path::PathBuf;

use forge_doc::DocError;
use thiserror::Error;

use crate::base::AssetState;
use crate::types::FileId;

/// Errors raised by asset operations
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DocError,
    },

    #[error("cannot {operation} an asset that is {state}")]
    InvalidState {
        operation: &'static str,
        state: AssetState,
    },

    #[error("dependent resource {file_id} failed: {message}")]
    DependentResource { file_id: FileId, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: DocError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while reading or writing the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
