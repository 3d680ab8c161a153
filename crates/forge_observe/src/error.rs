//! Errors raised by observable containers

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveError {
    #[error("no uniform named '{0}'")]
    MissingUniform(String),

    #[error("a uniform named '{0}' already exists")]
    DuplicateUniform(String),
}
