//! Opaque document tree
//!
//! Used where the schema does not fix a shape: unknown fields that are
//! skipped, metadata documents and free-form component overrides.

use core::fmt;

use indexmap::IndexMap;

use crate::event::{Scalar, ScalarStyle};

/// A document node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(IndexMap<String, Node>),
}

impl Default for Node {
    fn default() -> Self {
        Self::null()
    }
}

impl Node {
    /// The null scalar
    pub fn null() -> Self {
        Self::Scalar(Scalar::null())
    }

    /// A string scalar
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::quoted(value))
    }

    /// A plain scalar, written back verbatim when possible
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::plain(value))
    }

    /// An empty mapping
    pub fn mapping() -> Self {
        Self::Mapping(IndexMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(s) if s.is_null())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) if !s.is_null() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key if this node is a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(s) if s.is_null() => "null",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Render this node as a standalone document
    pub fn to_text(&self) -> String {
        let mut emitter = crate::Emitter::new();
        emitter.node(self);
        emitter.finish()
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) if s.is_null() && s.style == ScalarStyle::Plain => f.write_str("~"),
            Self::Scalar(s) => f.write_str(s.as_str()),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}
