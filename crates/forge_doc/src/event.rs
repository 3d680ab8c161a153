//! Document events
//!
//! The reader turns text into a flat stream of events; decoders walk that
//! stream through a [`Cursor`](crate::Cursor) and the emitter accepts the
//! same vocabulary on the way out.

use core::fmt;

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// A scalar value with its source style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scalar {
    pub value: String,
    pub style: ScalarStyle,
}

impl Scalar {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::Plain,
        }
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::DoubleQuoted,
        }
    }

    /// An empty plain scalar, i.e. a key with no value.
    pub fn null() -> Self {
        Self::plain("")
    }

    /// Plain `~`, `null` or nothing at all.
    pub fn is_null(&self) -> bool {
        self.style == ScalarStyle::Plain
            && matches!(self.value.as_str(), "" | "~" | "null" | "Null" | "NULL")
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Event kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    Scalar(Scalar),
}

impl EventKind {
    /// Short name used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::MappingStart => "mapping".to_string(),
            Self::MappingEnd => "end of mapping".to_string(),
            Self::SequenceStart => "sequence".to_string(),
            Self::SequenceEnd => "end of sequence".to_string(),
            Self::Scalar(s) => format!("scalar '{}'", s.value),
        }
    }
}

/// An event with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub line: usize,
}

impl Event {
    pub fn new(kind: EventKind, line: usize) -> Self {
        Self { kind, line }
    }
}
