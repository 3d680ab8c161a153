//! Writer for asset documents
//!
//! The emitter accepts the same event vocabulary the reader produces,
//! assembles it into a `yaml-rust2` document and renders that in block
//! style with two-space indentation.

use yaml_rust2::yaml::{Hash, Yaml};
use yaml_rust2::YamlEmitter;

use crate::codec::Encode;
use crate::event::{Scalar, ScalarStyle};
use crate::node::Node;

enum Frame {
    Mapping { entries: Hash, key: Option<String> },
    Sequence(Vec<Yaml>),
}

/// Document writer
///
/// Calls must be balanced: every `mapping_start` needs a `mapping_end`
/// and every mapping value must be preceded by a key.
#[derive(Default)]
pub struct Emitter {
    stack: Vec<Frame>,
    root: Option<Yaml>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping_start(&mut self) {
        self.stack.push(Frame::Mapping {
            entries: Hash::new(),
            key: None,
        });
    }

    pub fn mapping_end(&mut self) {
        match self.stack.pop() {
            Some(Frame::Mapping { entries, key }) => {
                debug_assert!(key.is_none(), "mapping closed with a dangling key");
                self.attach(Yaml::Hash(entries));
            }
            other => {
                debug_assert!(false, "mapping_end without a matching mapping_start");
                if let Some(frame) = other {
                    self.stack.push(frame);
                }
            }
        }
    }

    pub fn sequence_start(&mut self) {
        self.stack.push(Frame::Sequence(Vec::new()));
    }

    pub fn sequence_end(&mut self) {
        match self.stack.pop() {
            Some(Frame::Sequence(items)) => self.attach(Yaml::Array(items)),
            other => {
                debug_assert!(false, "sequence_end without a matching sequence_start");
                if let Some(frame) = other {
                    self.stack.push(frame);
                }
            }
        }
    }

    /// Write a mapping key
    pub fn key(&mut self, key: &str) {
        match self.stack.last_mut() {
            Some(Frame::Mapping { key: slot, .. }) if slot.is_none() => {
                *slot = Some(key.to_string());
            }
            _ => debug_assert!(false, "key written outside of a mapping"),
        }
    }

    /// Write a string scalar. It is quoted if a plain rendering would not
    /// read back as the same string.
    pub fn scalar(&mut self, value: &str) {
        self.value(Yaml::String(value.to_string()));
    }

    /// Write a token verbatim, for numbers and booleans
    pub fn plain(&mut self, text: &str) {
        self.value(plain_token(text));
    }

    pub fn null(&mut self) {
        self.value(Yaml::Null);
    }

    /// Write an opaque node
    pub fn node(&mut self, node: &Node) {
        self.value(to_yaml(node));
    }

    pub fn emit<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode(self);
    }

    /// Write `key: value` inside the current mapping
    pub fn entry<T: Encode + ?Sized>(&mut self, key: &str, value: &T) {
        self.key(key);
        value.encode(self);
    }

    /// Render the document
    pub fn finish(self) -> String {
        debug_assert!(self.stack.is_empty(), "unbalanced emitter calls");
        let root = self.root.unwrap_or_else(|| Yaml::Hash(Hash::new()));

        let mut rendered = String::new();
        if let Err(e) = YamlEmitter::new(&mut rendered).dump(&root) {
            log::error!("cannot render document: {:?}", e);
        }

        // Drop the document marker the emitter always starts with.
        let body = rendered
            .strip_prefix("---")
            .map(|rest| rest.strip_prefix(['\n', ' ']).unwrap_or(rest))
            .unwrap_or(&rendered);
        let mut out = body.to_string();
        out.push('\n');
        out
    }

    fn value(&mut self, value: Yaml) {
        if let Some(Frame::Mapping { key: None, .. }) = self.stack.last() {
            // A bare scalar in key position is the key itself.
            if let Some(key) = key_text(&value) {
                self.key(&key);
                return;
            }
        }
        self.attach(value);
    }

    fn attach(&mut self, value: Yaml) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Sequence(items)) => items.push(value),
            Some(Frame::Mapping { entries, key }) => match key.take() {
                Some(key) => {
                    if entries.insert(Yaml::String(key.clone()), value).is_some() {
                        log::warn!("duplicate key '{}' overwrote an earlier value", key);
                    }
                }
                None => debug_assert!(false, "collection used as a mapping key"),
            },
        }
    }
}

fn key_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some(String::new()),
        _ => None,
    }
}

/// Tokens that already read back as themselves are kept verbatim; anything
/// else goes through string quoting.
fn plain_token(text: &str) -> Yaml {
    let lower = text.to_ascii_lowercase();
    match lower.as_str() {
        "" | "~" | "null" => Yaml::Null,
        "true" | "false" | ".nan" | ".inf" | "+.inf" | "-.inf" => Yaml::Real(text.to_string()),
        _ if text.trim() == text && text.parse::<f64>().is_ok() => Yaml::Real(text.to_string()),
        _ => Yaml::String(text.to_string()),
    }
}

fn scalar_to_yaml(scalar: &Scalar) -> Yaml {
    match scalar.style {
        ScalarStyle::Plain => plain_token(&scalar.value),
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => Yaml::String(scalar.value.clone()),
    }
}

fn to_yaml(node: &Node) -> Yaml {
    match node {
        Node::Scalar(scalar) => scalar_to_yaml(scalar),
        Node::Sequence(items) => Yaml::Array(items.iter().map(to_yaml).collect()),
        Node::Mapping(map) => Yaml::Hash(
            map.iter()
                .map(|(key, value)| (Yaml::String(key.clone()), to_yaml(value)))
                .collect(),
        ),
    }
}
