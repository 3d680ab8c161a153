//! Codec traits and implementations for primitive values

use indexmap::IndexMap;

use crate::cursor::{unexpected, Cursor};
use crate::emitter::Emitter;
use crate::error::{DocError, DocResult};
use crate::event::EventKind;
use crate::node::Node;

/// Types that can be read from a document cursor
pub trait Decode: Sized {
    fn decode(cursor: &mut Cursor) -> DocResult<Self>;
}

/// Types that can be written to an emitter
pub trait Encode {
    fn encode(&self, out: &mut Emitter);
}

/// Per-element codec plugged into container adapters.
///
/// The same generic container serves vectors, floats, file references and
/// keyed wrappers; the owner picks the element codec for each field.
pub trait ElementCodec<T> {
    fn decode_element(&self, cursor: &mut Cursor) -> DocResult<T>;
    fn encode_element(&self, value: &T, out: &mut Emitter);
}

/// Element codec that defers to the element's own `Decode`/`Encode`
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: Decode + Encode> ElementCodec<T> for Natural {
    fn decode_element(&self, cursor: &mut Cursor) -> DocResult<T> {
        T::decode(cursor)
    }

    fn encode_element(&self, value: &T, out: &mut Emitter) {
        value.encode(out);
    }
}

impl Decode for String {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        if cursor.next_is_null() {
            return Ok(String::new());
        }
        Ok(cursor.expect_scalar()?.value)
    }
}

impl Encode for String {
    fn encode(&self, out: &mut Emitter) {
        out.scalar(self);
    }
}

impl Encode for str {
    fn encode(&self, out: &mut Emitter) {
        out.scalar(self);
    }
}

impl Decode for bool {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let line = cursor.line();
        let scalar = cursor.expect_scalar()?;
        match scalar.value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(DocError::InvalidScalar {
                line,
                expected: "boolean",
                value: scalar.value,
            }),
        }
    }
}

impl Encode for bool {
    fn encode(&self, out: &mut Emitter) {
        out.plain(if *self { "true" } else { "false" });
    }
}

macro_rules! float_codec {
    ($ty:ty) => {
        impl Decode for $ty {
            fn decode(cursor: &mut Cursor) -> DocResult<Self> {
                let line = cursor.line();
                let scalar = cursor.expect_scalar()?;
                let text = scalar.value.trim();
                let special = match text {
                    ".nan" | ".NaN" | ".NAN" => Some(<$ty>::NAN),
                    ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(<$ty>::INFINITY),
                    "-.inf" | "-.Inf" | "-.INF" => Some(<$ty>::NEG_INFINITY),
                    _ => None,
                };
                match special {
                    Some(value) => Ok(value),
                    None => text.parse().map_err(|_| DocError::InvalidScalar {
                        line,
                        expected: "number",
                        value: scalar.value.clone(),
                    }),
                }
            }
        }

        impl Encode for $ty {
            fn encode(&self, out: &mut Emitter) {
                if self.is_nan() {
                    out.plain(".nan");
                } else if self.is_infinite() {
                    out.plain(if *self > 0.0 { ".inf" } else { "-.inf" });
                } else {
                    // Display is the shortest text that parses back to the same value.
                    out.plain(&self.to_string());
                }
            }
        }
    };
}

float_codec!(f32);
float_codec!(f64);

macro_rules! integer_codec {
    ($ty:ty) => {
        impl Decode for $ty {
            fn decode(cursor: &mut Cursor) -> DocResult<Self> {
                cursor.parse_scalar("integer")
            }
        }

        impl Encode for $ty {
            fn encode(&self, out: &mut Emitter) {
                out.plain(&self.to_string());
            }
        }
    };
}

integer_codec!(u32);
integer_codec!(i32);
integer_codec!(u64);

impl<T: Decode> Decode for Vec<T> {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        if cursor.next_is_null() {
            return Ok(Vec::new());
        }
        cursor.expect_sequence_start()?;
        let mut items = Vec::new();
        while !cursor.next_is_sequence_end()? {
            items.push(T::decode(cursor)?);
        }
        Ok(items)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Emitter) {
        self.as_slice().encode(out);
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut Emitter) {
        out.sequence_start();
        for item in self {
            item.encode(out);
        }
        out.sequence_end();
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        if cursor.next_is_null() {
            return Ok(None);
        }
        T::decode(cursor).map(Some)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, out: &mut Emitter) {
        match self {
            Some(value) => value.encode(out),
            None => out.null(),
        }
    }
}

impl Decode for Node {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let event = cursor.next_event()?;
        match event.kind {
            EventKind::Scalar(scalar) => Ok(Node::Scalar(scalar)),
            EventKind::SequenceStart => {
                let mut items = Vec::new();
                while !cursor.next_is_sequence_end()? {
                    items.push(Node::decode(cursor)?);
                }
                Ok(Node::Sequence(items))
            }
            EventKind::MappingStart => {
                let mut map = IndexMap::new();
                while !cursor.next_is_mapping_end()? {
                    let key = cursor.expect_scalar()?.value;
                    let value = Node::decode(cursor)?;
                    map.insert(key, value);
                }
                Ok(Node::Mapping(map))
            }
            EventKind::MappingEnd | EventKind::SequenceEnd => Err(unexpected(&event, "node")),
        }
    }
}

impl Encode for Node {
    fn encode(&self, out: &mut Emitter) {
        out.node(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, to_string};

    #[test]
    fn test_floats() {
        assert_eq!(from_str::<f32>("2.5").unwrap(), 2.5);
        assert_eq!(from_str::<f32>("-0.125").unwrap(), -0.125);
        assert_eq!(from_str::<f32>("1e3").unwrap(), 1000.0);
        assert!(from_str::<f32>(".nan").unwrap().is_nan());
        assert_eq!(from_str::<f64>("-.inf").unwrap(), f64::NEG_INFINITY);

        assert_eq!(to_string(&2.5f32), "2.5\n");
        assert_eq!(to_string(&0.1f32), "0.1\n");
        assert_eq!(to_string(&1.0f32), "1\n");
        assert_eq!(to_string(&f32::INFINITY), ".inf\n");

        let value = 0.1f32 + 0.2f32;
        assert_eq!(from_str::<f32>(&to_string(&value)).unwrap(), value);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(to_string(&true), "true\n");
        assert_eq!(to_string(&false), "false\n");
        assert!(from_str::<bool>("True").unwrap());
        assert!(!from_str::<bool>("FALSE").unwrap());
        assert!(matches!(
            from_str::<bool>("yes"),
            Err(DocError::InvalidScalar { expected: "boolean", .. })
        ));
    }

    #[test]
    fn test_strings_keep_their_text() {
        for text in ["plain", "", "true", "3.5", "a: b", "# not a comment", "it's"] {
            assert_eq!(from_str::<String>(&to_string(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_sequences_and_options() {
        let values: Vec<u32> = from_str("[1, 2, 3]").unwrap();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(to_string(&values), "- 1\n- 2\n- 3\n");
        assert_eq!(from_str::<Vec<u32>>("~").unwrap(), Vec::<u32>::new());
        assert_eq!(from_str::<Option<i32>>("null").unwrap(), None);
        assert_eq!(from_str::<Option<i32>>("-4").unwrap(), Some(-4));
    }

    #[test]
    fn test_node_preserves_structure() {
        let source = "a: 1\nb:\n  - x\n  - y: \"true\"\nc: {}\n";
        let node: Node = from_str(source).unwrap();
        assert_eq!(node.get("a").and_then(Node::as_str), Some("1"));
        assert_eq!(node.get("b").and_then(Node::as_sequence).map(|s| s.len()), Some(2));
        assert_eq!(to_string(&node), source);
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        assert!(matches!(
            from_str::<Vec<u32>>("a: 1"),
            Err(DocError::UnexpectedNode { expected: "sequence", .. })
        ));
        assert!(from_str::<u32>("[1]").is_err());
    }
}
