//! # Forge Doc
//!
//! Streaming codec for Forge asset documents.
//!
//! Text is read into a flat event stream; decoders walk that stream through
//! a shared [`Cursor`] and never materialise the whole tree first. The
//! write side goes through an [`Emitter`] that produces block-style text
//! with a fixed layout, so re-saving an unchanged entity is byte-stable.
//!
//! ```ignore
//! let values: Vec<f32> = forge_doc::from_str("[1, 2.5]")?;
//! assert_eq!(forge_doc::to_string(&values), "- 1\n- 2.5\n");
//! ```

pub mod codec;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod event;
pub mod node;
pub mod reader;
pub mod schema;

pub use codec::{Decode, ElementCodec, Encode, Natural};
pub use cursor::Cursor;
pub use emitter::Emitter;
pub use error::{DocError, DocResult};
pub use event::{Event, EventKind, Scalar, ScalarStyle};
pub use node::Node;
pub use reader::Reader;
pub use schema::{Field, FieldTable};

/// Decode a whole document
pub fn from_str<T: Decode>(source: &str) -> DocResult<T> {
    let mut cursor = Cursor::parse(source)?;
    let value = T::decode(&mut cursor)?;
    cursor.finish()?;
    Ok(value)
}

/// Encode a value as a whole document
pub fn to_string<T: Encode + ?Sized>(value: &T) -> String {
    let mut out = Emitter::new();
    value.encode(&mut out);
    out.finish()
}

/// Prelude
pub mod prelude {
    pub use crate::{
        Cursor, Decode, DocError, DocResult, ElementCodec, Emitter, Encode, Field, FieldTable,
        Natural, Node,
    };
}
