//! Value types shared by asset documents

use core::fmt;

use forge_doc::{Cursor, Decode, DocError, DocResult, Emitter, Encode};
use forge_observe::Observable;

/// Opaque asset identifier.
///
/// Equality and hashing are by string. An empty id refers to nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id that refers to nothing
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Observable for FileId {}

impl Decode for FileId {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        String::decode(cursor).map(Self)
    }
}

impl Encode for FileId {
    fn encode(&self, out: &mut Emitter) {
        if self.is_none() {
            out.null();
        } else {
            out.scalar(&self.0);
        }
    }
}

/// Four-component vector, written as `[x, y, z, w]`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Observable for Vec4 {}

impl Decode for Vec4 {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let line = cursor.line();
        let components: Vec<f32> = cursor.decode()?;
        match <[f32; 4]>::try_from(components) {
            Ok(array) => Ok(array.into()),
            Err(components) => Err(DocError::UnexpectedNode {
                line,
                expected: "4-component vector",
                found: format!("{} components", components.len()),
            }),
        }
    }
}

impl Encode for Vec4 {
    fn encode(&self, out: &mut Emitter) {
        out.emit(&self.to_array()[..]);
    }
}
