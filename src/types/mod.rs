//! SBON value kinds.

use std::fmt;

use crate::format::marker;

/// The kind of the next encoded value, as classified by its tag byte.
///
/// `UInt` covers the digit tags and `+`, `Int` covers `-`. Both can be read
/// with any numeric getter; the split only tells which sign the stream holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Null,
    String,
    Binary,
    Float,
    Double,
    Int,
    UInt,
    Array,
    Object,
}

impl Type {
    /// Classifies a tag byte, or returns `None` if it starts no value.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            marker::TRUE | marker::FALSE => Some(Self::Bool),
            marker::NULL => Some(Self::Null),
            marker::STRING => Some(Self::String),
            marker::BINARY => Some(Self::Binary),
            marker::FLOAT_32 => Some(Self::Float),
            marker::FLOAT_64 => Some(Self::Double),
            marker::POSITIVE => Some(Self::UInt),
            marker::NEGATIVE => Some(Self::Int),
            marker::ARRAY_START => Some(Self::Array),
            marker::OBJECT_START => Some(Self::Object),
            _ if marker::is_digit(tag) => Some(Self::UInt),
            _ => None,
        }
    }

    /// Returns `true` for the kinds `get_number` accepts.
    pub fn is_number(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::Int | Self::UInt)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Null => "null",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Float => "float32",
            Self::Double => "float64",
            Self::Int => "negative integer",
            Self::UInt => "unsigned integer",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}
