//! SBON binary encoding format.
//!
//! Every value starts with a one-byte tag. Scalars carry fixed or
//! self-delimiting payloads; arrays and objects are bracketed by opening and
//! closing tags with no length prefix. Multi-byte numbers are little-endian.

pub mod decode;
pub mod encode;
pub mod marker;
pub mod matcher;
pub mod number;
pub mod source;
pub mod varint;

pub use decode::{decode, ArrayReader, Decoder, DecoderBuilder, ObjectReader, Reader};
pub use encode::{encode, Encoder, ObjectWriter, Writer};
pub use matcher::Field;
pub use number::Number;
