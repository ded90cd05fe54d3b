//! SBON tag byte constants.

// Bool
pub const TRUE: u8 = b'T';
pub const FALSE: u8 = b'F';

// Null
pub const NULL: u8 = b'N';

// String: payload bytes, then a single 0x00 terminator
pub const STRING: u8 = b'S';
pub const STRING_TERMINATOR: u8 = 0x00;

// Binary: varint length, then raw bytes
pub const BINARY: u8 = b'B';

// Floats (IEEE 754, little-endian)
pub const FLOAT_32: u8 = b'f';
pub const FLOAT_64: u8 = b'd';

// SMALL_UINT: '0'..='9', the digit is the value
pub const DIGIT_ZERO: u8 = b'0';
pub const DIGIT_NINE: u8 = b'9';

// Integers outside 0..=9: varint magnitude
pub const POSITIVE: u8 = b'+';
pub const NEGATIVE: u8 = b'-';

// Compounds, no length prefix
pub const ARRAY_START: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const OBJECT_START: u8 = b'{';
pub const OBJECT_END: u8 = b'}';

/// Largest magnitude with a single-digit encoding.
pub const MAX_DIGIT_VALUE: u64 = 9;

pub fn is_digit(tag: u8) -> bool {
    (DIGIT_ZERO..=DIGIT_NINE).contains(&tag)
}

/// Returns the digit tag for `value`, or `None` outside `0..=9`.
pub fn digit(value: u64) -> Option<u8> {
    (value <= MAX_DIGIT_VALUE).then(|| DIGIT_ZERO + value as u8)
}
