//! Unsigned LEB128 varints: 7 bits per byte, least-significant group first,
//! high bit set on every byte but the last.

use std::io::BufRead;

use bytes::BufMut;

use super::source::read_byte;
use crate::error::{Result, SbonError};

/// Longest encoding of a `u64` (ceil(64 / 7) groups).
pub const MAX_VARINT_LEN: usize = 10;

/// Writes `value` using the minimal number of groups.
pub fn write_varint(buf: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Reads a varint, rejecting anything that does not fit in 64 bits.
pub fn read_varint(src: &mut impl BufRead) -> Result<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = read_byte(src)?;
        let group = u64::from(byte & 0x7F);
        // The last group only has one bit left to contribute.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(SbonError::IntegerTooLarge);
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(SbonError::IntegerTooLarge)
}
