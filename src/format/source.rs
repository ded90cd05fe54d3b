//! Byte-level primitives over a blocking `BufRead` source.

use std::io::{BufRead, Read};

use crate::error::{Result, SbonError};

/// Returns the next byte without consuming it, or `None` at end of stream.
pub fn peek_byte(src: &mut impl BufRead) -> Result<Option<u8>> {
    Ok(src.fill_buf()?.first().copied())
}

/// Consumes and returns the next byte.
pub fn read_byte(src: &mut impl BufRead) -> Result<u8> {
    let byte = peek_byte(src)?.ok_or(SbonError::UnexpectedEndOfInput)?;
    src.consume(1);
    Ok(byte)
}

/// Reads up to and including the next NUL, returning the bytes before it.
pub fn read_until_nul(src: &mut impl BufRead, limit: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let (found, used) = {
            let available = src.fill_buf()?;
            if available.is_empty() {
                return Err(SbonError::UnexpectedEndOfInput);
            }
            match available.iter().position(|&b| b == 0) {
                Some(pos) => {
                    out.extend_from_slice(&available[..pos]);
                    (true, pos + 1)
                }
                None => {
                    out.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        src.consume(used);
        check_length(out.len() as u64, limit)?;
        if found {
            return Ok(out);
        }
    }
}

/// Discards bytes up to and including the next NUL.
pub fn skip_until_nul(src: &mut impl BufRead) -> Result<()> {
    loop {
        let (found, used) = {
            let available = src.fill_buf()?;
            if available.is_empty() {
                return Err(SbonError::UnexpectedEndOfInput);
            }
            match available.iter().position(|&b| b == 0) {
                Some(pos) => (true, pos + 1),
                None => (false, available.len()),
            }
        };
        src.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Reads exactly `len` bytes. Memory grows with the data actually received,
/// not with the declared length.
pub fn read_vec(src: &mut impl BufRead, len: u64) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let read = src.by_ref().take(len).read_to_end(&mut out)?;
    if (read as u64) < len {
        return Err(SbonError::UnexpectedEndOfInput);
    }
    Ok(out)
}

/// Discards exactly `len` bytes.
pub fn skip_bytes(src: &mut impl BufRead, len: u64) -> Result<()> {
    let skipped = std::io::copy(&mut src.by_ref().take(len), &mut std::io::sink())?;
    if skipped < len {
        return Err(SbonError::UnexpectedEndOfInput);
    }
    Ok(())
}

pub fn read_array<const N: usize>(src: &mut impl BufRead) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    src.read_exact(&mut out).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => SbonError::UnexpectedEndOfInput,
        _ => SbonError::Io(e),
    })?;
    Ok(out)
}

pub fn check_length(len: u64, limit: usize) -> Result<()> {
    if len > limit as u64 {
        Err(SbonError::LengthLimitExceeded { len, limit })
    } else {
        Ok(())
    }
}
