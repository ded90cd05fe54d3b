//! Renders SBON values as indented JSON.
//!
//! Uses only the public decoding surface: `get_type`, the typed getters, and
//! `has_next`/`next` on arrays and objects. Keys are read as raw bytes, the
//! same way string values are.

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::Result;
use crate::format::{ArrayReader, ObjectReader, Reader};
use crate::types::Type;

const INDENT: &[u8] = b"  ";

/// Writes the value at `reader` to `out` as JSON.
///
/// Binary blobs become `"HEX:..."` strings and non-finite floats become
/// `null`, since JSON has no representation for either.
pub fn write_json<S: BufRead, W: Write>(reader: Reader<'_, S>, out: &mut W) -> Result<()> {
    write_value(reader, out, 0)
}

fn write_value<S: BufRead, W: Write>(
    reader: Reader<'_, S>,
    out: &mut W,
    depth: usize,
) -> Result<()> {
    match reader.get_type()? {
        Type::Bool => {
            let text: &[u8] = if reader.get_bool()? { b"true" } else { b"false" };
            out.write_all(text)?;
        }
        Type::Null => {
            reader.get_nil()?;
            out.write_all(b"null")?;
        }
        Type::String => write_string(&reader.get_string_bytes()?, out)?,
        Type::Binary => write_binary(&reader.get_binary()?, out)?,
        Type::Float => {
            let value = reader.get_f32()?;
            write_float(value, value.is_finite(), out)?;
        }
        Type::Double => {
            let value = reader.get_f64()?;
            write_float(value, value.is_finite(), out)?;
        }
        // i128 holds every magnitude a `-` varint can carry.
        Type::Int => write!(out, "{}", reader.get_number::<i128>()?)?,
        Type::UInt => write!(out, "{}", reader.get_u64()?)?,
        Type::Array => reader.get_array(|arr| write_array(arr, out, depth))?,
        Type::Object => reader.get_object(|obj| write_object(obj, out, depth))?,
    }
    Ok(())
}

fn write_array<S: BufRead, W: Write>(
    arr: ArrayReader<'_, S>,
    out: &mut W,
    depth: usize,
) -> Result<()> {
    out.write_all(b"[\n")?;
    while arr.has_next()? {
        indent(depth + 1, out)?;
        write_value(arr.next()?, out, depth + 1)?;
        if arr.has_next()? {
            out.write_all(b",")?;
        }
        out.write_all(b"\n")?;
    }
    indent(depth, out)?;
    out.write_all(b"]")?;
    Ok(())
}

fn write_object<S: BufRead, W: Write>(
    obj: ObjectReader<'_, S>,
    out: &mut W,
    depth: usize,
) -> Result<()> {
    out.write_all(b"{\n")?;
    while obj.has_next()? {
        let (key, value) = obj.next_bytes()?;
        indent(depth + 1, out)?;
        write_string(&key, out)?;
        out.write_all(b": ")?;
        write_value(value, out, depth + 1)?;
        if obj.has_next()? {
            out.write_all(b",")?;
        }
        out.write_all(b"\n")?;
    }
    indent(depth, out)?;
    out.write_all(b"}")?;
    Ok(())
}

fn indent<W: Write>(depth: usize, out: &mut W) -> Result<()> {
    for _ in 0..depth {
        out.write_all(INDENT)?;
    }
    Ok(())
}

// Each width prints through its own `Display`, so an f32 is not widened first.
fn write_float<W: Write>(value: impl fmt::Display, finite: bool, out: &mut W) -> Result<()> {
    if finite {
        write!(out, "{value}")?;
    } else {
        out.write_all(b"null")?;
    }
    Ok(())
}

fn write_binary<W: Write>(bytes: &[u8], out: &mut W) -> Result<()> {
    out.write_all(b"\"HEX:")?;
    for byte in bytes {
        write!(out, "{byte:02X}")?;
    }
    out.write_all(b"\"")?;
    Ok(())
}

/// Writes a JSON string literal. Bytes at or above 0x20 pass through
/// unchanged, so UTF-8 text stays UTF-8.
fn write_string<W: Write>(bytes: &[u8], out: &mut W) -> Result<()> {
    out.write_all(b"\"")?;
    for &byte in bytes {
        match byte {
            b'"' => out.write_all(b"\\\"")?,
            b'\\' => out.write_all(b"\\\\")?,
            0x08 => out.write_all(b"\\b")?,
            0x0C => out.write_all(b"\\f")?,
            b'\n' => out.write_all(b"\\n")?,
            b'\r' => out.write_all(b"\\r")?,
            b'\t' => out.write_all(b"\\t")?,
            0x00..=0x1F => write!(out, "\\u{byte:04X}")?,
            _ => out.write_all(&[byte])?,
        }
    }
    out.write_all(b"\"")?;
    Ok(())
}
