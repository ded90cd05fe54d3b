//! SBON encoding: writer cursors over a `BufMut` sink.

use bytes::{BufMut, Bytes, BytesMut};

use super::marker;
use super::varint::write_varint;
use crate::cursor::{Limits, Stream};
use crate::error::{Result, SbonError};

/// Owns a sink and the nesting state shared by all writers over it.
pub struct Encoder<B> {
    stream: Stream<B>,
}

impl<B: BufMut> Encoder<B> {
    pub fn new(sink: B) -> Self {
        Self {
            stream: Stream::new(sink, Limits::unbounded()),
        }
    }

    /// Returns the top-level writer.
    pub fn writer(&self) -> Writer<'_, B> {
        Writer {
            stream: &self.stream,
            depth: 0,
        }
    }

    /// Returns the sink with everything written so far.
    pub fn into_inner(self) -> B {
        self.stream.into_inner()
    }
}

/// Runs `f` with a top-level writer and returns the bytes it produced.
///
/// ```
/// let bytes = sbon::encode(|w| {
///     w.write_object(|obj| {
///         obj.key("answer")?.write_uint(42)?;
///         obj.key("ok")?.write_true()
///     })
/// })
/// .unwrap();
/// assert_eq!(&bytes[..], b"{answer\0+*ok\0T}");
/// ```
pub fn encode(f: impl FnOnce(Writer<'_, BytesMut>) -> Result<()>) -> Result<Bytes> {
    let encoder = Encoder::new(BytesMut::new());
    f(encoder.writer())?;
    Ok(encoder.into_inner().freeze())
}

/// Writes values at one position in the stream.
///
/// The top-level writer and the writers handed to [`Writer::write_array`]
/// callbacks may write any number of values in sequence. A writer returned by
/// [`ObjectWriter::key`] must write exactly one.
pub struct Writer<'s, B> {
    stream: &'s Stream<B>,
    depth: usize,
}

impl<B> Clone for Writer<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for Writer<'_, B> {}

impl<'s, B: BufMut> Writer<'s, B> {
    fn put(&self, f: impl FnOnce(&mut B)) -> Result<()> {
        self.stream.ensure_ready(self.depth)?;
        self.stream.with(f);
        Ok(())
    }

    pub fn write_true(&self) -> Result<()> {
        self.put(|buf| buf.put_u8(marker::TRUE))
    }

    pub fn write_false(&self) -> Result<()> {
        self.put(|buf| buf.put_u8(marker::FALSE))
    }

    pub fn write_bool(&self, value: bool) -> Result<()> {
        if value {
            self.write_true()
        } else {
            self.write_false()
        }
    }

    pub fn write_null(&self) -> Result<()> {
        self.put(|buf| buf.put_u8(marker::NULL))
    }

    /// Writes a NUL-terminated string. Strings containing NUL are rejected
    /// with `InvalidArgument` and nothing is written.
    pub fn write_string(&self, value: &str) -> Result<()> {
        check_no_nul("string", value)?;
        self.put(|buf| {
            buf.put_u8(marker::STRING);
            buf.put_slice(value.as_bytes());
            buf.put_u8(marker::STRING_TERMINATOR);
        })
    }

    /// Writes a length-prefixed blob; the bytes are copied verbatim.
    pub fn write_binary(&self, value: &[u8]) -> Result<()> {
        self.put(|buf| {
            buf.put_u8(marker::BINARY);
            write_varint(buf, value.len() as u64);
            buf.put_slice(value);
        })
    }

    pub fn write_f32(&self, value: f32) -> Result<()> {
        self.put(|buf| {
            buf.put_u8(marker::FLOAT_32);
            buf.put_f32_le(value);
        })
    }

    pub fn write_f64(&self, value: f64) -> Result<()> {
        self.put(|buf| {
            buf.put_u8(marker::FLOAT_64);
            buf.put_f64_le(value);
        })
    }

    /// Writes a signed integer in its canonical form: a digit for `0..=9`,
    /// otherwise a sign tag and the varint magnitude.
    pub fn write_int(&self, value: i64) -> Result<()> {
        match u64::try_from(value) {
            Ok(unsigned) => self.write_uint(unsigned),
            // unsigned_abs covers i64::MIN, whose magnitude is i64::MAX + 1.
            Err(_) => self.put(|buf| {
                buf.put_u8(marker::NEGATIVE);
                write_varint(buf, value.unsigned_abs());
            }),
        }
    }

    pub fn write_uint(&self, value: u64) -> Result<()> {
        self.put(|buf| match marker::digit(value) {
            Some(digit) => buf.put_u8(digit),
            None => {
                buf.put_u8(marker::POSITIVE);
                write_varint(buf, value);
            }
        })
    }

    /// Writes an array whose elements `f` produces through the child writer.
    ///
    /// This writer is locked until `f` returns. Output is not rolled back if
    /// `f` fails.
    pub fn write_array<T>(&self, f: impl FnOnce(Writer<'s, B>) -> Result<T>) -> Result<T> {
        let scope = self.stream.enter(self.depth)?;
        self.stream.with(|buf| buf.put_u8(marker::ARRAY_START));
        let value = f(Writer {
            stream: self.stream,
            depth: scope.child_depth(),
        })?;
        drop(scope);
        self.put(|buf| buf.put_u8(marker::ARRAY_END))?;
        Ok(value)
    }

    /// Writes an object whose entries `f` produces through the child writer.
    pub fn write_object<T>(&self, f: impl FnOnce(ObjectWriter<'s, B>) -> Result<T>) -> Result<T> {
        let scope = self.stream.enter(self.depth)?;
        self.stream.with(|buf| buf.put_u8(marker::OBJECT_START));
        let value = f(ObjectWriter {
            stream: self.stream,
            depth: scope.child_depth(),
        })?;
        drop(scope);
        self.put(|buf| buf.put_u8(marker::OBJECT_END))?;
        Ok(value)
    }
}

/// Writes the key/value entries of one object.
pub struct ObjectWriter<'s, B> {
    stream: &'s Stream<B>,
    depth: usize,
}

impl<B> Clone for ObjectWriter<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for ObjectWriter<'_, B> {}

impl<'s, B: BufMut> ObjectWriter<'s, B> {
    /// Writes `key` and returns the writer for its value, which must write
    /// exactly one value before the next key.
    ///
    /// Keys containing NUL or starting with `}` are rejected with
    /// `InvalidArgument`; a reader would take that `}` for the object's end.
    pub fn key(&self, key: &str) -> Result<Writer<'s, B>> {
        check_no_nul("key", key)?;
        if key.as_bytes().first() == Some(&marker::OBJECT_END) {
            return Err(SbonError::InvalidArgument(format!(
                "key {key:?} starts with the object terminator"
            )));
        }
        self.stream.ensure_ready(self.depth)?;
        self.stream.with(|buf| {
            buf.put_slice(key.as_bytes());
            buf.put_u8(marker::STRING_TERMINATOR);
        });
        Ok(Writer {
            stream: self.stream,
            depth: self.depth,
        })
    }

    /// Writes `key`, then lets `f` write its value.
    pub fn field<T>(&self, key: &str, f: impl FnOnce(Writer<'s, B>) -> Result<T>) -> Result<T> {
        f(self.key(key)?)
    }
}

fn check_no_nul(what: &str, value: &str) -> Result<()> {
    match value.bytes().position(|b| b == 0) {
        Some(pos) => Err(SbonError::InvalidArgument(format!(
            "{what} contains a NUL byte at offset {pos}"
        ))),
        None => Ok(()),
    }
}
