//! SBON decoding: pull-based reader cursors over a `BufRead` source.

use std::io::BufRead;

use super::marker;
use super::number::{Number, RawNumber};
use super::source::{
    check_length, peek_byte, read_array, read_until_nul, read_vec, skip_bytes, skip_until_nul,
};
use super::varint::read_varint;
use crate::cursor::{Limits, Stream};
use crate::error::{Result, SbonError};
use crate::types::Type;

/// Owns a source and the nesting state shared by all readers over it.
pub struct Decoder<S> {
    stream: Stream<S>,
}

impl<S: BufRead> Decoder<S> {
    /// Creates a decoder with default limits.
    pub fn new(source: S) -> Self {
        Self::builder(source).build()
    }

    /// Starts configuring a decoder.
    pub fn builder(source: S) -> DecoderBuilder<S> {
        DecoderBuilder {
            source,
            limits: Limits::default(),
        }
    }

    /// Returns the top-level reader.
    pub fn reader(&self) -> Reader<'_, S> {
        Reader {
            stream: &self.stream,
            depth: 0,
        }
    }

    pub fn limits(&self) -> Limits {
        self.stream.limits()
    }

    /// Returns the source, positioned after everything consumed so far.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

/// Builder for configuring a [`Decoder`].
pub struct DecoderBuilder<S> {
    source: S,
    limits: Limits,
}

impl<S: BufRead> DecoderBuilder<S> {
    /// Sets the maximum array/object nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_depth = depth;
        self
    }

    /// Sets the maximum length of strings, keys and binary payloads.
    pub fn max_length(mut self, length: usize) -> Self {
        self.limits.max_length = length;
        self
    }

    pub fn build(self) -> Decoder<S> {
        Decoder {
            stream: Stream::new(self.source, self.limits),
        }
    }
}

/// Creates a decoder with default limits over `source`.
///
/// ```
/// let decoder = sbon::decode(&b"[T3]"[..]);
/// let reader = decoder.reader();
/// let (flag, n) = reader
///     .get_array(|arr| Ok((arr.next()?.get_bool()?, arr.next()?.get_u64()?)))
///     .unwrap();
/// assert!(flag);
/// assert_eq!(n, 3);
/// assert!(!reader.has_next().unwrap());
/// ```
pub fn decode<S: BufRead>(source: S) -> Decoder<S> {
    Decoder::new(source)
}

/// Consumes the next byte if `accept` approves it. A rejected tag is left in
/// the stream.
fn take_tag(
    src: &mut impl BufRead,
    expected: &'static str,
    accept: impl FnOnce(u8) -> bool,
) -> Result<u8> {
    let tag = peek_byte(src)?.ok_or(SbonError::UnexpectedEndOfInput)?;
    if !accept(tag) {
        return Err(SbonError::TagMismatch {
            expected,
            found: tag,
        });
    }
    src.consume(1);
    Ok(tag)
}

fn read_number(src: &mut impl BufRead) -> Result<RawNumber> {
    let tag = take_tag(src, "number", |t| Type::from_tag(t).is_some_and(Type::is_number))?;
    let raw = match tag {
        marker::POSITIVE => RawNumber::UInt(read_varint(src)?),
        marker::NEGATIVE => RawNumber::NegInt(read_varint(src)?),
        marker::FLOAT_32 => RawNumber::F32(f32::from_le_bytes(read_array(src)?)),
        marker::FLOAT_64 => RawNumber::F64(f64::from_le_bytes(read_array(src)?)),
        digit => RawNumber::UInt(u64::from(digit - marker::DIGIT_ZERO)),
    };
    Ok(raw)
}

/// Reads one value at a position in the stream.
///
/// The top-level reader may read any number of concatenated values. Readers
/// returned by [`ArrayReader::next`] and [`ObjectReader::next`] must fully
/// consume (or [`skip`](Reader::skip)) exactly one value before the parent
/// moves on.
pub struct Reader<'s, S> {
    stream: &'s Stream<S>,
    depth: usize,
}

impl<S> Clone for Reader<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Reader<'_, S> {}

impl<'s, S: BufRead> Reader<'s, S> {
    fn io<T>(&self, f: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
        self.stream.ensure_ready(self.depth)?;
        self.stream.with(f)
    }

    fn max_length(&self) -> usize {
        self.stream.limits().max_length
    }

    /// Returns `true` unless the stream is at its end.
    pub fn has_next(&self) -> Result<bool> {
        self.io(|src| Ok(peek_byte(src)?.is_some()))
    }

    /// Classifies the next value without consuming anything.
    pub fn get_type(&self) -> Result<Type> {
        self.io(|src| {
            let tag = peek_byte(src)?.ok_or(SbonError::UnexpectedEndOfInput)?;
            Type::from_tag(tag).ok_or(SbonError::UnrecognizedTag(tag))
        })
    }

    pub fn get_bool(&self) -> Result<bool> {
        self.io(|src| {
            let tag = take_tag(src, "bool", |t| t == marker::TRUE || t == marker::FALSE)?;
            Ok(tag == marker::TRUE)
        })
    }

    pub fn get_nil(&self) -> Result<()> {
        self.io(|src| take_tag(src, "null", |t| t == marker::NULL).map(drop))
    }

    /// Reads a string whose payload must be UTF-8.
    pub fn get_string(&self) -> Result<String> {
        String::from_utf8(self.get_string_bytes()?).map_err(|_| SbonError::InvalidUtf8)
    }

    /// Reads the raw payload of a string, whatever its encoding.
    pub fn get_string_bytes(&self) -> Result<Vec<u8>> {
        let limit = self.max_length();
        self.io(|src| {
            take_tag(src, "string", |t| t == marker::STRING)?;
            read_until_nul(src, limit)
        })
    }

    pub fn skip_string(&self) -> Result<()> {
        self.io(|src| {
            take_tag(src, "string", |t| t == marker::STRING)?;
            skip_until_nul(src)
        })
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        let limit = self.max_length();
        self.io(|src| {
            take_tag(src, "binary", |t| t == marker::BINARY)?;
            let len = read_varint(src)?;
            check_length(len, limit)?;
            read_vec(src, len)
        })
    }

    pub fn skip_binary(&self) -> Result<()> {
        self.io(|src| {
            take_tag(src, "binary", |t| t == marker::BINARY)?;
            let len = read_varint(src)?;
            skip_bytes(src, len)
        })
    }

    /// Reads any numeric encoding and converts it to `T` exactly.
    ///
    /// Fails with `LossyNarrowing` if the stored value cannot be represented
    /// as `T` without change, e.g. `1.5` as an integer or `u64::MAX` as `u32`.
    pub fn get_number<T: Number>(&self) -> Result<T> {
        let raw = self.io(|src| read_number(src))?;
        T::from_raw(raw).ok_or(SbonError::LossyNarrowing { target: T::NAME })
    }

    pub fn get_f32(&self) -> Result<f32> {
        self.get_number()
    }

    pub fn get_f64(&self) -> Result<f64> {
        self.get_number()
    }

    pub fn get_i64(&self) -> Result<i64> {
        self.get_number()
    }

    pub fn get_u64(&self) -> Result<u64> {
        self.get_number()
    }

    /// Enters an array and lets `f` traverse it.
    ///
    /// This reader is locked until `f` returns. `f` must consume every
    /// element; the closing `]` is required to follow.
    pub fn get_array<T>(&self, f: impl FnOnce(ArrayReader<'s, S>) -> Result<T>) -> Result<T> {
        let scope = self.stream.enter(self.depth)?;
        self.stream
            .with(|src| take_tag(src, "'['", |t| t == marker::ARRAY_START))?;
        let value = f(ArrayReader {
            stream: self.stream,
            depth: scope.child_depth(),
        })?;
        drop(scope);
        self.io(|src| take_tag(src, "']'", |t| t == marker::ARRAY_END))?;
        Ok(value)
    }

    /// Calls `f` for every element of an array, in stream order.
    pub fn read_array(&self, mut f: impl FnMut(Reader<'s, S>) -> Result<()>) -> Result<()> {
        self.get_array(|arr| {
            while arr.has_next()? {
                f(arr.next()?)?;
            }
            Ok(())
        })
    }

    /// Enters an object and lets `f` traverse it.
    pub fn get_object<T>(&self, f: impl FnOnce(ObjectReader<'s, S>) -> Result<T>) -> Result<T> {
        let scope = self.stream.enter(self.depth)?;
        self.stream
            .with(|src| take_tag(src, "'{'", |t| t == marker::OBJECT_START))?;
        let value = f(ObjectReader {
            stream: self.stream,
            depth: scope.child_depth(),
        })?;
        drop(scope);
        self.io(|src| take_tag(src, "'}'", |t| t == marker::OBJECT_END))?;
        Ok(value)
    }

    /// Calls `f` for every entry of an object, in stream order. Duplicate keys
    /// are reported as often as they occur.
    pub fn read_object(&self, mut f: impl FnMut(&str, Reader<'s, S>) -> Result<()>) -> Result<()> {
        self.get_object(|obj| {
            while obj.has_next()? {
                let (key, value) = obj.next()?;
                f(&key, value)?;
            }
            Ok(())
        })
    }

    /// Parses and discards the next value, whatever its shape.
    pub fn skip(&self) -> Result<()> {
        match self.get_type()? {
            Type::Bool => self.get_bool().map(drop),
            Type::Null => self.get_nil(),
            Type::String => self.skip_string(),
            Type::Binary => self.skip_binary(),
            Type::Float | Type::Double | Type::Int | Type::UInt => {
                self.io(|src| read_number(src)).map(drop)
            }
            Type::Array => self.read_array(|elem| elem.skip()),
            Type::Object => self.get_object(|obj| {
                while obj.has_next()? {
                    obj.next_skipping_key()?.skip()?;
                }
                Ok(())
            }),
        }
    }
}

/// Iterates the elements of one array.
pub struct ArrayReader<'s, S> {
    stream: &'s Stream<S>,
    depth: usize,
}

impl<S> Clone for ArrayReader<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ArrayReader<'_, S> {}

impl<'s, S: BufRead> ArrayReader<'s, S> {
    /// Returns `true` unless the next byte is `]` or the stream has ended.
    pub fn has_next(&self) -> Result<bool> {
        self.stream.ensure_ready(self.depth)?;
        let next = self.stream.with(|src| peek_byte(src))?;
        Ok(next.is_some_and(|b| b != marker::ARRAY_END))
    }

    /// Returns a reader for the next element.
    pub fn next(&self) -> Result<Reader<'s, S>> {
        self.stream.ensure_ready(self.depth)?;
        Ok(Reader {
            stream: self.stream,
            depth: self.depth,
        })
    }
}

/// Iterates the key/value entries of one object.
pub struct ObjectReader<'s, S> {
    stream: &'s Stream<S>,
    depth: usize,
}

impl<S> Clone for ObjectReader<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ObjectReader<'_, S> {}

impl<'s, S: BufRead> ObjectReader<'s, S> {
    /// Returns `true` unless the next byte is `}` or the stream has ended.
    pub fn has_next(&self) -> Result<bool> {
        self.stream.ensure_ready(self.depth)?;
        let next = self.stream.with(|src| peek_byte(src))?;
        Ok(next.is_some_and(|b| b != marker::OBJECT_END))
    }

    /// Reads the next key, which must be UTF-8, and returns it with a reader
    /// for its value.
    pub fn next(&self) -> Result<(String, Reader<'s, S>)> {
        let (key, value) = self.next_bytes()?;
        let key = String::from_utf8(key).map_err(|_| SbonError::InvalidUtf8)?;
        Ok((key, value))
    }

    /// Like [`next`](Self::next), but returns the raw key bytes whatever
    /// their encoding.
    pub fn next_bytes(&self) -> Result<(Vec<u8>, Reader<'s, S>)> {
        self.stream.ensure_ready(self.depth)?;
        let limit = self.stream.limits().max_length;
        let key = self.stream.with(|src| read_until_nul(src, limit))?;
        Ok((key, self.value_reader()))
    }

    pub(crate) fn next_skipping_key(&self) -> Result<Reader<'s, S>> {
        self.stream.ensure_ready(self.depth)?;
        self.stream.with(|src| skip_until_nul(src))?;
        Ok(self.value_reader())
    }

    fn value_reader(&self) -> Reader<'s, S> {
        Reader {
            stream: self.stream,
            depth: self.depth,
        }
    }
}
