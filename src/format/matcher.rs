//! Forward-compatible object decoding: dispatch known keys to handlers and
//! skip everything else.

use std::fmt;
use std::io::BufRead;

use super::decode::{ObjectReader, Reader};
use crate::error::Result;

/// A key and the handler invoked with the reader for its value.
///
/// The handler must consume (or skip) exactly one value.
pub struct Field<'h, 's, S> {
    key: &'h str,
    handler: &'h mut dyn FnMut(Reader<'s, S>) -> Result<()>,
}

impl<'h, 's, S> Field<'h, 's, S> {
    pub fn new(key: &'h str, handler: &'h mut dyn FnMut(Reader<'s, S>) -> Result<()>) -> Self {
        Self { key, handler }
    }

    pub fn key(&self) -> &str {
        self.key
    }
}

impl<S> fmt::Debug for Field<'_, '_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("key", &self.key).finish_non_exhaustive()
    }
}

impl<'s, S: BufRead> ObjectReader<'s, S> {
    /// Dispatches every remaining entry to the first field with an equal key.
    /// Entries without a field are skipped, including keys that are not UTF-8.
    pub fn match_fields(&self, fields: &mut [Field<'_, 's, S>]) -> Result<()> {
        while self.has_next()? {
            let (key, value) = self.next_bytes()?;
            match fields.iter_mut().find(|field| field.key.as_bytes() == key.as_slice()) {
                Some(field) => (field.handler)(value)?,
                None => {
                    let key = String::from_utf8_lossy(&key);
                    tracing::debug!(key = %key, "skipping unrecognized key");
                    value.skip()?;
                }
            }
        }
        Ok(())
    }
}

impl<'s, S: BufRead> Reader<'s, S> {
    /// Reads an object, handing each value to the field registered for its
    /// key and skipping unknown keys.
    ///
    /// ```
    /// use sbon::Field;
    ///
    /// let decoder = sbon::decode(&b"{a\x001z\0+\x63b\x002}"[..]);
    /// let (mut a, mut b) = (0u64, 0u64);
    /// decoder
    ///     .reader()
    ///     .match_object(&mut [
    ///         Field::new("a", &mut |v| {
    ///             a = v.get_u64()?;
    ///             Ok(())
    ///         }),
    ///         Field::new("b", &mut |v| {
    ///             b = v.get_u64()?;
    ///             Ok(())
    ///         }),
    ///     ])
    ///     .unwrap();
    /// assert_eq!((a, b), (1, 2));
    /// ```
    pub fn match_object(&self, fields: &mut [Field<'_, 's, S>]) -> Result<()> {
        self.get_object(|obj| obj.match_fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::SbonError;
    use crate::format::{decode, encode};

    fn sample() -> bytes::Bytes {
        encode(|w| {
            w.write_object(|obj| {
                obj.key("a")?.write_uint(1)?;
                obj.key("z")?.write_uint(99)?;
                obj.key("b")?.write_uint(2)
            })
        })
        .unwrap()
    }

    #[test]
    fn known_keys_dispatched_in_stream_order() {
        let bytes = sample();
        let dec = decode(&bytes[..]);
        let r = dec.reader();
        let calls = RefCell::new(Vec::new());
        r.match_object(&mut [
            Field::new("b", &mut |v| {
                calls.borrow_mut().push(("b", v.get_u64()?));
                Ok(())
            }),
            Field::new("a", &mut |v| {
                calls.borrow_mut().push(("a", v.get_u64()?));
                Ok(())
            }),
        ])
        .unwrap();
        assert_eq!(calls.into_inner(), [("a", 1), ("b", 2)]);
        assert!(!r.has_next().unwrap());
    }

    #[test]
    fn unknown_compound_values_are_skipped() {
        let bytes = encode(|w| {
            w.write_object(|obj| {
                obj.key("extra")?.write_array(|arr| {
                    arr.write_object(|o| o.key("k")?.write_string("v"))?;
                    arr.write_binary(b"\0\0")
                })?;
                obj.key("id")?.write_int(-5)
            })
        })
        .unwrap();
        let dec = decode(&bytes[..]);
        let mut id = 0i64;
        dec.reader()
            .match_object(&mut [Field::new("id", &mut |v| {
                id = v.get_i64()?;
                Ok(())
            })])
            .unwrap();
        assert_eq!(id, -5);
    }

    #[test]
    fn first_matching_field_wins() {
        let bytes = sample();
        let dec = decode(&bytes[..]);
        let (mut first, mut second) = (0, 0);
        dec.reader()
            .match_object(&mut [
                Field::new("a", &mut |v| {
                    first += 1;
                    v.skip()
                }),
                Field::new("a", &mut |v| {
                    second += 1;
                    v.skip()
                }),
            ])
            .unwrap();
        assert_eq!((first, second), (1, 0));
    }

    #[test]
    fn no_fields_skips_everything() {
        let bytes = sample();
        let dec = decode(&bytes[..]);
        let r = dec.reader();
        r.match_object(&mut []).unwrap();
        assert!(!r.has_next().unwrap());
    }

    #[test]
    fn handler_errors_propagate() {
        let bytes = sample();
        let dec = decode(&bytes[..]);
        let err = dec
            .reader()
            .match_object(&mut [Field::new("a", &mut |v| v.get_string().map(drop))])
            .unwrap_err();
        assert!(matches!(err, SbonError::TagMismatch { expected: "string", .. }));
    }

    #[test]
    fn non_utf8_unknown_key_is_skipped() {
        let dec = decode(&b"{\xff\xfe\x001a\x002}"[..]);
        let r = dec.reader();
        let mut a = 0u64;
        r.match_object(&mut [Field::new("a", &mut |v| {
            a = v.get_u64()?;
            Ok(())
        })])
        .unwrap();
        assert_eq!(a, 2);
        assert!(!r.has_next().unwrap());
    }

    #[test]
    fn duplicate_keys_call_the_handler_each_time() {
        let dec = decode(&b"{k\x001k\x002k\x003}"[..]);
        let mut seen = Vec::new();
        dec.reader()
            .match_object(&mut [Field::new("k", &mut |v| {
                seen.push(v.get_u64()?);
                Ok(())
            })])
            .unwrap();
        assert_eq!(seen, [1, 2, 3]);
    }
}
