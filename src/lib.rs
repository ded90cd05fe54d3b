//! SBON — streaming reader and writer for a compact, self-describing binary
//! encoding of structured data.
//!
//! Values are read and written directly against a byte stream. No document
//! tree is ever built: a [`Writer`] pushes tags and payloads onto a sink, and
//! a [`Reader`] pulls them back off a source in the same order.
//!
//! # Architecture
//!
//! - **`format`** — Tag bytes, varints, and the reader/writer cursors
//! - **`cursor`** — Shared stream state and the nesting discipline that locks
//!   a parent cursor while a child array/object is open
//! - **`types`** — Value kinds reported by [`Reader::get_type`]
//! - **`json`** — Renders a decoded value as indented JSON
//! - **`error`** — Data and contract errors

pub mod cursor;
pub mod error;
pub mod format;
pub mod json;
pub mod types;

pub use error::{Result, SbonError};
pub use format::{
    decode, encode, ArrayReader, Decoder, DecoderBuilder, Encoder, Field, Number, ObjectReader,
    ObjectWriter, Reader, Writer,
};
pub use types::Type;
