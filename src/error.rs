//! Error types for SBON encoding and decoding.

/// Errors that can occur while reading or writing SBON.
///
/// Everything except [`SbonError::UseAfterChildActive`] describes the data or
/// the stream. `UseAfterChildActive` is a contract violation: the caller
/// touched a cursor while one of its children was still open.
#[derive(Debug, thiserror::Error)]
pub enum SbonError {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("unrecognized tag byte: 0x{0:02X}")]
    UnrecognizedTag(u8),

    #[error("expected {expected}, found tag byte 0x{found:02X}")]
    TagMismatch { expected: &'static str, found: u8 },

    #[error("number cannot be represented exactly as {target}")]
    LossyNarrowing { target: &'static str },

    #[error("varint does not fit in 64 bits")]
    IntegerTooLarge,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("nesting depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    #[error("declared length {len} exceeds limit of {limit}")]
    LengthLimitExceeded { len: u64, limit: usize },

    #[error("cursor used while a nested array or object is still open")]
    UseAfterChildActive,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SbonError {
    /// Returns `true` for programming errors as opposed to malformed input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UseAfterChildActive)
    }

    /// Returns `true` if the error describes the input, the output or the
    /// underlying stream rather than misuse of the API.
    pub fn is_data_error(&self) -> bool {
        !self.is_contract_violation()
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SbonError>;
