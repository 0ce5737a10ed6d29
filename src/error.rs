use thiserror::Error;

/// Custom error types for the ebmlstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected end of file while reading stream data.
    #[error("Unexpected end of file while reading stream")]
    UnexpectedEof,

    /// Malformed element ID or element length header.
    #[error("Invalid EBML header: {0}")]
    Vint(#[from] VintError),

    /// A top-level element declares more bytes than the configured ceiling.
    #[error("Refusing to read element of {declared} bytes (limit {limit})")]
    ElementTooLarge { declared: u64, limit: u64 },

    /// A master element repeats one field past the occurrence ceiling.
    #[error("Too many subelements with id {id:#x} in {element}")]
    TooManyElements { element: &'static str, id: u32 },

    /// Master element nesting reached the configured depth bound.
    #[error("Element {element} nested too deep (depth {depth})")]
    DepthExceeded { element: &'static str, depth: usize },

    /// A scalar element body has a byte length its type cannot have.
    #[error("Invalid scalar length {length}")]
    InvalidScalarLength { length: u64 },

    /// An element length is not usable at the current stream position.
    #[error("Invalid EBML length at position {position}")]
    InvalidLength { position: u64 },

    /// Resync reached end of stream without seeing the target ID.
    #[error("Element {target:#x} not found after position {start}")]
    ResyncFailed { target: u32, start: u64 },

    /// A CRC-32 element does not match the data it covers.
    #[error("Checksum mismatch: expected {expected:#010x}, calculated {calculated:#010x}")]
    ChecksumMismatch { expected: u32, calculated: u32 },

    /// The stream does not start with an EBML header.
    #[error("Not an EBML stream (found id {found:#x})")]
    NotEbml { found: u32 },

    /// The EBML header describes a document this reader does not handle.
    #[error("Unsupported EBML header: {message}")]
    UnsupportedHeader { message: String },
}

impl Error {
    /// Create a new `UnsupportedHeader` error with a descriptive message.
    pub fn unsupported_header(message: impl Into<String>) -> Self {
        Self::UnsupportedHeader {
            message: message.into(),
        }
    }

    /// Create a new `ChecksumMismatch` error.
    pub fn checksum_mismatch(expected: u32, calculated: u32) -> Self {
        Self::ChecksumMismatch {
            expected,
            calculated,
        }
    }

    /// Create a new `ElementTooLarge` error with the declared size and limit.
    pub fn element_too_large(declared: u64, limit: u64) -> Self {
        Self::ElementTooLarge { declared, limit }
    }
}

/// Failures decoding a variable-length integer from an in-memory span.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VintError {
    /// No bytes left in the span.
    #[error("empty input")]
    Empty,

    /// The first byte has no length marker within the allowed width.
    #[error("no length marker within {max} bytes")]
    MissingMarker { max: usize },

    /// The header needs more bytes than the span holds.
    #[error("needs {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// All data bits set: the reserved "unknown length" encoding.
    #[error("reserved unknown-length value")]
    UnknownLength,

    /// The value does not fit the target representation.
    #[error("value out of range")]
    Overflow,
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
