use thiserror::Error;

#[doc = r#"
A set of errors that can occur while encoding chart data
"#]
#[derive(Debug, Error)]
#[error("encoding at byte {position}, {kind}")]
pub struct EncodeError {
    position: usize,
    pub(crate) kind: EncodeErrorKind,
}

/// A kind of error that encoding can produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// Write past the end of the pre-sized buffer.
    ///
    /// Output buffers are sized from `total_encoded_len` before the first
    /// write, so this indicates the value mutated between sizing and
    /// encoding.
    #[error("write of {requested} bytes exceeds the remaining {remaining}")]
    Overflow {
        /// Bytes the write needed.
        requested: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// A beat whose reduced fraction does not fit the `u32` wire form.
    #[error("beat {0}/{1} does not fit the u32 rational wire form")]
    BeatOutOfRange(u64, u64),
    /// A string containing an interior nul byte; the wire form is
    /// nul-terminated and cannot carry it.
    #[error("string contains an interior nul byte")]
    InteriorNul,
    /// A group whose member order disagrees with the global beat order, so
    /// no forward link can encode it.
    #[error("group member order disagrees with the global note order")]
    UnorderedGroup,
}

impl EncodeError {
    /// Create an encode error from a position and kind.
    pub const fn new(position: usize, kind: EncodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }

    /// Returns the byte offset where the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The encode result type (see [`EncodeError`]).
pub type EncodeResult<T> = Result<T, EncodeError>;
