use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding chart data
"#]
#[derive(Debug, Error)]
#[error("decoding at byte {position}, {kind}")]
pub struct DecodeError {
    position: usize,
    pub(crate) kind: DecodeErrorKind,
}

/// A kind of error that decoding can produce.
///
/// Every variant is fatal for the decode call that raised it; the codec
/// never substitutes defaults for data it could not read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Read past the end of the buffer (truncated or corrupt data).
    #[error("read out of bounds")]
    OutOfBounds,
    /// A rational field carried a zero denominator.
    #[error("rational denominator is zero")]
    ZeroDenominator,
    /// A string field ran to the end of the buffer without a nul terminator.
    #[error("string is missing its nul terminator")]
    MissingNulTerminator,
    /// A string field was not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    /// A provider discriminant byte with an unknown magnitude.
    #[error("unknown provider discriminant {0}")]
    UnknownProvider(i8),
    /// An embedded-file descriptor pointing outside the outer buffer.
    #[error("embedded region at {offset}+{length} escapes a {available}-byte buffer")]
    EmbedOutOfRange {
        /// Absolute offset the descriptor claimed.
        offset: u64,
        /// Length the descriptor claimed.
        length: u64,
        /// Size of the outer buffer.
        available: usize,
    },
    /// A relative note link pointing past the end of the note list.
    #[error("note {from} links to {to} but the list holds {count} notes")]
    DanglingLink {
        /// Global index of the linking note.
        from: usize,
        /// Global index the link resolved to.
        to: u64,
        /// Number of notes in the list.
        count: usize,
    },
}

impl DecodeError {
    /// Create a decode error from a position and kind.
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new out of bounds error.
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::OutOfBounds,
        }
    }

    /// True if the buffer was truncated.
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::OutOfBounds)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the byte offset where the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The decode result type (see [`DecodeError`]).
pub type DecodeResult<T> = Result<T, DecodeError>;
