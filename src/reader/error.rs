use crate::io::IoError;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading data into the midi representation
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// The `MThd` chunk is not one this crate understands
    #[error("Malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),
    /// A chunk declared a length its type never has
    #[error("Unexpected chunk size {0}")]
    UnexpectedChunkSize(u32),
    /// The events of a track did not end exactly at the declared length
    #[error("Track declared {declared} bytes but its events took {consumed}")]
    TrackSizeMismatch {
        /// Length from the chunk header
        declared: u32,
        /// Bytes the events actually used
        consumed: u64,
    },
    /// The input ended in the middle of a structure
    #[error("Unexpected end of input")]
    StreamTruncated,
    /// A variable-length quantity used more than four bytes
    #[error("Variable-length quantity is longer than 4 bytes")]
    DeltaTimeOverflow,
    /// A payload length runs past the end of its track
    #[error("Event length {0} runs past the end of the track")]
    InvalidEventLength(u32),
    /// A data byte appeared where a status byte was needed
    #[error("Data byte {0:#04X} without a running status")]
    MissingRunningStatus(u8),
    /// The byte source failed
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Reasons a header chunk is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The chunk did not start with the expected tag
    #[error("Expected chunk {expected:?}, found {found:?}")]
    InvalidMagic {
        /// The tag that should have been there
        expected: [u8; 4],
        /// The tag read instead
        found: [u8; 4],
    },
    /// The format field is not 0, 1 or 2
    #[error("Invalid format {0}")]
    InvalidFormat(u16),
    /// The SMPTE division names an unknown frame rate
    #[error("Invalid SMPTE frame rate {0}")]
    InvalidSmpteFps(i8),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the input ended early
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::StreamTruncated)
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the byte offset where the read error was detected.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn renders_position_and_kind() {
    use alloc::string::ToString;
    use pretty_assertions::assert_eq;
    let err = ReaderError::new(14, ReaderErrorKind::MissingRunningStatus(0x40));
    assert_eq!(
        err.to_string(),
        "Reading at Position 14, Data byte 0x40 without a running status"
    );
}
