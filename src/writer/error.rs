use crate::io::IoError;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while serializing a midi file
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Writing at Position {position}, {kind}")]
pub struct WriterError {
    position: u64,
    pub(crate) kind: WriterErrorKind,
}

/// A kind of error that a writer can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterErrorKind {
    /// A delta time does not fit in a four byte variable-length quantity
    #[error("Delta time {0} does not fit in 4 bytes")]
    DeltaTimeOverflow(u32),
    /// A payload is longer than its encoding allows
    #[error("Event length {0} cannot be encoded")]
    InvalidEventLength(usize),
    /// A short event whose status byte is a data byte or belongs to a
    /// sysex or meta event
    #[error("Status {0:#04X} cannot start a short event")]
    InvalidStatus(u8),
    /// The header track count is 16 bits
    #[error("{0} tracks do not fit in a header")]
    TooManyTracks(usize),
    /// The track chunk length is 32 bits
    #[error("Track of {0} bytes does not fit in a chunk")]
    TrackTooLarge(u64),
    /// The bytes emitted for a track differ from its precomputed length
    #[error("Track declared {declared} bytes but {written} were written")]
    TrackSizeMismatch {
        /// Length written into the chunk header
        declared: u32,
        /// Bytes actually emitted
        written: u64,
    },
    /// The byte sink failed
    #[error(transparent)]
    Io(#[from] IoError),
}

impl WriterError {
    /// Create a writer error from a position and kind
    pub const fn new(position: u64, kind: WriterErrorKind) -> Self {
        Self { position, kind }
    }
    /// Returns the error kind of the writer.
    pub fn error_kind(&self) -> &WriterErrorKind {
        &self.kind
    }
    /// Output offset of the event that failed, counting any chunk header
    /// that precedes it.
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// The Write Result type (see [`WriterError`])
pub type WriteResult<T> = Result<T, WriterError>;
