use crate::prelude::*;

#[doc = r#"
The contents of an `MThd` chunk: layout, declared track count and timing.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// Create a new header
    pub const fn new(format: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }
    /// The file layout
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// Number of track chunks that follow
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// Get the timing props
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}
