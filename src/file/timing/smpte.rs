#![doc = r#"
SMPTE based divisions.

A header whose division has its top bit set counts delta times in
fractions of a video frame instead of fractions of a quarter note. The high
byte then holds the negated frame rate and the low byte the ticks per frame.

This crate reads and writes such headers, but the
[`tempo`](crate::tempo) queries refuse them: tempo events carry no meaning
for frame based time.
"#]

/// The four frame rates an SMPTE division may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second, film
    TwentyFour,
    /// 25 frames per second, PAL/SECAM
    TwentyFive,
    /// 29.97 frames per second (30000/1001), NTSC drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The negative frame rate stored in the high byte of an SMPTE division.
    ///
    /// Drop-frame reports -29, not its nominal 30.
    pub const fn header_value(&self) -> i8 {
        match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        }
    }
}
