mod smpte;
pub use smpte::*;

use crate::reader::HeaderError;

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format. The 16-bit division field of the header
/// picks between them with its top bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte(SmpteHeader),
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 0-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote {
            inner: tpqn & 0x7FFF,
        })
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    /// Decode the division field of a header chunk.
    pub fn from_bits(bits: u16) -> Result<Self, HeaderError> {
        let [hi, lo] = bits.to_be_bytes();
        match hi >> 7 {
            0 => Ok(Self::new_ticks_per_quarter_note(bits)),
            _ => Ok(Self::Smpte(SmpteHeader::new([hi, lo])?)),
        }
    }

    /// Encode as the division field of a header chunk.
    pub const fn to_bits(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(t) => t.ticks_per_quarter_note(),
            Self::Smpte(s) => {
                let hi = s.fps.header_value() as u8;
                u16::from_be_bytes([hi, s.ticks_per_frame])
            }
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }

    /// True when delta times count a positive number of ticks per quarter
    /// note. Tempo based time queries only work for such files.
    pub const fn is_tick_based(&self) -> bool {
        matches!(self.ticks_per_quarter_note(), Some(t) if t > 0)
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote {
    pub(crate) inner: u16,
}
impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.inner
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    fn new(bytes: [u8; 2]) -> Result<Self, HeaderError> {
        //first bit is known to be 1 when calling this
        //Bits 14 thru 8 contain one of the four values -24, -25, -29, or -30
        let byte = bytes[0] as i8;

        let fps = match byte {
            -24 => SmpteFps::TwentyFour,
            -25 => SmpteFps::TwentyFive,
            //drop frame (29.997)
            -29 => SmpteFps::TwentyNine,
            -30 => SmpteFps::Thirty,
            _ => return Err(HeaderError::InvalidSmpteFps(byte)),
        };
        Ok(Self {
            fps,
            ticks_per_frame: bytes[1],
        })
    }

    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[test]
fn division_bits_round_trip() {
    use pretty_assertions::assert_eq;
    let tpqn = Timing::from_bits(0x0060).unwrap();
    assert_eq!(tpqn.ticks_per_quarter_note(), Some(96));
    assert_eq!(tpqn.to_bits(), 0x0060);

    let smpte = Timing::from_bits(0xE728).unwrap();
    assert_eq!(smpte, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(smpte.to_bits(), 0xE728);
    assert!(!smpte.is_tick_based());

    let drop_frame = Timing::from_bits(0xE302).unwrap();
    assert_eq!(drop_frame.to_bits(), 0xE302);
}

#[test]
fn rejects_unknown_smpte_rates() {
    use pretty_assertions::assert_eq;
    // -31 fps
    assert_eq!(
        Timing::from_bits(0xE104),
        Err(HeaderError::InvalidSmpteFps(-31))
    );
}

#[test]
fn zero_ticks_is_not_tick_based() {
    assert!(!Timing::new_ticks_per_quarter_note(0).is_tick_based());
    assert!(Timing::new_ticks_per_quarter_note(1).is_tick_based());
}
