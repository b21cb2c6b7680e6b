use alloc::borrow::Cow;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Microseconds per quarter note assumed before any Set Tempo event: 120 BPM.
pub const DEFAULT_TEMPO: u32 = 500_000;

#[doc = r#"
The meta event types defined by the SMF specification.

Meta events carry any type byte; this table only names the defined ones.
Look one up with `MetaType::try_from(byte)`.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    Cue = 0x07,
    ChannelPrefix = 0x20,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// A meta event: a type byte and a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent<'a> {
    meta_type: u8,
    data: Cow<'a, [u8]>,
}

impl<'a> MetaEvent<'a> {
    /// Create a meta event of any type
    pub fn new(meta_type: u8, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            meta_type,
            data: data.into(),
        }
    }

    /// A Set Tempo event. Only the low 24 bits of the tempo are kept.
    pub fn tempo(micros_per_quarter_note: u32) -> Self {
        let [_, a, b, c] = micros_per_quarter_note.to_be_bytes();
        Self::new(MetaType::Tempo.into(), alloc::vec![a, b, c])
    }

    /// The raw type byte
    pub const fn meta_type(&self) -> u8 {
        self.meta_type
    }
    /// The type byte, if it is one the specification defines
    pub fn kind(&self) -> Option<MetaType> {
        MetaType::try_from(self.meta_type).ok()
    }
    /// The payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Microseconds per quarter note, for well formed Set Tempo events
    pub fn tempo_value(&self) -> Option<u32> {
        if self.meta_type != MetaType::Tempo as u8 {
            return None;
        }
        tempo_from_payload(&self.data)
    }
    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> MetaEvent<'static> {
        MetaEvent {
            meta_type: self.meta_type,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// Reads the 24-bit big-endian tempo at the start of a Set Tempo payload.
pub fn tempo_from_payload(data: &[u8]) -> Option<u32> {
    match data {
        [a, b, c, ..] => Some(u32::from_be_bytes([0, *a, *b, *c])),
        _ => None,
    }
}

/// Beats per minute for a tempo in microseconds per quarter note.
pub fn bpm(micros_per_quarter_note: u32) -> f64 {
    60_000_000. / micros_per_quarter_note as f64
}

#[test]
fn tempo_payload_is_unsigned_big_endian() {
    use pretty_assertions::assert_eq;
    assert_eq!(tempo_from_payload(&[0x07, 0xA1, 0x20]), Some(500_000));
    // high bit in the last byte must not be read as a sign
    assert_eq!(tempo_from_payload(&[0x00, 0x00, 0xFF]), Some(255));
    assert_eq!(tempo_from_payload(&[0xFF, 0xFF, 0xFF]), Some(0xFF_FFFF));
    assert_eq!(tempo_from_payload(&[0x07, 0xA1]), None);
}

#[test]
fn tempo_events_encode_three_bytes() {
    use pretty_assertions::assert_eq;
    let meta = MetaEvent::tempo(DEFAULT_TEMPO);
    assert_eq!(meta.data(), &[0x07, 0xA1, 0x20]);
    assert_eq!(meta.kind(), Some(MetaType::Tempo));
    assert_eq!(meta.tempo_value(), Some(500_000));
    assert_eq!(bpm(DEFAULT_TEMPO), 120.);

    let text = MetaEvent::new(MetaType::Text.into(), &[0x07u8, 0xA1, 0x20][..]);
    assert_eq!(text.tempo_value(), None);
    assert_eq!(MetaEvent::new(0x42, &[0u8; 0][..]).kind(), None);
}
