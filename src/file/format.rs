use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The layout of a MIDI file, as declared by the format field of its header.

- Format 0: one track holding every channel
- Format 1: several tracks played together
- Format 2: several tracks that are independent sequences
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The numeric format field
    pub const fn as_bits(&self) -> u16 {
        *self as u16
    }
}

#[test]
fn format_from_header_field() {
    use pretty_assertions::assert_eq;
    assert_eq!(FormatType::try_from(1u16), Ok(FormatType::Simultaneous));
    assert_eq!(FormatType::SequentiallyIndependent.as_bits(), 2);
    assert!(FormatType::try_from(3u16).is_err());
}
