#![doc = r#"
Decoding of packed MIDI 2.0 Universal MIDI Packets.

A UMP stream is a run of big-endian packets of 32, 64 or 128 bits. The top
nibble of each packet (its [`MessageType`]) says how wide it is, so the
stream is self-delimiting: [`UmpIter`] walks it without any framing.

Only decoding is provided.
"#]

mod meta;
pub use meta::*;

use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The message type nibble at the top of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// NOOP, JR clock and JR timestamp
    Utility = 0x0,
    /// System common and realtime
    System = 0x1,
    /// MIDI 1.0 channel voice messages
    Midi1ChannelVoice = 0x2,
    /// 7-bit system exclusive data
    SysEx7 = 0x3,
    /// MIDI 2.0 channel voice messages
    Midi2ChannelVoice = 0x4,
    /// 8-bit system exclusive data and mixed data sets
    SysEx8Mds = 0x5,
}

/// Status nibbles of a utility packet.
pub mod utility {
    /// No operation
    pub const NOOP: u8 = 0x0;
    /// Jitter reduction clock
    pub const JR_CLOCK: u8 = 0x1;
    /// Jitter reduction timestamp
    pub const JR_TIMESTAMP: u8 = 0x2;
}

/// Status nibbles of a sysex8 packet.
pub mod sysex8 {
    /// The whole message fits in this packet
    pub const COMPLETE: u8 = 0x0;
    /// First packet of a message
    pub const START: u8 = 0x1;
    /// Neither first nor last
    pub const CONTINUE: u8 = 0x2;
    /// Last packet of a message
    pub const END: u8 = 0x3;
}

/// Width in bytes of the packet whose first byte is `head`.
pub const fn ump_size_in_bytes(head: u8) -> usize {
    match head >> 4 {
        0x3 | 0x4 => 8,
        0x5 => 16,
        _ => 4,
    }
}

#[doc = r#"
One Universal MIDI Packet.

The packet is kept left-aligned in two 64-bit words: a 32-bit packet fills
the high half of the first word, a 64-bit packet the first word and a
128-bit packet both. Unused bits are zero.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Midi2Event {
    words: [u64; 2],
}

impl Midi2Event {
    /// A packet from its two left-aligned words
    pub const fn new(first: u64, second: u64) -> Self {
        Self {
            words: [first, second],
        }
    }

    /// Decode the packet at the start of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than the packet its first byte
    /// announces.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let size = ump_size_in_bytes(*bytes.first()?);
        let bytes = bytes.get(..size)?;
        let mut padded = [0u8; 16];
        padded[..size].copy_from_slice(bytes);
        let (first, second) = padded.split_at(8);
        Some(Self::new(
            u64::from_be_bytes(first.try_into().ok()?),
            u64::from_be_bytes(second.try_into().ok()?),
        ))
    }

    /// The first 64 bits
    pub const fn first_word(&self) -> u64 {
        self.words[0]
    }
    /// The second 64 bits, zero unless the packet is 128 bits wide
    pub const fn second_word(&self) -> u64 {
        self.words[1]
    }
    /// Width of this packet in bytes
    pub const fn size_in_bytes(&self) -> usize {
        ump_size_in_bytes(self.byte(0))
    }
    /// Byte `index` (0-15) of the packet, most significant first
    pub const fn byte(&self, index: usize) -> u8 {
        let word = self.words[index / 8];
        (word >> (56 - 8 * (index % 8))) as u8
    }

    /// The raw message type nibble
    pub const fn message_type_bits(&self) -> u8 {
        (self.words[0] >> 60) as u8
    }
    /// The message type, if it is one defined here
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type_bits()).ok()
    }
    /// Group (0-15)
    pub const fn group(&self) -> u8 {
        ((self.words[0] >> 56) & 0x0F) as u8
    }
    /// The second byte: a status byte for channel voice packets, a status
    /// nibble and byte count for data packets
    pub const fn status(&self) -> u8 {
        (self.words[0] >> 48) as u8
    }
    /// Channel (0-15), meaningful for channel voice packets
    pub const fn channel(&self) -> u8 {
        self.status() & 0x0F
    }
    /// The status with its channel masked off, as in
    /// [`EventType::coarse`](crate::event::EventType::coarse)
    pub const fn event_type(&self) -> u8 {
        match self.status() {
            0xFF | 0xF0 | 0xF7 => self.status(),
            status => status & 0xF0,
        }
    }
    /// A single number unique per group and channel
    pub const fn group_and_channel(&self) -> u16 {
        self.group() as u16 * 0x100 + self.channel() as u16
    }
}

impl fmt::Display for Midi2Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size_in_bytes() {
            16 => write!(f, "[{:016X}:{:016X}]", self.words[0], self.words[1]),
            8 => write!(f, "[{:016X}]", self.words[0]),
            _ => write!(f, "[{:08X}]", self.words[0] >> 32),
        }
    }
}

#[doc = r#"
Iterates over the packets of a UMP byte buffer.

Iteration stops at the end of the buffer, or in front of a final packet
that is cut short. Such trailing bytes stay available through
[`remainder`](UmpIter::remainder).

# Example
```rust
use smfkit::prelude::*;

let bytes = [0x20, 0x90, 0x40, 0x78, 0x40, 0x90, 0x40, 0x00, 0xC0, 0x00, 0x00, 0x00];
let packets: Vec<_> = UmpIter::new(&bytes).collect();
assert_eq!(packets.len(), 2);
assert_eq!(packets[0].message_type(), Some(MessageType::Midi1ChannelVoice));
assert_eq!(packets[1].size_in_bytes(), 8);
```
"#]
#[derive(Debug, Clone)]
pub struct UmpIter<'a> {
    bytes: &'a [u8],
}

impl<'a> UmpIter<'a> {
    /// Iterate over `bytes`
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
    /// The bytes not yet decoded
    pub const fn remainder(&self) -> &'a [u8] {
        self.bytes
    }
}

impl Iterator for UmpIter<'_> {
    type Item = Midi2Event;

    fn next(&mut self) -> Option<Self::Item> {
        let event = Midi2Event::from_bytes(self.bytes)?;
        self.bytes = &self.bytes[event.size_in_bytes()..];
        Some(event)
    }
}

#[test]
fn packet_widths_follow_message_type() {
    use pretty_assertions::assert_eq;
    let widths: alloc::vec::Vec<usize> = (0..=0xFu8).map(|mt| ump_size_in_bytes(mt << 4)).collect();
    assert_eq!(
        widths,
        [4, 4, 4, 8, 8, 16, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4]
    );
}

#[test]
fn fields_of_a_midi2_note_on() {
    use pretty_assertions::assert_eq;
    let bytes = [0x43, 0x95, 0x3C, 0x00, 0xFF, 0xFF, 0x00, 0x00];
    let event = Midi2Event::from_bytes(&bytes).unwrap();
    assert_eq!(event.message_type(), Some(MessageType::Midi2ChannelVoice));
    assert_eq!(event.group(), 3);
    assert_eq!(event.status(), 0x95);
    assert_eq!(event.event_type(), 0x90);
    assert_eq!(event.channel(), 5);
    assert_eq!(event.group_and_channel(), 0x305);
    assert_eq!(event.byte(2), 0x3C);
    assert_eq!(event.second_word(), 0);
}

#[test]
fn wide_packets_keep_both_words() {
    use pretty_assertions::assert_eq;
    let bytes: alloc::vec::Vec<u8> = (0x50..0x60).collect();
    let event = Midi2Event::from_bytes(&bytes).unwrap();
    assert_eq!(event.first_word(), 0x5051_5253_5455_5657);
    assert_eq!(event.second_word(), 0x5859_5A5B_5C5D_5E5F);
}

#[test]
fn renders_hex_words() {
    use alloc::string::ToString;
    use pretty_assertions::assert_eq;
    let short = Midi2Event::from_bytes(&[0x20, 0x90, 0x40, 0x78]).unwrap();
    assert_eq!(short.to_string(), "[20904078]");
    let wide = Midi2Event::new(0x5000_0000_0000_0000, 0x1);
    assert_eq!(wide.to_string(), "[5000000000000000:0000000000000001]");
}

#[test]
fn truncated_packet_is_left_over() {
    use pretty_assertions::assert_eq;
    let bytes = [0x20, 0x90, 0x40, 0x78, 0x40, 0x90, 0x40];
    let mut iter = UmpIter::new(&bytes);
    assert_eq!(iter.next().map(|e| e.size_in_bytes()), Some(4));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.remainder(), &[0x40, 0x90, 0x40]);
}
