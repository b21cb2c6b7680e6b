#![doc = r#"
Meta events carried over UMP.

MIDI 2.0 has no meta events of its own. By convention they travel as sysex8
messages whose payload, after the stream ID, starts with the universal
non-realtime ID `7E` followed by the NAK sub-ID `7E`. A multi-packet message
is a *meta run*: the start packet carries the signature, the continue and
end packets that follow belong to it.

[`MetaEvents`] keeps the packets of every meta run together with all JR
timestamp packets, which carry the timing, and drops everything else.
"#]

use super::{Midi2Event, MessageType, sysex8, utility};

/// Universal non-realtime sysex ID that opens a meta payload
pub const META_SIGNATURE: [u8; 2] = [0x7E, 0x7E];

/// The meta extracting iterator, see [`meta_events`].
#[derive(Debug, Clone)]
pub struct MetaEvents<I> {
    packets: I,
    in_meta: bool,
}

/// Keep the JR timestamps and meta runs of `packets`.
///
/// # Example
/// ```rust
/// use smfkit::{prelude::*, ump::meta_events};
///
/// let bytes = [
///     0x00, 0x20, 0x00, 0x60, // JR timestamp
///     0x20, 0x90, 0x40, 0x78, // note on, dropped
///     0x50, 0x06, 0x00, 0x7E, 0x7E, 0x03, 0x51, 0x07, 0, 0, 0, 0, 0, 0, 0, 0,
/// ];
/// let kept: Vec<_> = meta_events(UmpIter::new(&bytes)).collect();
/// assert_eq!(kept.len(), 2);
/// ```
pub fn meta_events<I: IntoIterator<Item = Midi2Event>>(packets: I) -> MetaEvents<I::IntoIter> {
    MetaEvents {
        packets: packets.into_iter(),
        in_meta: false,
    }
}

fn is_jr_timestamp(packet: &Midi2Event) -> bool {
    packet.message_type() == Some(MessageType::Utility)
        && packet.status() >> 4 == utility::JR_TIMESTAMP
}

fn opens_meta_run(packet: &Midi2Event) -> bool {
    let byte_count = packet.status() & 0x0F;
    byte_count >= 3 && [packet.byte(3), packet.byte(4)] == META_SIGNATURE
}

impl<I: Iterator<Item = Midi2Event>> Iterator for MetaEvents<I> {
    type Item = Midi2Event;

    fn next(&mut self) -> Option<Self::Item> {
        for packet in self.packets.by_ref() {
            if is_jr_timestamp(&packet) {
                return Some(packet);
            }
            if packet.message_type() != Some(MessageType::SysEx8Mds) {
                continue;
            }
            match packet.status() >> 4 {
                sysex8::COMPLETE | sysex8::START => {
                    let opens = opens_meta_run(&packet);
                    self.in_meta = opens && packet.status() >> 4 == sysex8::START;
                    if opens {
                        return Some(packet);
                    }
                }
                sysex8::CONTINUE if self.in_meta => return Some(packet),
                sysex8::END if self.in_meta => {
                    self.in_meta = false;
                    return Some(packet);
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
fn packet8(status: u8, payload: &[u8]) -> Midi2Event {
    let mut bytes = [0u8; 16];
    bytes[0] = 0x50;
    bytes[1] = (status << 4) | (payload.len() as u8 + 1);
    bytes[3..3 + payload.len()].copy_from_slice(payload);
    Midi2Event::from_bytes(&bytes).unwrap()
}

#[cfg(test)]
fn jr(stamp: u16) -> Midi2Event {
    let [hi, lo] = stamp.to_be_bytes();
    Midi2Event::from_bytes(&[0x00, 0x20, hi, lo]).unwrap()
}

#[test]
fn keeps_a_whole_meta_run() {
    use pretty_assertions::assert_eq;
    let packets = alloc::vec![
        jr(10),
        packet8(sysex8::START, &[0x7E, 0x7E, 0x01, 1, 2]),
        jr(0),
        packet8(sysex8::CONTINUE, &[3, 4, 5]),
        packet8(sysex8::END, &[6]),
        packet8(sysex8::CONTINUE, &[7]),
    ];
    let kept: alloc::vec::Vec<_> = meta_events(packets.clone()).collect();
    assert_eq!(kept, packets[..5]);
}

#[test]
fn drops_other_sysex8_runs() {
    use pretty_assertions::assert_eq;
    let packets = alloc::vec![
        packet8(sysex8::START, &[0x43, 0x10, 0x01]),
        packet8(sysex8::CONTINUE, &[1, 2]),
        packet8(sysex8::END, &[3]),
        packet8(sysex8::COMPLETE, &[0x7E, 0x7E, 0x51]),
        packet8(sysex8::CONTINUE, &[4]),
    ];
    let kept: alloc::vec::Vec<_> = meta_events(packets.clone()).collect();
    assert_eq!(kept, [packets[3]]);
}

#[test]
fn a_new_start_ends_the_previous_run() {
    use pretty_assertions::assert_eq;
    let packets = alloc::vec![
        packet8(sysex8::START, &[0x7E, 0x7E, 0x03]),
        packet8(sysex8::START, &[0x43, 0x10, 0x01]),
        packet8(sysex8::CONTINUE, &[1]),
    ];
    let kept: alloc::vec::Vec<_> = meta_events(packets.clone()).collect();
    assert_eq!(kept, [packets[0]]);
}
