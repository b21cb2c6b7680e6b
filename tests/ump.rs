use pretty_assertions::assert_eq;
use smfkit::{prelude::*, ump::meta_events, ump::ump_size_in_bytes};

#[test]
fn defined_message_types_have_fixed_widths() {
    for mt in 0..=5u8 {
        let size = ump_size_in_bytes(mt << 4 | 0x0F);
        assert!(matches!(size, 4 | 8 | 16), "type {mt} gave {size}");
        assert_eq!(MessageType::try_from(mt).map(u8::from), Ok(mt));
    }
}

#[test]
fn walks_a_mixed_stream() {
    let bytes = [
        0x00, 0x20, 0x01, 0x00, // JR timestamp
        0x21, 0x93, 0x3C, 0x64, // MIDI 1 note on, group 1
        0x40, 0x90, 0x3C, 0x00, 0xC0, 0x00, 0x00, 0x00, // MIDI 2 note on
        0x30, 0x16, 0x7E, 0x7F, 0x06, 0x01, 0x00, 0x00, // sysex7
        0x50, 0x04, 0x00, 0x7D, 0x01, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // sysex8
    ];
    let packets: Vec<Midi2Event> = UmpIter::new(&bytes).collect();
    let sizes: Vec<usize> = packets.iter().map(Midi2Event::size_in_bytes).collect();
    assert_eq!(sizes, vec![4, 4, 8, 8, 16]);
    assert_eq!(sizes.iter().sum::<usize>(), bytes.len());

    assert_eq!(packets[1].group_and_channel(), 0x103);
    assert_eq!(packets[1].event_type(), 0x90);
    assert_eq!(packets[2].to_string(), "[40903C00C0000000]");
}

#[test]
fn extracts_meta_runs_from_a_stream() {
    let mut bytes = Vec::new();
    // JR timestamp, note on, then a two packet meta run and a foreign sysex8
    bytes.extend_from_slice(&[0x00, 0x20, 0x00, 0x10]);
    bytes.extend_from_slice(&[0x20, 0x90, 0x40, 0x78]);
    bytes.extend_from_slice(&[0x50, 0x1D, 0x00, 0x7E, 0x7E, 0x03, 0x01, 0x02, 3, 4, 5, 6, 7, 8, 9, 10]);
    bytes.extend_from_slice(&[0x50, 0x33, 0x00, 0x0B, 0x0C, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    bytes.extend_from_slice(&[0x50, 0x03, 0x00, 0x43, 0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    let kept: Vec<Midi2Event> = meta_events(UmpIter::new(&bytes)).collect();
    let heads: Vec<u8> = kept.iter().map(|p| p.status()).collect();
    assert_eq!(heads, vec![0x20, 0x1D, 0x33]);
}
