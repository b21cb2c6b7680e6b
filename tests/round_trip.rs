use pretty_assertions::assert_eq;
use smfkit::prelude::*;

fn file_with(events: Vec<TrackEvent<'static>>) -> MidiFile<'static> {
    MidiFile::new(
        FormatType::SingleMultiChannel,
        Timing::new_ticks_per_quarter_note(480),
    )
    .with_track(Track::new(events))
}

fn text(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

fn round_trip(file: &MidiFile<'_>, config: WriterConfig) -> MidiFile<'static> {
    let bytes = file.to_bytes(config).unwrap();
    MidiFile::parse(&bytes).unwrap()
}

#[test]
fn serializes_note_fixture() {
    let file = file_with(vec![
        TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
        TrackEvent::new(480, Event::note_off(0, 0x40, 0x00)),
    ]);
    let bytes = file.to_bytes(WriterConfig::default()).unwrap();
    assert_eq!(
        bytes[22..],
        [0x00, 0x90, 0x40, 0x78, 0x83, 0x60, 0x80, 0x40, 0x00]
    );
    assert_eq!(bytes[18..22], [0, 0, 0, 9]);
}

#[test]
fn header_bytes() {
    let file = MidiFile::new(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(96),
    )
    .with_track(Track::default());
    let bytes = file.to_bytes(WriterConfig::default()).unwrap();
    assert_eq!(
        bytes,
        b"MThd\x00\x00\x00\x06\x00\x01\x00\x01\x00\x60MTrk\x00\x00\x00\x00"
    );
    assert_eq!(MidiFile::parse(&bytes).unwrap(), file);
}

#[test]
fn mixed_track_survives_both_settings() {
    let file = file_with(vec![
        TrackEvent::new(0, Event::meta(MetaType::TrackName.into(), text(12))),
        TrackEvent::new(0, Event::tempo(428_571)),
        TrackEvent::new(0, Event::program_change(2, 19)),
        TrackEvent::new(10, Event::control_change(2, cc::VOLUME, 100)),
        TrackEvent::new(0, Event::note_on(2, 60, 90)),
        TrackEvent::new(0, Event::note_on(2, 64, 90)),
        TrackEvent::new(0x3FFF, Event::pitch_bend(2, 0x2000)),
        TrackEvent::new(0x4000, Event::note_off(2, 60, 0)),
        TrackEvent::new(0, Event::channel_pressure(2, 3)),
        TrackEvent::new(0, Event::poly_pressure(2, 64, 1)),
        TrackEvent::new(0x0FFF_FFFF, Event::note_off(2, 64, 0)),
        TrackEvent::new(0, Event::end_of_track()),
    ]);
    for running_status in [true, false] {
        let config = WriterConfig::default().with_running_status(running_status);
        assert_eq!(round_trip(&file, config), file);
    }
}

#[test]
fn meta_payloads_up_to_one_chunk_are_exact() {
    for strategy in [MetaStrategy::Default, MetaStrategy::Segmented] {
        let config = WriterConfig::default().with_meta_strategy(strategy);
        for len in [0, 126, 127] {
            let file = file_with(vec![
                TrackEvent::new(5, Event::meta(MetaType::Text.into(), text(len))),
                TrackEvent::new(0, Event::end_of_track()),
            ]);
            assert_eq!(round_trip(&file, config), file, "{strategy:?} {len}");
        }
    }
}

#[test]
fn long_meta_payloads_come_back_in_chunks() {
    for len in [128, 254, 255] {
        let data = text(len);
        let file = file_with(vec![TrackEvent::new(
            5,
            Event::meta(MetaType::Text.into(), data.clone()),
        )]);

        let plain = round_trip(&file, WriterConfig::default());
        let chunks = plain.tracks()[0].events();
        assert_eq!(chunks.len(), len.div_ceil(127));
        assert_eq!(chunks[0].delta_ticks(), 5);
        assert!(chunks[1..].iter().all(|c| c.delta_ticks() == 0));
        let joined: Vec<u8> = chunks
            .iter()
            .flat_map(|c| c.event().payload().unwrap().to_vec())
            .collect();
        assert_eq!(joined, data);

        let config = WriterConfig::default().with_meta_strategy(MetaStrategy::Segmented);
        let segmented = round_trip(&file, config);
        let chunks = segmented.tracks()[0].events();
        assert_eq!(chunks.len(), len.div_ceil(0x77));
        let mut joined = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let payload = chunk.event().payload().unwrap();
            assert_eq!(payload[..8], SegmentedChunking::marker(index));
            joined.extend_from_slice(&payload[8..]);
        }
        assert_eq!(joined, data);
    }
}

#[test]
fn sysex_payloads() {
    let file = file_with(vec![
        TrackEvent::new(0, Event::sysex(SysExKind::Start, Vec::<u8>::new())),
        TrackEvent::new(0, Event::note_on(0, 60, 1)),
        TrackEvent::new(20, Event::sysex(SysExKind::Start, vec![0x41u8; 240])),
        TrackEvent::new(0, Event::sysex(SysExKind::End, vec![0xF7u8])),
        TrackEvent::new(0, Event::note_on(0, 61, 1)),
    ]);
    assert_eq!(round_trip(&file, WriterConfig::default()), file);
}

#[test]
fn multi_track_file() {
    let file = MidiFile::new(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(960),
    )
    .with_track(Track::new(vec![
        TrackEvent::new(0, Event::tempo(600_000)),
        TrackEvent::new(0, Event::end_of_track()),
    ]))
    .with_track(Track::new(vec![
        TrackEvent::new(0, Event::note_on(9, 36, 127)),
        TrackEvent::new(240, Event::note_off(9, 36, 0)),
    ]));
    assert_eq!(round_trip(&file, WriterConfig::default()), file);
}

#[cfg(feature = "std")]
#[test]
fn reads_through_a_std_reader() {
    let file = file_with(vec![TrackEvent::new(0, Event::note_on(1, 2, 3))]);
    let bytes = file.to_bytes(WriterConfig::default()).unwrap();
    let source = IoSource::new(std::io::Cursor::new(bytes));
    assert_eq!(MidiFile::read(source).unwrap(), file);
}

#[cfg(feature = "std")]
#[test]
fn writes_through_a_std_writer() {
    let file = file_with(vec![TrackEvent::new(0, Event::note_on(1, 2, 3))]);
    let mut sink = IoSink::new(Vec::new());
    file.write(&mut sink, WriterConfig::default()).unwrap();
    assert_eq!(
        sink.into_inner(),
        file.to_bytes(WriterConfig::default()).unwrap()
    );
}
