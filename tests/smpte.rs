use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// A one track file whose division is the given SMPTE rate at 40 ticks per frame
fn smpte_file(fps_byte: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[fps_byte, 40]);

    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]);
    bytes.extend_from_slice(&[0x00, 0x90, 0x40, 0x78]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes
}

#[test]
fn reads_every_frame_rate() {
    for (byte, fps) in [
        (0xE8, SmpteFps::TwentyFour),
        (0xE7, SmpteFps::TwentyFive),
        (0xE3, SmpteFps::TwentyNine),
        (0xE2, SmpteFps::Thirty),
    ] {
        let file = MidiFile::parse(&smpte_file(byte)).unwrap();
        assert_eq!(file.timing(), Timing::new_smpte(fps, 40));
        assert!(!file.timing().is_tick_based());
    }
}

#[test]
fn division_is_written_back_unchanged() {
    for byte in [0xE8, 0xE7, 0xE3, 0xE2] {
        let bytes = smpte_file(byte);
        let file = MidiFile::parse(&bytes).unwrap();
        assert_eq!(file.to_bytes(WriterConfig::default()).unwrap(), bytes);
    }
}

#[test]
fn unknown_frame_rate_is_a_header_error() {
    let err = MidiFile::parse(&smpte_file(0xE1)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::MalformedHeader(smfkit::reader::HeaderError::InvalidSmpteFps(-31))
    );
    assert_eq!(err.position(), 14);
}

#[test]
fn tempo_queries_refuse_smpte() {
    let file = MidiFile::parse(&smpte_file(0xE7)).unwrap();
    assert_eq!(
        file.total_play_time(),
        Err(TempoError::UnsupportedTimingFormat {
            tick: 0,
            timing: file.timing()
        })
    );
    assert!(matches!(
        file.time_at_tick(100),
        Err(TempoError::UnsupportedTimingFormat { tick: 100, .. })
    ));
}
