#![doc = r#"
Contains the [`Writer`], which serializes a [`MidiFile`] into SMF bytes.

A track chunk carries its length up front, so every track is measured
before it is written. Measuring runs the same per-event encoder as writing,
with the sink left out, and the writer double-checks the byte count it ends
up emitting against the measured length.
"#]

mod error;
pub use error::*;

mod meta;
pub use meta::*;

use crate::{
    io::{ByteSink, IoError},
    prelude::*,
    vlq,
};

/// Caller supplied writer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriterConfig {
    /// How long meta payloads are cut into chunks
    pub meta_strategy: MetaStrategy,
    /// Leave out repeated channel status bytes
    pub running_status: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            meta_strategy: MetaStrategy::Default,
            running_status: true,
        }
    }
}

impl WriterConfig {
    /// Pick the meta chunking strategy
    pub const fn with_meta_strategy(mut self, meta_strategy: MetaStrategy) -> Self {
        self.meta_strategy = meta_strategy;
        self
    }
    /// Turn running status compression on or off
    pub const fn with_running_status(mut self, running_status: bool) -> Self {
        self.running_status = running_status;
        self
    }
}

/// A sink wrapper that knows how many bytes went through it.
struct Output<S> {
    sink: S,
    written: u64,
}

impl<S: ByteSink> ByteSink for Output<S> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.sink.write_bytes(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// Per-track encoding state.
#[derive(Default)]
struct TrackEncoder {
    compress: bool,
    running_status: Option<u8>,
    // delta time of skipped placeholders, owed to the next real event
    carry: u64,
}

impl TrackEncoder {
    fn new(compress: bool) -> Self {
        Self {
            compress,
            ..Self::default()
        }
    }

    /// Encode one event, returning its size. Bytes go to `sink` if there is
    /// one, otherwise the event is only measured.
    fn encode<M: MetaChunking>(
        &mut self,
        chunking: &M,
        event: &TrackEvent<'_>,
        mut sink: Option<&mut dyn ByteSink>,
    ) -> Result<u64, WriterErrorKind> {
        let delta = self.carry + event.delta_ticks() as u64;
        if event.event().is_placeholder() {
            self.carry = delta;
            return Ok(0);
        }
        self.carry = 0;
        if let Event::Short(short) = event.event() {
            if matches!(short.status(), 0x00..=0x7F | 0xF0 | 0xF7 | 0xFF) {
                return Err(WriterErrorKind::InvalidStatus(short.status()));
            }
        }

        let delta = u32::try_from(delta).unwrap_or(u32::MAX);
        let mut vlq_buf = [0u8; 4];
        let delta_len =
            vlq::encode(delta, &mut vlq_buf).ok_or(WriterErrorKind::DeltaTimeOverflow(delta))?;
        if let Some(sink) = sink.as_mut() {
            sink.write_bytes(&vlq_buf[..delta_len])?;
        }

        let body_len = match event.event() {
            Event::Meta(meta) => {
                self.running_status = None;
                match sink {
                    Some(sink) => {
                        chunking.write(meta, sink)?;
                        chunking.encoded_len(meta)?
                    }
                    None => chunking.encoded_len(meta)?,
                }
            }
            Event::SysEx(sysex) => {
                self.running_status = None;
                let data = sysex.data();
                let len = u32::try_from(data.len())
                    .ok()
                    .and_then(|len| vlq::encode(len, &mut vlq_buf))
                    .ok_or(WriterErrorKind::InvalidEventLength(data.len()))?;
                if let Some(sink) = sink {
                    sink.write_bytes(&[u8::from(sysex.kind())])?;
                    sink.write_bytes(&vlq_buf[..len])?;
                    sink.write_bytes(data)?;
                }
                (1 + len + data.len()) as u64
            }
            Event::Short(short) => {
                let bytes = if self.elide_status(short.status()) {
                    short.data()
                } else {
                    short.as_bytes()
                };
                if let Some(sink) = sink {
                    sink.write_bytes(bytes)?;
                }
                bytes.len() as u64
            }
        };

        Ok(delta_len as u64 + body_len)
    }

    fn elide_status(&mut self, status: u8) -> bool {
        if !(0x80..0xF0).contains(&status) {
            self.running_status = None;
            return false;
        }
        let elide = self.compress && self.running_status == Some(status);
        self.running_status = Some(status);
        elide
    }
}

#[doc = r#"
A streaming SMF writer.

`M` is the meta chunking strategy. [`Writer::new`] and
[`Writer::with_config`] use the built-in [`MetaStrategy`]; bring your own
with [`Writer::with_chunking`].

# Example
```rust
use smfkit::prelude::*;

let track = Track::new(vec![
    TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
    TrackEvent::new(480, Event::note_off(0, 0x40, 0x00)),
]);
let mut writer = Writer::new(Vec::new());
writer.write_track(&track).unwrap();

let bytes = writer.into_inner();
assert_eq!(bytes[8..], [0x00, 0x90, 0x40, 0x78, 0x83, 0x60, 0x80, 0x40, 0x00]);
```
"#]
pub struct Writer<S, M = MetaStrategy> {
    out: Output<S>,
    chunking: M,
    running_status: bool,
}

impl<S: ByteSink> Writer<S> {
    /// A writer with the default [`WriterConfig`]
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, WriterConfig::default())
    }

    /// A writer for the given configuration
    pub fn with_config(sink: S, config: WriterConfig) -> Self {
        Self::with_chunking(sink, config.meta_strategy, config.running_status)
    }
}

impl<S: ByteSink, M: MetaChunking> Writer<S, M> {
    /// A writer with a custom meta chunking strategy
    pub fn with_chunking(sink: S, chunking: M, running_status: bool) -> Self {
        Self {
            out: Output { sink, written: 0 },
            chunking,
            running_status,
        }
    }

    /// Number of bytes handed to the sink so far
    pub const fn bytes_written(&self) -> u64 {
        self.out.written
    }

    /// Give back the sink
    pub fn into_inner(self) -> S {
        self.out.sink
    }

    fn error(&self, kind: WriterErrorKind) -> WriterError {
        WriterError::new(self.out.written, kind)
    }

    /// Write the header chunk followed by every track.
    pub fn write_file(&mut self, file: &MidiFile<'_>) -> WriteResult<()> {
        if file.tracks().len() > u16::MAX as usize {
            return Err(self.error(WriterErrorKind::TooManyTracks(file.tracks().len())));
        }
        self.write_header(&file.header())?;
        for track in file.tracks() {
            self.write_track(track)?;
        }
        Ok(())
    }

    /// Write an `MThd` chunk.
    pub fn write_header(&mut self, header: &Header) -> WriteResult<()> {
        let mut bytes = [0u8; 14];
        bytes[..4].copy_from_slice(b"MThd");
        bytes[4..8].copy_from_slice(&6u32.to_be_bytes());
        bytes[8..10].copy_from_slice(&header.format().as_bits().to_be_bytes());
        bytes[10..12].copy_from_slice(&header.track_count().to_be_bytes());
        bytes[12..].copy_from_slice(&header.timing().to_bits().to_be_bytes());
        self.out
            .write_bytes(&bytes)
            .map_err(|e| self.error(e.into()))
    }

    /// Write one `MTrk` chunk.
    pub fn write_track(&mut self, track: &Track<'_>) -> WriteResult<()> {
        let len = self.track_data_len(track)?;
        let declared =
            u32::try_from(len).map_err(|_| self.error(WriterErrorKind::TrackTooLarge(len)))?;

        #[cfg(feature = "tracing")]
        tracing::trace!(len, events = track.len(), "write track");

        let mut chunk_header = [0u8; 8];
        chunk_header[..4].copy_from_slice(b"MTrk");
        chunk_header[4..].copy_from_slice(&declared.to_be_bytes());
        self.out
            .write_bytes(&chunk_header)
            .map_err(|e| self.error(e.into()))?;

        let start = self.out.written;
        let mut encoder = TrackEncoder::new(self.running_status);
        for event in track {
            encoder
                .encode(&self.chunking, event, Some(&mut self.out))
                .map_err(|kind| self.error(kind))?;
        }

        let written = self.out.written - start;
        if written != len {
            return Err(self.error(WriterErrorKind::TrackSizeMismatch { declared, written }));
        }
        Ok(())
    }

    /// Exact size of the event data [`write_track`](Self::write_track) emits
    /// for `track`, without the 8 byte chunk header.
    ///
    /// Errors carry the offset the failing event would have been written at,
    /// assuming the track chunk starts at the current position.
    pub fn track_data_len(&self, track: &Track<'_>) -> WriteResult<u64> {
        let mut encoder = TrackEncoder::new(self.running_status);
        let mut len = 0;
        for event in track {
            len += encoder
                .encode(&self.chunking, event, None)
                .map_err(|kind| WriterError::new(self.out.written + 8 + len, kind))?;
        }
        Ok(len)
    }
}

#[cfg(test)]
fn track_bytes(config: WriterConfig, events: alloc::vec::Vec<TrackEvent<'static>>) -> alloc::vec::Vec<u8> {
    let mut writer = Writer::with_config(alloc::vec::Vec::new(), config);
    writer.write_track(&Track::new(events)).unwrap();
    writer.into_inner()[8..].to_vec()
}

#[test]
fn note_on_off_fixture() {
    use pretty_assertions::assert_eq;
    let bytes = track_bytes(
        WriterConfig::default(),
        alloc::vec![
            TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
            TrackEvent::new(480, Event::note_off(0, 0x40, 0x00)),
        ],
    );
    assert_eq!(bytes, [0x00, 0x90, 0x40, 0x78, 0x83, 0x60, 0x80, 0x40, 0x00]);
}

#[test]
fn running_status_elides_repeats() {
    use pretty_assertions::assert_eq;
    let events = alloc::vec![
        TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
        TrackEvent::new(0, Event::note_on(0, 0x41, 0x78)),
    ];
    assert_eq!(
        track_bytes(WriterConfig::default(), events.clone()),
        [0x00, 0x90, 0x40, 0x78, 0x00, 0x41, 0x78]
    );
    assert_eq!(
        track_bytes(WriterConfig::default().with_running_status(false), events),
        [0x00, 0x90, 0x40, 0x78, 0x00, 0x90, 0x41, 0x78]
    );
}

#[test]
fn non_channel_events_reset_running_status() {
    use pretty_assertions::assert_eq;
    let bytes = track_bytes(
        WriterConfig::default(),
        alloc::vec![
            TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
            TrackEvent::new(0, Event::meta(0x01, alloc::vec![b'a'])),
            TrackEvent::new(0, Event::note_on(0, 0x41, 0x78)),
        ],
    );
    assert_eq!(
        bytes,
        [0x00, 0x90, 0x40, 0x78, 0x00, 0xFF, 0x01, 0x01, b'a', 0x00, 0x90, 0x41, 0x78]
    );
}

#[test]
fn placeholders_are_not_written() {
    use pretty_assertions::assert_eq;
    let bytes = track_bytes(
        WriterConfig::default(),
        alloc::vec![
            TrackEvent::new(0, Event::Short(ShortEvent::PLACEHOLDER)),
            TrackEvent::new(0x10, Event::Short(ShortEvent::PLACEHOLDER)),
            TrackEvent::new(0x20, Event::note_on(0, 0x40, 0x78)),
        ],
    );
    assert_eq!(bytes, [0x30, 0x90, 0x40, 0x78]);
}

#[test]
fn rejects_statuses_that_cannot_be_written() {
    use pretty_assertions::assert_eq;
    for status in [0x40, 0xF0, 0xF7, 0xFF] {
        let track = Track::new(alloc::vec![
            TrackEvent::new(0, Event::note_on(0, 0x3C, 0x01)),
            TrackEvent::new(0, Event::Short(ShortEvent::new(status, 1, 2))),
        ]);
        let mut writer = Writer::new(alloc::vec::Vec::new());
        assert_eq!(
            writer.track_data_len(&track).unwrap_err().error_kind(),
            &WriterErrorKind::InvalidStatus(status)
        );
        let err = writer.write_track(&track).unwrap_err();
        assert_eq!(err.error_kind(), &WriterErrorKind::InvalidStatus(status));
        // nothing reaches the sink, the track is measured first
        assert!(writer.into_inner().is_empty());
    }
}

#[test]
fn measured_length_matches_output() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        TrackEvent::new(0, Event::meta(0x01, alloc::vec![7u8; 300])),
        TrackEvent::new(200, Event::sysex(SysExKind::Start, alloc::vec![1u8; 250])),
        TrackEvent::new(0, Event::program_change(3, 5)),
        TrackEvent::new(0, Event::end_of_track()),
    ]);
    for strategy in [MetaStrategy::Default, MetaStrategy::Segmented] {
        let config = WriterConfig::default().with_meta_strategy(strategy);
        let mut writer = Writer::with_config(alloc::vec::Vec::new(), config);
        let len = writer.track_data_len(&track).unwrap();
        writer.write_track(&track).unwrap();
        assert_eq!(writer.bytes_written(), len + 8);
    }
}

#[test]
fn delta_overflow_reports_position() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
        TrackEvent::new(0x1000_0000, Event::note_off(0, 0x40, 0)),
    ]);
    let mut writer = Writer::new(alloc::vec::Vec::new());
    let err = writer.write_track(&track).unwrap_err();
    assert_eq!(err.error_kind(), &WriterErrorKind::DeltaTimeOverflow(0x1000_0000));
    // 8 byte chunk header, then the 4 byte note on
    assert_eq!(err.position(), 12);
}

#[test]
fn error_position_counts_earlier_chunks() {
    use pretty_assertions::assert_eq;
    let file = MidiFile::new(
        FormatType::SingleMultiChannel,
        Timing::new_ticks_per_quarter_note(96),
    )
    .with_track(Track::new(alloc::vec![
        TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
        TrackEvent::new(0x1000_0000, Event::note_off(0, 0x40, 0)),
    ]));
    let mut writer = Writer::new(alloc::vec::Vec::new());
    let err = writer.write_file(&file).unwrap_err();
    assert_eq!(err.position(), 26);
}
