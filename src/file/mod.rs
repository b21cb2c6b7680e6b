#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod track;
pub use track::*;

mod timing;
pub use timing::*;

pub mod merge;
pub mod split;

use crate::{
    io::{ByteSink, ByteSource},
    prelude::*,
    tempo,
};
use alloc::{borrow::Cow, vec::Vec};

#[doc = r#"
A complete piece of music: a layout, a timing division and its tracks.

Build one directly, or get one from [`MidiFile::parse`] /
[`MidiFile::read`]. [`merge`](MidiFile::merge) and [`split`](MidiFile::split)
always produce a new file and leave `self` as it was.
"#]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile<'a> {
    format: FormatType,
    timing: Timing,
    tracks: Vec<Track<'a>>,
}

impl<'a> MidiFile<'a> {
    /// An empty file
    pub const fn new(format: FormatType, timing: Timing) -> Self {
        Self {
            format,
            timing,
            tracks: Vec::new(),
        }
    }

    /// Builder style [`push_track`](Self::push_track)
    pub fn with_track(mut self, track: Track<'a>) -> Self {
        self.tracks.push(track);
        self
    }

    /// Append a track
    pub fn push_track(&mut self, track: Track<'a>) {
        self.tracks.push(track)
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<MidiFile<'static>> {
        Reader::from_byte_slice(bytes).read_file()
    }

    /// Read a file out of any byte source
    pub fn read<S: ByteSource>(source: S) -> ReadResult<MidiFile<'static>> {
        Reader::new(source).read_file()
    }

    /// Serialize into `sink`
    pub fn write<S: ByteSink>(&self, sink: S, config: WriterConfig) -> WriteResult<()> {
        Writer::with_config(sink, config).write_file(self)
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self, config: WriterConfig) -> WriteResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes, config)?;
        Ok(bytes)
    }

    /// Returns header info
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Track<'a>] {
        &self.tracks
    }

    /// Take the tracks out
    pub fn into_tracks(self) -> Vec<Track<'a>> {
        self.tracks
    }

    /// The header this file serializes with
    pub fn header(&self) -> Header {
        let count = u16::try_from(self.tracks.len()).unwrap_or(u16::MAX);
        Header::new(self.format, count, self.timing)
    }

    /// Flatten every track into one format 0 track. See [`merge::merge`].
    pub fn merge(&self) -> MidiFile<'a> {
        merge::merge(self)
    }

    /// Partition the flattened events into per-channel tracks. See
    /// [`split::split`].
    pub fn split(&self) -> MidiFile<'a> {
        split::split(&self.flat_events(), self.timing)
    }

    /// All events in playback order, with delta times relative to the
    /// previous event. A format 0 file with a single track is borrowed as
    /// is, anything else is merged first.
    pub fn flat_events(&self) -> Cow<'_, [TrackEvent<'a>]> {
        match (self.format, self.tracks.as_slice()) {
            (FormatType::SingleMultiChannel, []) => Cow::Borrowed(&[]),
            (FormatType::SingleMultiChannel, [track]) => Cow::Borrowed(track.events()),
            _ => Cow::Owned(
                self.merge()
                    .into_tracks()
                    .into_iter()
                    .next()
                    .map(Track::into_events)
                    .unwrap_or_default(),
            ),
        }
    }

    /// Length of the music in ticks: the longest track's summed deltas.
    pub fn total_ticks(&self) -> u64 {
        self.flat_events()
            .iter()
            .map(|e| e.delta_ticks() as u64)
            .sum()
    }

    /// Real time length of the music, honoring tempo changes.
    pub fn total_play_time(&self) -> Result<UMicros, TempoError> {
        tempo::total_play_time(&self.flat_events(), self.timing)
    }

    /// Real time elapsed when playback reaches `tick`.
    pub fn time_at_tick(&self, tick: u64) -> Result<UMicros, TempoError> {
        tempo::play_time_at_tick(&self.flat_events(), tick, self.timing)
    }

    /// Meta events of one type, in playback order.
    ///
    /// Delta times are recomputed so each returned event is relative to the
    /// previous returned one.
    pub fn meta_events(&self, meta_type: u8) -> Vec<TrackEvent<'a>> {
        let mut tick = 0u64;
        let mut last = 0u64;
        let mut found = Vec::new();
        for event in self.flat_events().iter() {
            tick += event.delta_ticks() as u64;
            if matches!(event.event().as_meta(), Some(m) if m.meta_type() == meta_type) {
                let delta = u32::try_from(tick - last).unwrap_or(u32::MAX);
                found.push(TrackEvent::new(delta, event.event().clone()));
                last = tick;
            }
        }
        found
    }

    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> MidiFile<'static> {
        MidiFile {
            format: self.format,
            timing: self.timing,
            tracks: self.tracks.into_iter().map(Track::into_owned).collect(),
        }
    }
}

#[cfg(test)]
fn two_track_file() -> MidiFile<'static> {
    MidiFile::new(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(480),
    )
    .with_track(Track::new(alloc::vec![
        TrackEvent::new(0, Event::tempo(500_000)),
        TrackEvent::new(960, Event::tempo(250_000)),
        TrackEvent::new(0, Event::end_of_track()),
    ]))
    .with_track(Track::new(alloc::vec![
        TrackEvent::new(0, Event::note_on(0, 60, 100)),
        TrackEvent::new(1920, Event::note_off(0, 60, 0)),
    ]))
}

#[test]
fn total_ticks_is_the_longest_track() {
    use pretty_assertions::assert_eq;
    assert_eq!(two_track_file().total_ticks(), 1920);
}

#[test]
fn play_time_follows_tempo_changes() {
    use pretty_assertions::assert_eq;
    let file = two_track_file();
    // two beats at 120 BPM, then two beats at 240 BPM
    assert_eq!(file.time_at_tick(960), Ok(UMicros::new(1_000_000)));
    assert_eq!(file.total_play_time(), Ok(UMicros::new(1_500_000)));
}

#[test]
fn meta_events_are_relative_to_each_other() {
    use pretty_assertions::assert_eq;
    let tempos = two_track_file().meta_events(MetaType::Tempo.into());
    let deltas: Vec<u32> = tempos.iter().map(|e| e.delta_ticks()).collect();
    assert_eq!(deltas, alloc::vec![0, 960]);
}

#[test]
fn split_flattens_first() {
    use pretty_assertions::assert_eq;
    let split = two_track_file().split();
    assert_eq!(split.tracks().len(), 2);
    assert_eq!(split.tracks()[0].len(), 3);
    assert_eq!(split.tracks()[1].total_ticks(), 1920);
}
