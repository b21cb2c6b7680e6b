#![doc = r#"
Partitions a flat, time-ordered event stream into per-channel tracks.

Channel events go to one track per channel. Everything else (meta, sysex
and system events) goes to a shared track which always comes first, even
when it ends up empty. The remaining tracks appear in the order their
channel is first seen.

This is the inverse direction of [`merge`](super::merge::merge), but a
merge followed by a split does not reproduce the original tracks. Only each
channel's own event order and absolute timing survive.
"#]

use crate::prelude::*;
use alloc::vec::Vec;

/// Which output track an event lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKey {
    /// Meta, sysex and system events
    Shared,
    /// Channel events of one channel (0-15)
    Channel(u8),
}

impl SplitKey {
    /// The key for `event`
    pub fn of(event: &Event<'_>) -> Self {
        match event.channel() {
            Some(channel) => Self::Channel(channel),
            None => Self::Shared,
        }
    }
}

struct Bucket<'a> {
    key: SplitKey,
    tick: u64,
    track: Track<'a>,
}

impl<'a> Bucket<'a> {
    fn new(key: SplitKey) -> Self {
        Self {
            key,
            tick: 0,
            track: Track::default(),
        }
    }

    fn push(&mut self, at: u64, event: Event<'a>) {
        let delta = u32::try_from(at - self.tick).unwrap_or(u32::MAX);
        self.track.push(TrackEvent::new(delta, event));
        self.tick = at;
    }
}

/// Split `events` into a new format 1 file with the given timing.
pub fn split<'a>(events: &[TrackEvent<'a>], timing: Timing) -> MidiFile<'a> {
    // at most 17 keys, a linear scan keeps first-seen order for free
    let mut buckets = alloc::vec![Bucket::new(SplitKey::Shared)];
    let mut tick = 0u64;

    for event in events {
        tick += event.delta_ticks() as u64;
        let key = SplitKey::of(event.event());
        let index = match buckets.iter().position(|b| b.key == key) {
            Some(index) => index,
            None => {
                buckets.push(Bucket::new(key));
                buckets.len() - 1
            }
        };
        buckets[index].push(tick, event.event().clone());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        events = events.len(),
        tracks = buckets.len(),
        "split event stream"
    );

    let tracks: Vec<Track<'a>> = buckets.into_iter().map(|b| b.track).collect();
    tracks.into_iter().fold(
        MidiFile::new(FormatType::Simultaneous, timing),
        MidiFile::with_track,
    )
}

#[test]
fn shared_track_always_comes_first() {
    use pretty_assertions::assert_eq;
    let events = alloc::vec![
        TrackEvent::new(0, Event::note_on(3, 60, 100)),
        TrackEvent::new(10, Event::note_off(3, 60, 0)),
    ];
    let split = split(&events, Timing::new_ticks_per_quarter_note(480));

    assert_eq!(split.format_type(), FormatType::Simultaneous);
    assert_eq!(split.tracks().len(), 2);
    assert!(split.tracks()[0].is_empty());
    assert_eq!(split.tracks()[1].len(), 2);
}

#[test]
fn deltas_are_per_bucket() {
    use pretty_assertions::assert_eq;
    let events = alloc::vec![
        TrackEvent::new(0, Event::tempo(500_000)),
        TrackEvent::new(0, Event::note_on(1, 60, 100)),
        TrackEvent::new(10, Event::note_on(0, 40, 100)),
        TrackEvent::new(10, Event::note_off(1, 60, 0)),
        TrackEvent::new(5, Event::end_of_track()),
    ];
    let split = split(&events, Timing::new_ticks_per_quarter_note(480));

    let deltas: Vec<Vec<u32>> = split
        .tracks()
        .iter()
        .map(|t| t.iter().map(|e| e.delta_ticks()).collect())
        .collect();
    assert_eq!(
        deltas,
        alloc::vec![alloc::vec![0, 25], alloc::vec![0, 20], alloc::vec![10]]
    );
}
