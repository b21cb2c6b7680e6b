#![doc = r#"
Flattens simultaneous tracks into a single time-ordered track.

# Ordering

Every event is first placed at its absolute tick, track after track. A
*run* is a maximal stretch of consecutive events (in that concatenated
order) sharing one tick. Runs are stable-sorted by tick and then emitted
whole, so:

- events that were simultaneous inside one track keep their order
- events from different tracks at the same tick follow track order

Sorting single events by tick alone would not guarantee either.

# Delta times

Each output delta is the gap to the previous real event. Placeholders
(see [`ShortEvent::PLACEHOLDER`](crate::event::ShortEvent::PLACEHOLDER))
get a zero delta; their interval folds into the next real event. The final
event absorbs whatever gap is left, so the merged track spans exactly as many
ticks as the longest source track.
"#]

use crate::prelude::*;
use alloc::vec::Vec;

/// Merge all tracks of `source` into a new format 0 file.
///
/// The source is left untouched. A source without events still yields one
/// (empty) track and keeps its timing.
pub fn merge<'a>(source: &MidiFile<'a>) -> MidiFile<'a> {
    let timed = absolute_events(source.tracks());

    let merged = MidiFile::new(FormatType::SingleMultiChannel, source.timing());
    if timed.is_empty() {
        return merged.with_track(Track::default());
    }

    let ordered = order_runs(&timed);
    let track = relative_events(&ordered);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tracks = source.tracks().len(),
        events = track.len(),
        "merged tracks"
    );

    merged.with_track(track)
}

fn absolute_events<'t, 'a>(tracks: &'t [Track<'a>]) -> Vec<(u64, &'t Event<'a>)> {
    let capacity = tracks.iter().map(Track::len).sum();
    let mut timed = Vec::with_capacity(capacity);
    for track in tracks {
        let mut tick = 0u64;
        for event in track {
            tick += event.delta_ticks() as u64;
            timed.push((tick, event.event()));
        }
    }
    timed
}

fn order_runs<'t, 'a>(timed: &[(u64, &'t Event<'a>)]) -> Vec<(u64, &'t Event<'a>)> {
    let mut run_starts: Vec<usize> = (0..timed.len())
        .filter(|&i| i == 0 || timed[i].0 != timed[i - 1].0)
        .collect();
    // stable: runs at the same tick stay in source order
    run_starts.sort_by_key(|&i| timed[i].0);

    let mut ordered = Vec::with_capacity(timed.len());
    for start in run_starts {
        let tick = timed[start].0;
        ordered.extend(
            timed[start..]
                .iter()
                .take_while(|(t, _)| *t == tick)
                .copied(),
        );
    }
    ordered
}

fn relative_events<'a>(ordered: &[(u64, &Event<'a>)]) -> Track<'a> {
    let last = ordered.len() - 1;
    let mut previous = 0u64;
    ordered
        .iter()
        .enumerate()
        .map(|(i, &(tick, event))| {
            let delta = if i != last && event.is_placeholder() {
                0
            } else {
                let gap = tick - previous;
                previous = tick;
                gap
            };
            TrackEvent::new(clamp_delta(delta), event.clone())
        })
        .collect()
}

// a single gap past u32 cannot come from u32 deltas of one track, but the
// sum over a long track can; the writer reports it as an overflow anyway
fn clamp_delta(delta: u64) -> u32 {
    u32::try_from(delta).unwrap_or(u32::MAX)
}

#[cfg(test)]
fn note(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    TrackEvent::new(delta, Event::note_on(channel, key, 100))
}

#[cfg(test)]
fn file(tracks: Vec<Track<'static>>) -> MidiFile<'static> {
    tracks.into_iter().fold(
        MidiFile::new(
            FormatType::Simultaneous,
            Timing::new_ticks_per_quarter_note(96),
        ),
        MidiFile::with_track,
    )
}

#[test]
fn empty_source_keeps_timing() {
    use pretty_assertions::assert_eq;
    let source = file(Vec::new());
    let merged = merge(&source);
    assert_eq!(merged.format_type(), FormatType::SingleMultiChannel);
    assert_eq!(merged.timing(), Timing::new_ticks_per_quarter_note(96));
    assert_eq!(merged.tracks(), &[Track::default()]);
}

#[test]
fn interleaves_by_absolute_tick() {
    use pretty_assertions::assert_eq;
    let a = Track::new(alloc::vec![note(0, 0, 60), note(96, 0, 62), note(96, 0, 64)]);
    let b = Track::new(alloc::vec![note(48, 1, 40), note(96, 1, 41)]);
    let merged = merge(&file(alloc::vec![a, b]));

    let got: Vec<(u32, Option<u8>)> = merged.tracks()[0]
        .iter()
        .map(|e| (e.delta_ticks(), e.event().channel()))
        .collect();
    assert_eq!(
        got,
        alloc::vec![
            (0, Some(0)),
            (48, Some(1)),
            (48, Some(0)),
            (48, Some(1)),
            (48, Some(0)),
        ]
    );
}

#[test]
fn runs_keep_their_internal_order() {
    use pretty_assertions::assert_eq;
    // [CDE] at tick 0 in the second track must come before [AB] at 48
    let first = Track::new(alloc::vec![note(48, 0, 1), note(0, 0, 2)]);
    let second = Track::new(alloc::vec![note(0, 1, 3), note(0, 1, 4), note(0, 1, 5)]);
    let merged = merge(&file(alloc::vec![first, second]));

    let keys: Vec<u8> = merged.tracks()[0]
        .iter()
        .map(|e| match e.event() {
            Event::Short(s) => s.data1(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(keys, alloc::vec![3, 4, 5, 1, 2]);
}

#[test]
fn placeholders_fold_into_next_event() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        note(0, 0, 60),
        TrackEvent::new(10, Event::Short(ShortEvent::PLACEHOLDER)),
        note(10, 0, 62),
    ]);
    let merged = merge(&file(alloc::vec![track]));
    let deltas: Vec<u32> = merged.tracks()[0].iter().map(|e| e.delta_ticks()).collect();
    assert_eq!(deltas, alloc::vec![0, 0, 20]);
    assert_eq!(merged.tracks()[0].total_ticks(), 20);
}

#[test]
fn trailing_placeholder_absorbs_the_rest() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        note(5, 0, 60),
        TrackEvent::new(30, Event::Short(ShortEvent::PLACEHOLDER)),
    ]);
    let merged = merge(&file(alloc::vec![track]));
    let deltas: Vec<u32> = merged.tracks()[0].iter().map(|e| e.delta_ticks()).collect();
    assert_eq!(deltas, alloc::vec![5, 30]);
}
