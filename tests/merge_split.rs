use pretty_assertions::assert_eq;
use smfkit::prelude::*;

fn absolute(events: &[TrackEvent<'_>]) -> Vec<(u64, Event<'static>)> {
    let mut tick = 0;
    events
        .iter()
        .map(|e| {
            tick += e.delta_ticks() as u64;
            (tick, e.event().clone().into_owned())
        })
        .collect()
}

fn band() -> MidiFile<'static> {
    MidiFile::new(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(96),
    )
    .with_track(Track::new(vec![
        TrackEvent::new(0, Event::meta(MetaType::TrackName.into(), b"conductor".to_vec())),
        TrackEvent::new(0, Event::tempo(500_000)),
        TrackEvent::new(192, Event::tempo(400_000)),
        TrackEvent::new(0, Event::end_of_track()),
    ]))
    .with_track(Track::new(vec![
        TrackEvent::new(0, Event::program_change(0, 33)),
        TrackEvent::new(0, Event::note_on(0, 40, 100)),
        TrackEvent::new(96, Event::note_off(0, 40, 0)),
        TrackEvent::new(0, Event::note_on(0, 43, 100)),
        TrackEvent::new(96, Event::note_off(0, 43, 0)),
    ]))
    .with_track(Track::new(vec![
        TrackEvent::new(48, Event::note_on(9, 36, 127)),
        TrackEvent::new(48, Event::note_on(9, 38, 127)),
        TrackEvent::new(0, Event::note_on(1, 60, 80)),
        TrackEvent::new(288, Event::note_off(1, 60, 0)),
    ]))
}

#[test]
fn merge_spans_the_longest_track() {
    let file = band();
    let merged = file.merge();
    assert_eq!(merged.format_type(), FormatType::SingleMultiChannel);
    assert_eq!(merged.tracks().len(), 1);
    assert_eq!(merged.tracks()[0].total_ticks(), 384);
    assert_eq!(file.total_ticks(), 384);
    // the source is untouched
    assert_eq!(file, band());
}

#[test]
fn merge_orders_ties_by_track() {
    let merged = band().merge();
    let at_96: Vec<_> = absolute(merged.tracks()[0].events())
        .into_iter()
        .filter(|(tick, _)| *tick == 96)
        .map(|(_, event)| event)
        .collect();
    assert_eq!(
        at_96,
        vec![
            Event::note_off(0, 40, 0),
            Event::note_on(0, 43, 100),
            Event::note_on(9, 38, 127),
            Event::note_on(1, 60, 80),
        ]
    );
}

#[test]
fn merge_keeps_absolute_times() {
    let file = band();
    let mut expected: Vec<_> = file
        .tracks()
        .iter()
        .flat_map(|t| absolute(t.events()))
        .collect();
    expected.sort_by_key(|(tick, _)| *tick);

    let merged = absolute(file.merge().tracks()[0].events());
    assert_eq!(merged.len(), expected.len());
    let ticks: Vec<u64> = merged.iter().map(|(t, _)| *t).collect();
    let expected_ticks: Vec<u64> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(ticks, expected_ticks);
}

#[test]
fn merging_twice_changes_nothing() {
    let once = band().merge();
    assert_eq!(once.merge(), once);
}

#[test]
fn split_after_merge_keeps_each_channel() {
    let file = band();
    let split = file.merge().split();
    assert_eq!(split.format_type(), FormatType::Simultaneous);
    assert_eq!(split.tracks().len(), 4);

    let shared = absolute(split.tracks()[0].events());
    assert!(shared.iter().all(|(_, e)| e.channel().is_none()));
    assert_eq!(shared.len(), 4);

    for track in &split.tracks()[1..] {
        let events = absolute(track.events());
        let channel = events[0].1.channel().unwrap();
        assert!(events.iter().all(|(_, e)| e.channel() == Some(channel)));

        let original: Vec<_> = file
            .tracks()
            .iter()
            .flat_map(|t| absolute(t.events()))
            .filter(|(_, e)| e.channel() == Some(channel))
            .collect();
        assert_eq!(events, original);
    }
}

#[test]
fn split_orders_channels_by_first_appearance() {
    let split = band().split();
    let channels: Vec<Option<u8>> = split
        .tracks()
        .iter()
        .map(|t| t.events().first().and_then(|e| e.event().channel()))
        .collect();
    assert_eq!(channels, vec![None, Some(0), Some(9), Some(1)]);
}

#[test]
fn merged_file_serializes() {
    let merged = band().merge();
    let bytes = merged.to_bytes(WriterConfig::default()).unwrap();
    assert_eq!(MidiFile::parse(&bytes).unwrap(), merged);
}

#[test]
fn tempo_queries_on_a_multi_track_file() {
    let file = band();
    // two beats at 120 BPM, two beats at 150 BPM
    assert_eq!(file.time_at_tick(192), Ok(UMicros::new(1_000_000)));
    assert_eq!(file.total_play_time(), Ok(UMicros::new(1_800_000)));
    let tempos = file.meta_events(MetaType::Tempo.into());
    assert_eq!(tempos.len(), 2);
    assert_eq!(tempos[1].delta_ticks(), 192);
}
