#![doc = r#"
Tick to wall-clock conversion.

All queries walk a flat, time-ordered event slice (a single track, or the
output of [`merge`](crate::file::merge::merge)) and keep one running tempo.
It starts at [`DEFAULT_TEMPO`] and changes at every Set Tempo event, for the
ticks after that event. Time past the last event continues at the last
tempo.

Only tick based timing has a tempo; SMPTE timing is refused.
"#]

use crate::prelude::*;
use thiserror::Error;

pub use crate::event::DEFAULT_TEMPO;

/// Reasons a tempo query fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TempoError {
    /// The timing division does not count ticks per quarter note
    #[error("Tick {tick}: tempo queries need ticks per quarter note, found {timing:?}")]
    UnsupportedTimingFormat {
        /// The queried tick
        tick: u64,
        /// The offending timing
        timing: Timing,
    },
    /// A Set Tempo event is too short to hold a tempo
    #[error("Tick {tick}: Set Tempo payload of {len} bytes")]
    InvalidTempo {
        /// Where the event sits
        tick: u64,
        /// Its payload length
        len: usize,
    },
}

fn ticks_per_quarter_note(timing: Timing, tick: u64) -> Result<f64, TempoError> {
    match timing.ticks_per_quarter_note() {
        Some(tpqn) if tpqn > 0 => Ok(tpqn as f64),
        _ => Err(TempoError::UnsupportedTimingFormat { tick, timing }),
    }
}

/// The new tempo if `event` is a Set Tempo event
fn tempo_change(event: &Event<'_>, tick: u64) -> Result<Option<u32>, TempoError> {
    match event.as_meta() {
        Some(meta) if meta.kind() == Some(MetaType::Tempo) => meta
            .tempo_value()
            .map(Some)
            .ok_or(TempoError::InvalidTempo {
                tick,
                len: meta.data().len(),
            }),
        _ => Ok(None),
    }
}

/// Time elapsed from the start until `tick`.
///
/// # Example
/// ```rust
/// use smfkit::{prelude::*, tempo::play_time_at_tick};
///
/// let timing = Timing::new_ticks_per_quarter_note(96);
/// // one beat at the default 120 BPM
/// assert_eq!(play_time_at_tick(&[], 96, timing), Ok(UMicros::from_ms(500)));
/// ```
pub fn play_time_at_tick(
    events: &[TrackEvent<'_>],
    tick: u64,
    timing: Timing,
) -> Result<UMicros, TempoError> {
    let tpqn = ticks_per_quarter_note(timing, tick)?;
    let mut tempo = DEFAULT_TEMPO as f64;
    let mut elapsed = 0u64;
    let mut micros = 0f64;

    for event in events {
        let delta = event.delta_ticks() as u64;
        if elapsed + delta >= tick {
            micros += tempo * (tick - elapsed) as f64 / tpqn;
            return Ok(UMicros::from_f64_micros(micros));
        }
        micros += tempo * delta as f64 / tpqn;
        elapsed += delta;
        if let Some(new) = tempo_change(event.event(), elapsed)? {
            tempo = new as f64;
        }
    }

    micros += tempo * tick.saturating_sub(elapsed) as f64 / tpqn;
    Ok(UMicros::from_f64_micros(micros))
}

/// Time elapsed until the last event.
pub fn total_play_time(events: &[TrackEvent<'_>], timing: Timing) -> Result<UMicros, TempoError> {
    let ticks = events.iter().map(|e| e.delta_ticks() as u64).sum();
    play_time_at_tick(events, ticks, timing)
}

/// The tempo in effect at `tick`. A Set Tempo event sitting exactly on
/// `tick` counts.
pub fn tempo_at_tick(events: &[TrackEvent<'_>], tick: u64) -> Result<u32, TempoError> {
    let mut tempo = DEFAULT_TEMPO;
    let mut elapsed = 0u64;
    for event in events {
        elapsed += event.delta_ticks() as u64;
        if elapsed > tick {
            break;
        }
        if let Some(new) = tempo_change(event.event(), elapsed)? {
            tempo = new;
        }
    }
    Ok(tempo)
}

#[test]
fn default_tempo_before_any_change() {
    use pretty_assertions::assert_eq;
    let events = [TrackEvent::new(480, Event::tempo(300_000))];
    assert_eq!(tempo_at_tick(&events, 0), Ok(DEFAULT_TEMPO));
    assert_eq!(tempo_at_tick(&events, 479), Ok(DEFAULT_TEMPO));
    assert_eq!(tempo_at_tick(&events, 480), Ok(300_000));
}

#[test]
fn partial_interval_is_prorated() {
    use pretty_assertions::assert_eq;
    let timing = Timing::new_ticks_per_quarter_note(480);
    let events = [
        TrackEvent::new(0, Event::tempo(1_000_000)),
        TrackEvent::new(960, Event::note_on(0, 60, 100)),
    ];
    assert_eq!(play_time_at_tick(&events, 240, timing), Ok(UMicros::from_ms(500)));
    assert_eq!(total_play_time(&events, timing), Ok(UMicros::from_ms(2_000)));
    // past the end the last tempo keeps going
    assert_eq!(play_time_at_tick(&events, 1440, timing), Ok(UMicros::from_ms(3_000)));
}

#[test]
fn tempo_applies_after_its_own_delta() {
    use pretty_assertions::assert_eq;
    let timing = Timing::new_ticks_per_quarter_note(100);
    let events = [
        TrackEvent::new(100, Event::tempo(1_000_000)),
        TrackEvent::new(100, Event::end_of_track()),
    ];
    assert_eq!(play_time_at_tick(&events, 100, timing), Ok(UMicros::from_ms(500)));
    assert_eq!(total_play_time(&events, timing), Ok(UMicros::from_ms(1_500)));
}

#[test]
fn smpte_timing_is_refused() {
    use pretty_assertions::assert_eq;
    let timing = Timing::new_smpte(SmpteFps::TwentyFive, 40);
    assert_eq!(
        total_play_time(&[], timing),
        Err(TempoError::UnsupportedTimingFormat { tick: 0, timing })
    );
    let zero = Timing::new_ticks_per_quarter_note(0);
    assert!(play_time_at_tick(&[], 10, zero).is_err());
}

#[test]
fn short_tempo_payload() {
    use pretty_assertions::assert_eq;
    let events = [
        TrackEvent::new(0, Event::meta(0x51, alloc::vec![0x07u8, 0xA1])),
        TrackEvent::new(10, Event::end_of_track()),
    ];
    let timing = Timing::new_ticks_per_quarter_note(96);
    assert_eq!(
        total_play_time(&events, timing),
        Err(TempoError::InvalidTempo { tick: 0, len: 2 })
    );
}
