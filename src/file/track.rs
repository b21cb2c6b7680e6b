use crate::prelude::*;
use alloc::vec::Vec;

/// One event in a track, with the ticks elapsed since the previous event of
/// the same track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent<'a> {
    delta_ticks: u32,
    event: Event<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, event: Event<'a>) -> Self {
        Self { delta_ticks, event }
    }
    /// Ticks since the previous event in the track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }
    /// The event itself
    pub const fn event(&self) -> &Event<'a> {
        &self.event
    }
    /// Take the event out
    pub fn into_event(self) -> Event<'a> {
        self.event
    }
    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> TrackEvent<'static> {
        TrackEvent {
            delta_ticks: self.delta_ticks,
            event: self.event.into_owned(),
        }
    }
}

#[doc = r#"
An ordered list of [`TrackEvent`]s.

Order carries meaning: events separated by a zero delta happen at the same
tick, in the order listed.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track<'a> {
    events: Vec<TrackEvent<'a>>,
}

impl<'a> Track<'a> {
    /// Create a track from its events
    pub const fn new(events: Vec<TrackEvent<'a>>) -> Self {
        Self { events }
    }
    /// The events of the track
    pub fn events(&self) -> &[TrackEvent<'a>] {
        &self.events
    }
    /// Take the events out
    pub fn into_events(self) -> Vec<TrackEvent<'a>> {
        self.events
    }
    /// Append an event
    pub fn push(&mut self, event: TrackEvent<'a>) {
        self.events.push(event)
    }
    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }
    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    /// Sum of all delta times
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta_ticks as u64).sum()
    }
    /// Iterate over the events
    pub fn iter(&self) -> core::slice::Iter<'_, TrackEvent<'a>> {
        self.events.iter()
    }
    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> Track<'static> {
        Track {
            events: self.events.into_iter().map(TrackEvent::into_owned).collect(),
        }
    }
}

impl<'a> FromIterator<TrackEvent<'a>> for Track<'a> {
    fn from_iter<T: IntoIterator<Item = TrackEvent<'a>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for Track<'a> {
    type Item = TrackEvent<'a>;
    type IntoIter = alloc::vec::IntoIter<TrackEvent<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'t, 'a> IntoIterator for &'t Track<'a> {
    type Item = &'t TrackEvent<'a>;
    type IntoIter = core::slice::Iter<'t, TrackEvent<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
