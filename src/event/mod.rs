#![doc = r#"
The event model: one timed MIDI 1.0 event as it lives inside a track.

# Layout
```text
              |-------|
              | Event |
              |-------|
           /      |       \
|------------| |-----------| |-----------|
| ShortEvent | | SysExEvent| | MetaEvent |
|------------| |-----------| |-----------|
 status + 0-2   F0/F7 +       FF + type +
 data bytes     payload       payload
```

A [`ShortEvent`] never owns a payload. [`SysExEvent`] and [`MetaEvent`]
always reference one, borrowed when built from a slice and owned when
produced by the [`Reader`](crate::reader::Reader).
"#]

mod controller;
pub use controller::*;

mod meta;
pub use meta::*;

use alloc::borrow::Cow;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Status byte values, coarse by event type.
///
/// Channel kinds carry a zero low nibble; the channel lives in the status
/// byte of the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum EventType {
    NoteOff = 0x80,
    NoteOn = 0x90,
    PolyPressure = 0xA0,
    ControlChange = 0xB0,
    ProgramChange = 0xC0,
    ChannelPressure = 0xD0,
    PitchBend = 0xE0,
    SysEx = 0xF0,
    MtcQuarterFrame = 0xF1,
    SongPositionPointer = 0xF2,
    SongSelect = 0xF3,
    TuneRequest = 0xF6,
    SysExEnd = 0xF7,
    TimingClock = 0xF8,
    Tick = 0xF9,
    Start = 0xFA,
    Continue = 0xFB,
    Stop = 0xFC,
    ActiveSense = 0xFE,
    /// `0xFF` is Reset on the wire, but a meta event inside a file.
    Meta = 0xFF,
}

impl EventType {
    /// The coarse type of a status byte: the high nibble for channel
    /// statuses, the whole byte for system statuses.
    pub const fn coarse(status: u8) -> u8 {
        if status >= 0xF0 { status } else { status & 0xF0 }
    }
}

/// Number of data bytes that follow `status` in a fixed size event.
///
/// Sysex and meta statuses report 0: their length is variable and
/// encoded separately.
pub const fn fixed_data_len(status: u8) -> u8 {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        0xF0 => match status {
            0xF1 | 0xF3 => 1,
            0xF2 => 2,
            _ => 0,
        },
        _ => 2,
    }
}

/// A fixed size event: a status byte followed by 0 to 2 data bytes.
///
/// Data bytes past [`data_len`](Self::data_len) are always zero, so two
/// events that put the same bytes on the wire compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortEvent {
    bytes: [u8; 3],
}

impl ShortEvent {
    /// A do-nothing event with a zero status byte.
    ///
    /// The merger treats it as a placeholder when laying out delta times.
    pub const PLACEHOLDER: Self = Self { bytes: [0; 3] };

    /// Create an event. Data bytes the status does not use are dropped.
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        let bytes = match fixed_data_len(status) {
            0 => [status, 0, 0],
            1 => [status, data1, 0],
            _ => [status, data1, data2],
        };
        Self { bytes }
    }

    /// The status byte
    pub const fn status(&self) -> u8 {
        self.bytes[0]
    }
    /// The first data byte, or 0
    pub const fn data1(&self) -> u8 {
        self.bytes[1]
    }
    /// The second data byte, or 0
    pub const fn data2(&self) -> u8 {
        self.bytes[2]
    }
    /// How many data bytes this event carries
    pub const fn data_len(&self) -> u8 {
        fixed_data_len(self.status())
    }
    /// The data bytes only
    pub fn data(&self) -> &[u8] {
        &self.bytes[1..1 + self.data_len() as usize]
    }
    /// The complete message as it would be sent to a device
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..1 + self.data_len() as usize]
    }
    /// Returns the channel (0-15) for channel statuses
    pub const fn channel(&self) -> Option<u8> {
        if self.is_channel() {
            Some(self.status() & 0x0F)
        } else {
            None
        }
    }
    /// True for statuses 0x80 through 0xEF
    pub const fn is_channel(&self) -> bool {
        matches!(self.status(), 0x80..=0xEF)
    }
    /// See [`ShortEvent::PLACEHOLDER`]
    pub const fn is_placeholder(&self) -> bool {
        self.status() == 0
    }
    /// The coarse [`EventType`] value (see [`EventType::coarse`])
    pub const fn event_type(&self) -> u8 {
        EventType::coarse(self.status())
    }
}

/// Which of the two sysex framings the event uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SysExKind {
    /// `F0`: a sysex message, or its first packet
    Start = 0xF0,
    /// `F7`: a continuation packet or an escaped sequence of raw bytes
    End = 0xF7,
}

/// A system exclusive event with its raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent<'a> {
    kind: SysExKind,
    data: Cow<'a, [u8]>,
}

impl<'a> SysExEvent<'a> {
    /// Create a sysex event
    pub fn new(kind: SysExKind, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }
    /// `F0` or `F7`
    pub const fn kind(&self) -> SysExKind {
        self.kind
    }
    /// Payload after the length prefix
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> SysExEvent<'static> {
        SysExEvent {
            kind: self.kind,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// Any event a track can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event<'a> {
    /// Channel voice, channel mode or system event
    Short(ShortEvent),
    /// `F0`/`F7` system exclusive
    SysEx(SysExEvent<'a>),
    /// `FF` meta event
    Meta(MetaEvent<'a>),
}

impl<'a> Event<'a> {
    /// The status byte this event is introduced by
    pub fn status(&self) -> u8 {
        match self {
            Self::Short(s) => s.status(),
            Self::SysEx(s) => s.kind().into(),
            Self::Meta(_) => EventType::Meta.into(),
        }
    }
    /// The coarse [`EventType`] value (see [`EventType::coarse`])
    pub fn event_type(&self) -> u8 {
        EventType::coarse(self.status())
    }
    /// The channel, for channel events
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::Short(s) => s.channel(),
            _ => None,
        }
    }
    /// See [`ShortEvent::PLACEHOLDER`]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Short(s) if s.is_placeholder())
    }
    /// The variable length payload of sysex and meta events
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Short(_) => None,
            Self::SysEx(s) => Some(s.data()),
            Self::Meta(m) => Some(m.data()),
        }
    }
    /// Returns the meta event, if this is one
    pub fn as_meta(&self) -> Option<&MetaEvent<'a>> {
        match self {
            Self::Meta(m) => Some(m),
            _ => None,
        }
    }
    /// Detach from any borrowed buffer
    pub fn into_owned(self) -> Event<'static> {
        match self {
            Self::Short(s) => Event::Short(s),
            Self::SysEx(s) => Event::SysEx(s.into_owned()),
            Self::Meta(m) => Event::Meta(m.into_owned()),
        }
    }

    /// Note on. `channel` is 0-15.
    pub const fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::channel_event(EventType::NoteOn, channel, key, velocity)
    }
    /// Note off. `channel` is 0-15.
    pub const fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::channel_event(EventType::NoteOff, channel, key, velocity)
    }
    /// Polyphonic key pressure
    pub const fn poly_pressure(channel: u8, key: u8, pressure: u8) -> Self {
        Self::channel_event(EventType::PolyPressure, channel, key, pressure)
    }
    /// Control change; see [`cc`] for controller numbers
    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::channel_event(EventType::ControlChange, channel, controller, value)
    }
    /// Program change
    pub const fn program_change(channel: u8, program: u8) -> Self {
        Self::channel_event(EventType::ProgramChange, channel, program, 0)
    }
    /// Channel pressure
    pub const fn channel_pressure(channel: u8, pressure: u8) -> Self {
        Self::channel_event(EventType::ChannelPressure, channel, pressure, 0)
    }
    /// Pitch bend, 14 bits centered on 0x2000
    pub const fn pitch_bend(channel: u8, value: u16) -> Self {
        let lsb = (value & 0x7F) as u8;
        let msb = ((value >> 7) & 0x7F) as u8;
        Self::channel_event(EventType::PitchBend, channel, lsb, msb)
    }
    /// Sysex event
    pub fn sysex(kind: SysExKind, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::SysEx(SysExEvent::new(kind, data))
    }
    /// Meta event of any type
    pub fn meta(meta_type: u8, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::Meta(MetaEvent::new(meta_type, data))
    }
    /// Set Tempo meta event, in microseconds per quarter note
    pub fn tempo(micros_per_quarter_note: u32) -> Self {
        Self::Meta(MetaEvent::tempo(micros_per_quarter_note))
    }
    /// End of Track meta event
    pub fn end_of_track() -> Self {
        Self::meta(MetaType::EndOfTrack.into(), alloc::vec::Vec::new())
    }

    const fn channel_event(kind: EventType, channel: u8, data1: u8, data2: u8) -> Self {
        let status = kind as u8 | (channel & 0x0F);
        Self::Short(ShortEvent::new(status, data1 & 0x7F, data2 & 0x7F))
    }
}

impl From<ShortEvent> for Event<'_> {
    fn from(value: ShortEvent) -> Self {
        Self::Short(value)
    }
}

impl<'a> From<SysExEvent<'a>> for Event<'a> {
    fn from(value: SysExEvent<'a>) -> Self {
        Self::SysEx(value)
    }
}

impl<'a> From<MetaEvent<'a>> for Event<'a> {
    fn from(value: MetaEvent<'a>) -> Self {
        Self::Meta(value)
    }
}

#[test]
fn fixed_lengths_follow_status() {
    use pretty_assertions::assert_eq;
    assert_eq!(fixed_data_len(0x90), 2);
    assert_eq!(fixed_data_len(0x8F), 2);
    assert_eq!(fixed_data_len(0xB3), 2);
    assert_eq!(fixed_data_len(0xC0), 1);
    assert_eq!(fixed_data_len(0xD5), 1);
    assert_eq!(fixed_data_len(0xE0), 2);
    assert_eq!(fixed_data_len(0xF1), 1);
    assert_eq!(fixed_data_len(0xF2), 2);
    assert_eq!(fixed_data_len(0xF3), 1);
    assert_eq!(fixed_data_len(0xF6), 0);
    assert_eq!(fixed_data_len(0xF8), 0);
}

#[test]
fn short_events_drop_unused_bytes() {
    use pretty_assertions::assert_eq;
    let program = ShortEvent::new(0xC3, 0x30, 0x55);
    assert_eq!(program.as_bytes(), &[0xC3, 0x30]);
    assert_eq!(program, ShortEvent::new(0xC3, 0x30, 0x00));
    assert_eq!(program.channel(), Some(3));
    assert_eq!(program.event_type(), 0xC0);

    let clock = ShortEvent::new(0xF8, 1, 2);
    assert_eq!(clock.as_bytes(), &[0xF8]);
    assert_eq!(clock.channel(), None);
    assert_eq!(clock.event_type(), 0xF8);
}

#[test]
fn constructors_build_raw_commands() {
    use pretty_assertions::assert_eq;
    let Event::Short(on) = Event::note_on(0, 0x40, 120) else {
        panic!()
    };
    assert_eq!(on.as_bytes(), &[0x90, 0x40, 0x78]);

    let Event::Short(cc) = Event::control_change(0, cc::VOLUME, 120) else {
        panic!()
    };
    assert_eq!(cc.as_bytes(), &[0xB0, 0x07, 0x78]);

    let Event::Short(bend) = Event::pitch_bend(2, 0x2000) else {
        panic!()
    };
    assert_eq!(bend.as_bytes(), &[0xE2, 0x00, 0x40]);

    assert_eq!(Event::end_of_track().status(), 0xFF);
    assert!(Event::Short(ShortEvent::PLACEHOLDER).is_placeholder());
    assert!(!Event::note_off(0, 0, 0).is_placeholder());
}
