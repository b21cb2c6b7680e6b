#![doc = r#"
Standard MIDI File codec, track merge/split engine and MIDI 2.0 UMP decoder.

# Overview

- [`reader`] turns a byte stream into a [`MidiFile`](crate::file::MidiFile)
- [`writer`] serializes a [`MidiFile`](crate::file::MidiFile) back into
  byte-exact SMF data, with a pluggable meta event chunking strategy
- [`file::merge`] flattens simultaneous tracks into one time-ordered track,
  and [`file::split`] partitions a flat stream back into per-channel tracks
- [`tempo`] answers "how long until tick N" questions
- [`ump`] decodes packed Universal MIDI Packets

# Example
```rust
use smfkit::prelude::*;

let track = Track::new(vec![
    TrackEvent::new(0, Event::note_on(0, 0x40, 0x78)),
    TrackEvent::new(480, Event::note_off(0, 0x40, 0x00)),
]);
let file = MidiFile::new(FormatType::SingleMultiChannel, Timing::new_ticks_per_quarter_note(480))
    .with_track(track);

let bytes = file.to_bytes(WriterConfig::default()).unwrap();
let parsed = MidiFile::parse(&bytes).unwrap();

assert_eq!(parsed, file);
```
"#]
#![warn(missing_docs)]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod event;
pub mod file;
pub mod io;
pub mod reader;
pub mod tempo;
pub mod ump;
pub mod writer;

mod micros;
pub use micros::*;

mod vlq;

#[doc = r#"
Common re-exports when working with this crate
"#]
pub mod prelude {
    pub use crate::{
        UMicros,
        event::{
            Event, EventType, MetaEvent, MetaType, ShortEvent, SysExEvent, SysExKind, cc,
            per_note_rcc, rpn,
        },
        file::{FormatType, Header, MidiFile, SmpteFps, SmpteHeader, Timing, Track, TrackEvent},
        io::{ByteSink, ByteSource, IoError, LenCounter},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        tempo::{DEFAULT_TEMPO, TempoError},
        ump::{MessageType, Midi2Event, UmpIter},
        writer::{
            DefaultChunking, MetaChunking, MetaStrategy, SegmentedChunking, WriteResult, Writer,
            WriterConfig, WriterError, WriterErrorKind,
        },
    };

    #[cfg(feature = "std")]
    pub use crate::io::{IoSink, IoSource};
}
