#![doc = r#"
Contains the [`Reader`], which turns a stream of bytes into a [`MidiFile`].

The reader pulls single bytes out of a [`ByteSource`] and keeps one byte of
lookahead, which is all running status needs: a data byte in status
position is peeked, found to be data, and left for the event body.

Everything the reader produces owns its payloads, so the result outlives
the input buffer.
"#]

mod error;
pub use error::*;

use crate::{
    event::{SysExKind, fixed_data_len},
    io::ByteSource,
    prelude::*,
};
use alloc::vec::Vec;

const HEADER_TAG: [u8; 4] = *b"MThd";
const TRACK_TAG: [u8; 4] = *b"MTrk";
const HEADER_LEN: u32 = 6;
/// Upper bound on the up front allocation for a payload. The declared
/// length is only checked against the chunk header, which the input may
/// not back with real bytes.
const PAYLOAD_PREALLOC: usize = 4096;

#[doc = r#"
A streaming SMF reader.

# Example
```rust
use smfkit::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0, 0xFF, 0x2F, 0,
];
let mut reader = Reader::from_byte_slice(&bytes);
let header = reader.read_header().unwrap();
assert_eq!(header.format(), FormatType::Simultaneous);
assert_eq!(header.track_count(), 1);

let track = reader.read_track().unwrap();
assert_eq!(track.len(), 1);
```
"#]
#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    peeked: Option<u8>,
    position: usize,
    running_status: Option<u8>,
}

impl<'s> Reader<&'s [u8]> {
    /// Read from an in-memory buffer
    pub const fn from_byte_slice(bytes: &'s [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<S> Reader<S> {
    /// Read from any byte source
    pub const fn new(source: S) -> Self {
        Self {
            source,
            peeked: None,
            position: 0,
            running_status: None,
        }
    }

    /// Number of bytes consumed so far
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Give back the byte source
    pub fn into_inner(self) -> S {
        self.source
    }

    const fn error(&self, kind: ReaderErrorKind) -> ReaderError {
        ReaderError::new(self.position, kind)
    }
}

impl<S: ByteSource> Reader<S> {
    /// Read a complete file: the header and every track it declares.
    ///
    /// Bytes after the last declared track are left unread.
    pub fn read_file(&mut self) -> ReadResult<MidiFile<'static>> {
        let header = self.read_header()?;
        let mut file = MidiFile::new(header.format(), header.timing());
        for _ in 0..header.track_count() {
            file.push_track(self.read_track()?);
        }
        Ok(file)
    }

    /// Read and validate the `MThd` chunk.
    pub fn read_header(&mut self) -> ReadResult<Header> {
        self.expect_tag(HEADER_TAG)?;
        let len = self.read_u32()?;
        if len != HEADER_LEN {
            return Err(self.error(ReaderErrorKind::UnexpectedChunkSize(len)));
        }

        let bits = self.read_u16()?;
        let format = FormatType::try_from(bits)
            .map_err(|_| self.error(HeaderError::InvalidFormat(bits).into()))?;
        let track_count = self.read_u16()?;
        let division = self.read_u16()?;
        let timing = Timing::from_bits(division).map_err(|e| self.error(e.into()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(?format, track_count, ?timing, "read header");

        Ok(Header::new(format, track_count, timing))
    }

    /// Read one `MTrk` chunk.
    ///
    /// The events must use up exactly the declared chunk length. Running
    /// status never carries over from a previous track.
    pub fn read_track(&mut self) -> ReadResult<Track<'static>> {
        self.expect_tag(TRACK_TAG)?;
        let declared = self.read_u32()?;
        let start = self.position;
        let end = start.saturating_add(declared as usize);
        self.running_status = None;

        let mut track = Track::default();
        while self.position < end {
            track.push(self.read_event(end)?);
        }

        let consumed = (self.position - start) as u64;
        if consumed != declared as u64 {
            return Err(self.error(ReaderErrorKind::TrackSizeMismatch { declared, consumed }));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(len = declared, events = track.len(), "read track");

        Ok(track)
    }

    fn read_event(&mut self, end: usize) -> ReadResult<TrackEvent<'static>> {
        let delta = self.read_vlq()?;

        let first = self.peek()?;
        let status = if first & 0x80 != 0 {
            self.next_byte()?;
            first
        } else {
            self.running_status
                .ok_or_else(|| self.error(ReaderErrorKind::MissingRunningStatus(first)))?
        };

        let event = match status {
            0xFF => {
                let meta_type = self.next_byte()?;
                let data = self.read_payload(end)?;
                Event::meta(meta_type, data)
            }
            0xF0 | 0xF7 => {
                self.running_status = None;
                let kind = if status == 0xF0 {
                    SysExKind::Start
                } else {
                    SysExKind::End
                };
                let data = self.read_payload(end)?;
                Event::sysex(kind, data)
            }
            _ => {
                match status {
                    0x80..=0xEF => self.running_status = Some(status),
                    0xF1..=0xF6 => self.running_status = None,
                    // realtime bytes may interleave without breaking a run
                    _ => {}
                }
                let mut data = [0u8; 2];
                for slot in &mut data[..fixed_data_len(status) as usize] {
                    *slot = self.next_byte()?;
                }
                ShortEvent::new(status, data[0], data[1]).into()
            }
        };

        Ok(TrackEvent::new(delta, event))
    }

    /// A length-prefixed payload that must fit inside the current track.
    fn read_payload(&mut self, end: usize) -> ReadResult<Vec<u8>> {
        let len = self.read_vlq()?;
        if len as usize > end.saturating_sub(self.position) {
            return Err(self.error(ReaderErrorKind::InvalidEventLength(len)));
        }
        let mut data = Vec::with_capacity((len as usize).min(PAYLOAD_PREALLOC));
        for _ in 0..len {
            data.push(self.next_byte()?);
        }
        Ok(data)
    }

    /// A variable-length quantity of at most four bytes.
    fn read_vlq(&mut self) -> ReadResult<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.next_byte()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(self.error(ReaderErrorKind::DeltaTimeOverflow))
    }

    fn expect_tag(&mut self, expected: [u8; 4]) -> ReadResult<()> {
        let start = self.position;
        let found = self.read_array::<4>()?;
        if found != expected {
            return Err(ReaderError::new(
                start,
                HeaderError::InvalidMagic { expected, found }.into(),
            ));
        }
        Ok(())
    }

    fn read_u16(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_u32(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut bytes = [0u8; N];
        for slot in &mut bytes {
            *slot = self.next_byte()?;
        }
        Ok(bytes)
    }

    fn peek(&mut self) -> ReadResult<u8> {
        if let Some(byte) = self.peeked {
            return Ok(byte);
        }
        let byte = self.pull()?;
        self.peeked = Some(byte);
        Ok(byte)
    }

    fn next_byte(&mut self) -> ReadResult<u8> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.pull()?,
        };
        self.position += 1;
        Ok(byte)
    }

    fn pull(&mut self) -> ReadResult<u8> {
        match self.source.read_byte() {
            Ok(Some(byte)) => Ok(byte),
            Ok(None) => Err(self.error(ReaderErrorKind::StreamTruncated)),
            Err(e) => Err(self.error(e.into())),
        }
    }
}

#[cfg(test)]
fn with_track(body: &[u8]) -> Vec<u8> {
    let mut bytes = alloc::vec![
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, b'M', b'T', b'r', b'k',
    ];
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

#[cfg(test)]
fn kind_of(bytes: &[u8]) -> ReaderErrorKind {
    MidiFile::parse(bytes).unwrap_err().error_kind().clone()
}

#[test]
fn reads_header_fixture() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 0x60];
    let header = Reader::from_byte_slice(&bytes).read_header().unwrap();
    assert_eq!(header.format(), FormatType::Simultaneous);
    assert_eq!(header.track_count(), 1);
    assert_eq!(header.timing().ticks_per_quarter_note(), Some(96));
}

#[test]
fn header_length_is_big_endian() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0x00, 0x00, 0x01, 0x06];
    let err = Reader::from_byte_slice(&bytes).read_header().unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::UnexpectedChunkSize(262));
    assert_eq!(err.position(), 8);
}

#[test]
fn rejects_bad_magic_and_format() {
    use pretty_assertions::assert_eq;
    let err = Reader::from_byte_slice(b"RIFF").read_header().unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::MalformedHeader(HeaderError::InvalidMagic {
            expected: *b"MThd",
            found: *b"RIFF",
        })
    );
    assert_eq!(err.position(), 0);

    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 3, 0, 1, 0, 0x60];
    assert_eq!(
        kind_of(&bytes),
        ReaderErrorKind::MalformedHeader(HeaderError::InvalidFormat(3))
    );
}

#[test]
fn reuses_running_status() {
    use pretty_assertions::assert_eq;
    let bytes = with_track(&[0x00, 0x90, 0x40, 0x78, 0x10, 0x41, 0x78, 0x00, 0xFF, 0x2F, 0x00]);
    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1], TrackEvent::new(0x10, Event::note_on(0, 0x41, 0x78)));
}

#[test]
fn meta_keeps_running_status_but_sysex_clears_it() {
    use pretty_assertions::assert_eq;
    let meta = with_track(&[0, 0x90, 0x40, 0x78, 0, 0xFF, 0x01, 0x00, 0, 0x41, 0x78]);
    assert_eq!(MidiFile::parse(&meta).unwrap().tracks()[0].len(), 3);

    let sysex = with_track(&[0, 0x90, 0x40, 0x78, 0, 0xF0, 0x01, 0xF7, 0, 0x41, 0x78]);
    assert_eq!(kind_of(&sysex), ReaderErrorKind::MissingRunningStatus(0x41));
}

#[test]
fn data_byte_without_status() {
    use pretty_assertions::assert_eq;
    let bytes = with_track(&[0x00, 0x40, 0x78]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::MissingRunningStatus(0x40));
    assert_eq!(err.position(), 23);
}

#[test]
fn five_byte_delta_overflows() {
    use pretty_assertions::assert_eq;
    let bytes = with_track(&[0x81, 0x80, 0x80, 0x80, 0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(kind_of(&bytes), ReaderErrorKind::DeltaTimeOverflow);
}

#[test]
fn payload_past_track_end() {
    use pretty_assertions::assert_eq;
    let bytes = with_track(&[0x00, 0xFF, 0x01, 0x05, b'a', b'b']);
    assert_eq!(kind_of(&bytes), ReaderErrorKind::InvalidEventLength(5));
}

#[test]
fn track_length_must_match() {
    use pretty_assertions::assert_eq;
    let mut bytes = with_track(&[0x00, 0x90, 0x40, 0x78]);
    // declare 3 bytes for a 4 byte event
    bytes[21] = 3;
    assert_eq!(
        kind_of(&bytes),
        ReaderErrorKind::TrackSizeMismatch {
            declared: 3,
            consumed: 4
        }
    );
}

#[test]
fn truncated_input() {
    use pretty_assertions::assert_eq;
    let mut bytes = with_track(&[0x00, 0x90, 0x40, 0x78]);
    bytes.truncate(bytes.len() - 1);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), bytes.len());
}

#[test]
fn oversized_length_in_short_input_is_truncation() {
    use pretty_assertions::assert_eq;
    let mut bytes = alloc::vec![
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, b'M', b'T', b'r', b'k',
    ];
    // the chunk claims 4 GiB, the meta event claims 256 MiB, neither is there
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x01, 0xFF, 0xFF, 0xFF, 0x7F]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 29);
}
