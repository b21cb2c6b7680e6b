#![doc = r#"
Meta event chunking.

Some consumers choke on long meta payloads, so the writer never emits one
in a single piece. A [`MetaChunking`] strategy cuts the payload into chunks,
and every chunk goes out as its own meta event of the same type:

```text
first chunk:        FF tt ll <prefix> <body>
every later chunk:  00 FF tt ll <prefix> <body>
```

`ll` is `prefix + body` and always below 0x80, so it takes one byte. The
`00` is a zero delta time placing the chunk at the same tick as the first.

Both [`encoded_len`](MetaChunking::encoded_len) and
[`write`](MetaChunking::write) walk the same
[`for_each_chunk`](MetaChunking::for_each_chunk) plan, so the length used for
the track header always matches what is written.
"#]

use super::WriterErrorKind;
use crate::{event::MetaEvent, io::ByteSink};

/// Callback handed each `(prefix, body)` pair of a chunk plan
pub type ChunkVisitor<'v> = dyn FnMut(&[u8], &[u8]) -> Result<(), WriterErrorKind> + 'v;

/// A policy for cutting a meta payload into chunks.
pub trait MetaChunking {
    /// Call `visit` with the `(prefix, body)` of every chunk, in order.
    ///
    /// An empty payload must still produce one chunk, and `prefix + body`
    /// must stay below 0x80 bytes.
    fn for_each_chunk(&self, data: &[u8], visit: &mut ChunkVisitor<'_>)
    -> Result<(), WriterErrorKind>;

    /// Exact number of bytes [`write`](Self::write) emits for `meta`.
    fn encoded_len(&self, meta: &MetaEvent<'_>) -> Result<u64, WriterErrorKind> {
        let mut len = 0u64;
        let mut first = true;
        self.for_each_chunk(meta.data(), &mut |prefix, body| {
            let step = if first { 0 } else { 1 };
            first = false;
            len += step + 3 + (prefix.len() + body.len()) as u64;
            Ok(())
        })?;
        Ok(len)
    }

    /// Emit `meta` as one meta event per chunk.
    fn write(&self, meta: &MetaEvent<'_>, sink: &mut dyn ByteSink) -> Result<(), WriterErrorKind> {
        let mut first = true;
        self.for_each_chunk(meta.data(), &mut |prefix, body| {
            if !first {
                sink.write_bytes(&[0x00])?;
            }
            first = false;
            let len = (prefix.len() + body.len()) as u8;
            sink.write_bytes(&[0xFF, meta.meta_type(), len])?;
            sink.write_bytes(prefix)?;
            sink.write_bytes(body)?;
            Ok(())
        })
    }
}

/// Plain chunks of at most 127 payload bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultChunking;

impl DefaultChunking {
    /// Largest body of one chunk
    pub const CHUNK: usize = 0x7F;
}

impl MetaChunking for DefaultChunking {
    fn for_each_chunk(
        &self,
        data: &[u8],
        visit: &mut ChunkVisitor<'_>,
    ) -> Result<(), WriterErrorKind> {
        if data.is_empty() {
            return visit(&[], &[]);
        }
        for body in data.chunks(Self::CHUNK) {
            visit(&[], body)?;
        }
        Ok(())
    }
}

#[doc = r#"
Numbered chunks of at most 0x77 payload bytes.

Each chunk body is prefixed with the ASCII marker `DM:nnnn:`, `nnnn` being
the zero-padded chunk index, so a reader can reassemble the payload even if
the chunks get reordered. Payloads shorter than 0x80 bytes fit in one meta
event and are written exactly like [`DefaultChunking`] writes them.
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedChunking;

impl SegmentedChunking {
    /// Largest body of one chunk, leaving room for the marker
    pub const CHUNK: usize = 0x77;
    /// The four digit index allows this many chunks
    pub const MAX_CHUNKS: usize = 10_000;

    /// The `DM:nnnn:` marker for chunk `index`
    pub const fn marker(index: usize) -> [u8; 8] {
        [
            b'D',
            b'M',
            b':',
            digit(index, 1000),
            digit(index, 100),
            digit(index, 10),
            digit(index, 1),
            b':',
        ]
    }
}

const fn digit(index: usize, place: usize) -> u8 {
    b'0' + ((index / place) % 10) as u8
}

impl MetaChunking for SegmentedChunking {
    fn for_each_chunk(
        &self,
        data: &[u8],
        visit: &mut ChunkVisitor<'_>,
    ) -> Result<(), WriterErrorKind> {
        if data.len() < 0x80 {
            return DefaultChunking.for_each_chunk(data, visit);
        }
        if data.len().div_ceil(Self::CHUNK) > Self::MAX_CHUNKS {
            return Err(WriterErrorKind::InvalidEventLength(data.len()));
        }
        for (index, body) in data.chunks(Self::CHUNK).enumerate() {
            visit(&Self::marker(index), body)?;
        }
        Ok(())
    }
}

/// The built-in chunking strategies, picked by
/// [`WriterConfig`](super::WriterConfig).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaStrategy {
    /// See [`DefaultChunking`]
    #[default]
    Default,
    /// See [`SegmentedChunking`]
    Segmented,
}

impl MetaChunking for MetaStrategy {
    fn for_each_chunk(
        &self,
        data: &[u8],
        visit: &mut ChunkVisitor<'_>,
    ) -> Result<(), WriterErrorKind> {
        match self {
            Self::Default => DefaultChunking.for_each_chunk(data, visit),
            Self::Segmented => SegmentedChunking.for_each_chunk(data, visit),
        }
    }
}

#[cfg(test)]
fn emitted(chunking: impl MetaChunking, len: usize) -> alloc::vec::Vec<u8> {
    let data: alloc::vec::Vec<u8> = (0..len).map(|i| i as u8 & 0x7F).collect();
    let meta = MetaEvent::new(0x01, data);
    let mut bytes = alloc::vec::Vec::new();
    chunking.write(&meta, &mut bytes).unwrap();
    assert_eq!(chunking.encoded_len(&meta).unwrap(), bytes.len() as u64);
    bytes
}

#[test]
fn default_lengths() {
    use pretty_assertions::assert_eq;
    assert_eq!(emitted(DefaultChunking, 0), [0xFF, 0x01, 0x00]);
    assert_eq!(emitted(DefaultChunking, 126).len(), 129);
    assert_eq!(emitted(DefaultChunking, 127).len(), 130);
    // two chunks plus one step byte
    assert_eq!(emitted(DefaultChunking, 128).len(), 128 + 6 + 1);
    assert_eq!(emitted(DefaultChunking, 254).len(), 254 + 6 + 1);
    assert_eq!(emitted(DefaultChunking, 255).len(), 255 + 9 + 2);
}

#[test]
fn default_chunk_layout() {
    use pretty_assertions::assert_eq;
    let bytes = emitted(DefaultChunking, 130);
    assert_eq!(bytes[..3], [0xFF, 0x01, 0x7F]);
    assert_eq!(bytes[130..], [0x00, 0xFF, 0x01, 0x03, 127, 0, 1]);
}

#[test]
fn segmented_short_payload_is_plain() {
    use pretty_assertions::assert_eq;
    assert_eq!(emitted(SegmentedChunking, 0), emitted(DefaultChunking, 0));
    assert_eq!(emitted(SegmentedChunking, 127), emitted(DefaultChunking, 127));
}

#[test]
fn segmented_lengths_and_markers() {
    use pretty_assertions::assert_eq;
    // 128 bytes: 0x77 + 9, both chunks with 3 header and 8 marker bytes
    let bytes = emitted(SegmentedChunking, 128);
    assert_eq!(bytes.len(), 128 + 22 + 1);
    assert_eq!(bytes[..11], *b"\xFF\x01\x7FDM:0000:");
    let second = 3 + 8 + 0x77;
    assert_eq!(bytes[second..second + 12], *b"\x00\xFF\x01\x11DM:0001:");

    assert_eq!(emitted(SegmentedChunking, 254).len(), 254 + 33 + 2);
    assert_eq!(emitted(SegmentedChunking, 255).len(), 255 + 33 + 2);
}

#[test]
fn marker_is_zero_padded() {
    use pretty_assertions::assert_eq;
    assert_eq!(&SegmentedChunking::marker(7), b"DM:0007:");
    assert_eq!(&SegmentedChunking::marker(1234), b"DM:1234:");
}

#[test]
fn too_many_segments() {
    use pretty_assertions::assert_eq;
    let len = SegmentedChunking::CHUNK * SegmentedChunking::MAX_CHUNKS + 1;
    let meta = MetaEvent::new(0x01, alloc::vec![0u8; len]);
    assert_eq!(
        SegmentedChunking.encoded_len(&meta),
        Err(WriterErrorKind::InvalidEventLength(len))
    );
}
