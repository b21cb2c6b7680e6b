#![doc = r#"
The byte boundary of the codec.

The [`Reader`](crate::reader::Reader) only ever pulls single bytes out of a
[`ByteSource`], and the [`Writer`](crate::writer::Writer) only ever pushes
slices into a [`ByteSink`]. Neither touches paths or device handles.
"#]

use alloc::{string::String, vec::Vec};
use thiserror::Error;

/// An I/O failure reported by a [`ByteSource`] or [`ByteSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("I/O failure: {message}")]
pub struct IoError {
    message: String,
}

impl IoError {
    /// Create an I/O error from a description
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
    /// The description of the failure
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        use alloc::string::ToString;
        Self::new(value.to_string())
    }
}

/// Something bytes can be pulled out of, one at a time.
pub trait ByteSource {
    /// Returns the next byte, or `None` once the input is exhausted.
    fn read_byte(&mut self) -> Result<Option<u8>, IoError>;
}

impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        (**self).read_byte()
    }
}

/// Something bytes can be pushed into.
pub trait ByteSink {
    /// Append all of `bytes`.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError>;
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        (**self).write_bytes(bytes)
    }
}

/// A sink that discards everything and only counts bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LenCounter(pub u64);

impl LenCounter {
    /// Number of bytes pushed so far
    pub const fn len(&self) -> u64 {
        self.0
    }
    /// True if nothing has been pushed
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl ByteSink for LenCounter {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.0 += bytes.len() as u64;
        Ok(())
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
///
/// Wrap unbuffered handles in a [`std::io::BufReader`] first; every call
/// reads a single byte.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Adapts any [`std::io::Write`] into a [`ByteSink`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for IoSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.inner.write_all(bytes).map_err(IoError::from)
    }
}

#[test]
fn slice_source_yields_then_ends() {
    use pretty_assertions::assert_eq;
    let mut source: &[u8] = &[0x4D, 0x54];
    assert_eq!(source.read_byte(), Ok(Some(0x4D)));
    assert_eq!(source.read_byte(), Ok(Some(0x54)));
    assert_eq!(source.read_byte(), Ok(None));
    assert_eq!(source.read_byte(), Ok(None));
}

#[test]
fn len_counter_counts_without_storing() {
    use pretty_assertions::assert_eq;
    let mut counter = LenCounter::default();
    counter.write_bytes(&[1, 2, 3]).unwrap();
    counter.write_bytes(&[]).unwrap();
    counter.write_bytes(&[4]).unwrap();
    assert_eq!(counter.len(), 4);
}

#[cfg(feature = "std")]
#[test]
fn std_adapters_round_trip() {
    use pretty_assertions::assert_eq;
    let mut sink = IoSink::new(Vec::new());
    sink.write_bytes(b"MThd").unwrap();
    let written = sink.into_inner();

    let mut source = IoSource::new(std::io::Cursor::new(written));
    let mut out = Vec::new();
    while let Some(b) = source.read_byte().unwrap() {
        out.push(b);
    }
    assert_eq!(out, b"MThd".to_vec());
}
