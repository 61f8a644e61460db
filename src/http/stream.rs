//! Byte streams backing every message body.
//!
//! A [`ByteStream`] owns at most one [`Resource`] (an in-memory buffer, a
//! file, or an arbitrary reader/writer) and exposes a uniform read, write,
//! seek and metadata surface over it. Messages hold streams through the
//! shared [`Body`] handle.

use crate::{
    errors::{Error, Result},
    limits::StreamLimits,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    cell::{OnceCell, Ref, RefCell, RefMut},
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, trace, warn};

/// The raw byte resource owned by a [`ByteStream`].
///
/// Handed back to the caller by [`ByteStream::detach`].
pub enum Resource {
    /// Growable in-memory buffer, always seekable.
    Memory(Cursor<Vec<u8>>),
    /// File on disk, seekable, capabilities follow the open mode.
    File(File),
    /// Forward-only source, e.g. a pipe or a socket read half.
    Reader(Box<dyn Read>),
    /// Forward-only sink.
    Writer(Box<dyn Write>),
}

impl Resource {
    #[inline]
    const fn stream_type(&self) -> &'static str {
        match self {
            Resource::Memory(_) => "MEMORY",
            Resource::File(_) => "STDIO",
            Resource::Reader(_) => "READER",
            Resource::Writer(_) => "WRITER",
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Memory(cursor) => f
                .debug_struct("Memory")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Resource::File(file) => f.debug_tuple("File").field(file).finish(),
            Resource::Reader(_) => f.write_str("Reader(..)"),
            Resource::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

// ACCESS MODE

/// fopen-style access mode: `r`, `w`, `a`, `x` or `c`, optionally followed by
/// `+` and a `b`/`t` flag in any position after the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mode {
    read: bool,
    write: bool,
    append: bool,
    create: bool,
    truncate: bool,
    create_new: bool,
}

#[rustfmt::skip]
impl Mode {
    const READ: Mode = Mode { read: true, write: false, append: false, create: false, truncate: false, create_new: false };
    const WRITE: Mode = Mode { read: false, write: true, append: false, create: false, truncate: false, create_new: false };
    const READ_WRITE: Mode = Mode { read: true, write: true, append: false, create: true, truncate: true, create_new: false };
    const READ_APPEND: Mode = Mode { read: true, write: true, append: true, create: true, truncate: false, create_new: false };

    fn parse(mode: &str) -> Option<Self> {
        let mut chars = mode.chars();
        let base = chars.next()?;

        let mut plus = false;
        for c in chars {
            match c {
                '+' if !plus => plus = true,
                'b' | 't' => {}
                _ => return None,
            }
        }

        let mode = match base {
            'r' => Mode { read: true, write: plus, append: false, create: false, truncate: false, create_new: false },
            'w' => Mode { read: plus, write: true, append: false, create: true, truncate: true, create_new: false },
            'a' => Mode { read: plus, write: true, append: true, create: true, truncate: false, create_new: false },
            'x' => Mode { read: plus, write: true, append: false, create: false, truncate: false, create_new: true },
            'c' => Mode { read: plus, write: true, append: false, create: true, truncate: false, create_new: false },
            _ => return None,
        };
        Some(mode)
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .read(self.read)
            .write(self.write && !self.append)
            .append(self.append)
            .create(self.create)
            .truncate(self.truncate)
            .create_new(self.create_new)
            .open(path)
    }
}

// METADATA

/// Metadata describing the resource behind a stream.
///
/// Serializes to a flat JSON object; [`ByteStream::metadata_value`] reads
/// single keys from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// `MEMORY`, `STDIO`, `READER` or `WRITER`
    pub stream_type: &'static str,
    /// Access mode the resource was attached with, e.g. `r+b`
    pub mode: String,
    pub seekable: bool,
    /// File path of the resource, when it has one
    pub uri: Option<String>,
    /// Caller supplied entries, see [`StreamOptions::metadata`]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Optional settings applied when attaching a resource.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    /// Known size of the resource, returned by [`ByteStream::size`] until
    /// the first write.
    pub size: Option<u64>,
    /// Extra entries merged into [`ByteStream::metadata`].
    pub metadata: Map<String, Value>,
}

// BYTE STREAM

/// A readable, writable and/or seekable byte stream.
///
/// Capabilities are decided once when the resource is attached. Every
/// operation checks the matching capability and fails with
/// [`Error::StreamState`] when it is missing or when the stream was detached
/// or closed.
///
/// # Lifecycle
///
/// ```text
///  attach (from_bytes / open / from_reader / ...)
///        ||
///        \/
///  [ live ] ==== detach() ====> resource returned to the caller,
///     ||                        stream is inert forever
///     \\===== close() / drop ==> resource released
/// ```
///
/// # Examples
/// ```
/// use maker_message::ByteStream;
///
/// let mut stream = ByteStream::from("data");
///
/// assert_eq!(stream.size(), Some(4));
/// assert_eq!(stream.read(2).unwrap(), b"da");
///
/// stream.write(b"x").unwrap();
/// assert_eq!(stream.size(), Some(5));
/// assert_eq!(stream.to_string_lossy(), "datax");
///
/// let _resource = stream.detach();
/// assert!(stream.read(1).is_err());
/// ```
pub struct ByteStream {
    resource: Option<Resource>,
    readable: bool,
    writable: bool,
    seekable: bool,
    append: bool,
    mode: String,

    size: Option<u64>,
    location: Option<PathBuf>,
    extra: Map<String, Value>,

    // Bytes moved through a forward-only resource
    position: u64,
    eof: bool,
}

impl ByteStream {
    fn attach(resource: Resource, mode: &str, access: Mode, location: Option<PathBuf>) -> Self {
        let seekable = matches!(resource, Resource::Memory(_) | Resource::File(_));
        trace!(
            stream_type = resource.stream_type(),
            mode,
            seekable,
            "stream attached"
        );

        Self {
            resource: Some(resource),
            readable: access.read,
            writable: access.write,
            seekable,
            append: access.append,
            mode: mode.to_owned(),
            size: None,
            location,
            extra: Map::new(),
            position: 0,
            eof: false,
        }
    }

    /// Creates an empty in-memory stream (`w+b`).
    pub fn memory() -> Self {
        Self::attach(Resource::Memory(Cursor::new(Vec::new())), "w+b", Mode::READ_WRITE, None)
    }

    /// Creates an in-memory stream pre-filled with `content` (`a+b`).
    ///
    /// The read position starts at `0`, writes are appended after the
    /// existing content.
    pub fn from_bytes<B: Into<Vec<u8>>>(content: B) -> Self {
        Self::attach(Resource::Memory(Cursor::new(content.into())), "a+b", Mode::READ_APPEND, None)
    }

    /// Opens `path` with an fopen-style `mode` (`r`, `r+`, `w`, `w+`, `a`,
    /// `a+`, `x`, `x+`, `c`, `c+`, each optionally with `b` or `t`).
    pub fn open<P: AsRef<Path>>(path: P, mode: &str) -> Result<Self> {
        let path = path.as_ref();
        let access = Mode::parse(mode)
            .ok_or_else(|| Error::StreamState(format!("invalid stream mode `{mode}`")))?;

        let file = access.open(path)?;
        Ok(Self::attach(
            Resource::File(file),
            mode,
            access,
            Some(path.to_path_buf()),
        ))
    }

    /// Wraps an already opened file; `mode` describes how it was opened.
    pub fn from_file(file: File, mode: &str) -> Result<Self> {
        let access = Mode::parse(mode)
            .ok_or_else(|| Error::StreamState(format!("invalid stream mode `{mode}`")))?;
        Ok(Self::attach(Resource::File(file), mode, access, None))
    }

    /// Wraps a forward-only source: readable, not seekable, not writable.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Self::attach(Resource::Reader(Box::new(reader)), "rb", Mode::READ, None)
    }

    /// Wraps a forward-only sink: writable, not seekable, not readable.
    pub fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self::attach(Resource::Writer(Box::new(writer)), "wb", Mode::WRITE, None)
    }

    /// Applies a known size and extra metadata.
    pub fn with_options(mut self, options: StreamOptions) -> Self {
        self.size = options.size;
        self.extra = options.metadata;
        self
    }
}

// Capabilities
impl ByteStream {
    #[inline(always)]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline(always)]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline(always)]
    pub const fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// `true` once the resource was detached or closed.
    #[inline(always)]
    pub const fn is_detached(&self) -> bool {
        self.resource.is_none()
    }

    #[inline]
    fn resource(&mut self) -> Result<&mut Resource> {
        self.resource.as_mut().ok_or_else(Error::detached)
    }
}

// Reading and writing
impl ByteStream {
    /// Reads up to `len` bytes from the current position.
    ///
    /// Returns fewer bytes only at the end of the stream.
    pub fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.resource.is_none() {
            return Err(Error::detached());
        }
        if !self.readable {
            return Err(Error::StreamState("cannot read from non-readable stream".into()));
        }

        let mut buffer = Vec::with_capacity(len.min(64 * 1024));
        let read = match self.resource()? {
            Resource::Memory(cursor) => cursor.take(len as u64).read_to_end(&mut buffer),
            Resource::File(file) => file.take(len as u64).read_to_end(&mut buffer),
            Resource::Reader(reader) => reader.take(len as u64).read_to_end(&mut buffer),
            Resource::Writer(_) => unreachable_read(),
        }
        .map_err(|e| Error::StreamState(format!("unable to read from stream: {e}")))?;

        self.position += read as u64;
        self.eof = read < len;
        Ok(buffer)
    }

    /// Writes `data` at the current position (or at the end for append
    /// mode) and returns the number of bytes written.
    ///
    /// Invalidates the cached size.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.resource.is_none() {
            return Err(Error::detached());
        }
        if !self.writable {
            return Err(Error::StreamState("cannot write to a non-writable stream".into()));
        }

        let append = self.append;
        let result = match self.resource()? {
            Resource::Memory(cursor) => {
                if append {
                    cursor.set_position(cursor.get_ref().len() as u64);
                }
                cursor.write_all(data)
            }
            Resource::File(file) => file.write_all(data),
            Resource::Writer(writer) => writer.write_all(data),
            Resource::Reader(_) => unreachable_write(),
        };
        result.map_err(|e| Error::StreamState(format!("unable to write to stream: {e}")))?;

        self.size = None;
        self.position += data.len() as u64;
        self.eof = false;
        Ok(data.len())
    }

    /// Returns the remaining contents from the current position.
    pub fn contents(&mut self) -> Result<Vec<u8>> {
        if self.resource.is_none() {
            return Err(Error::detached());
        }
        if !self.readable {
            return Err(Error::StreamState("cannot read from non-readable stream".into()));
        }

        let mut buffer = Vec::new();
        let read = match self.resource()? {
            Resource::Memory(cursor) => cursor.read_to_end(&mut buffer),
            Resource::File(file) => file.read_to_end(&mut buffer),
            Resource::Reader(reader) => reader.read_to_end(&mut buffer),
            Resource::Writer(_) => unreachable_read(),
        }
        .map_err(|e| Error::StreamState(format!("unable to read stream contents: {e}")))?;

        self.position += read as u64;
        self.eof = true;
        Ok(buffer)
    }

    /// Rewinds (when seekable) and returns the whole content as a string.
    ///
    /// Best effort: any failure yields an empty string. Invalid UTF-8 is
    /// replaced with `U+FFFD`.
    pub fn to_string_lossy(&mut self) -> String {
        if self.seekable {
            if let Err(err) = self.rewind() {
                warn!(%err, "unable to rewind stream before stringifying");
                return String::new();
            }
        }

        match self.contents() {
            Ok(bytes) => match simdutf8::basic::from_utf8(&bytes) {
                Ok(text) => text.to_owned(),
                Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
            },
            Err(err) => {
                warn!(%err, "unable to stringify stream");
                String::new()
            }
        }
    }
}

#[cold]
fn unreachable_read() -> io::Result<usize> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "resource is write-only"))
}

#[cold]
fn unreachable_write() -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "resource is read-only"))
}

// Positioning
impl ByteStream {
    /// Moves the read/write position.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        if self.resource.is_none() {
            return Err(Error::detached());
        }
        if !self.seekable {
            return Err(Error::StreamState("stream is not seekable".into()));
        }

        let result = match self.resource()? {
            Resource::Memory(cursor) => cursor.seek(pos),
            Resource::File(file) => file.seek(pos),
            Resource::Reader(_) | Resource::Writer(_) => {
                Err(io::Error::new(io::ErrorKind::Unsupported, "not seekable"))
            }
        };

        let position = result.map_err(|e| {
            Error::StreamState(format!("unable to seek to stream position {pos:?}: {e}"))
        })?;
        self.position = position;
        self.eof = false;
        Ok(position)
    }

    #[inline]
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Returns the current position.
    ///
    /// For forward-only resources this is the number of bytes moved so far.
    pub fn tell(&mut self) -> Result<u64> {
        let position = self.position;
        match self.resource()? {
            Resource::Memory(cursor) => Ok(cursor.position()),
            Resource::File(file) => file
                .stream_position()
                .map_err(|e| Error::StreamState(format!("unable to determine position: {e}"))),
            Resource::Reader(_) | Resource::Writer(_) => Ok(position),
        }
    }

    /// `true` at the end of the stream, and always once detached.
    pub fn eof(&mut self) -> bool {
        if self.resource.is_none() {
            return true;
        }
        if !self.seekable {
            return self.eof;
        }

        match (self.tell(), self.size()) {
            (Ok(position), Some(size)) => position >= size,
            _ => self.eof,
        }
    }
}

// Metadata
impl ByteStream {
    /// Returns the size in bytes, if known.
    ///
    /// The value is cached until the next write. Files are re-measured
    /// through their path when one is known.
    pub fn size(&mut self) -> Option<u64> {
        if let Some(size) = self.size {
            return Some(size);
        }

        let size = match self.resource.as_ref()? {
            Resource::Memory(cursor) => Some(cursor.get_ref().len() as u64),
            Resource::File(file) => match &self.location {
                Some(path) => fs::metadata(path).ok().map(|meta| meta.len()),
                None => file.metadata().ok().map(|meta| meta.len()),
            },
            Resource::Reader(_) | Resource::Writer(_) => None,
        };

        self.size = size;
        size
    }

    /// Describes the attached resource, `None` once detached.
    pub fn metadata(&self) -> Option<Metadata> {
        let resource = self.resource.as_ref()?;

        Some(Metadata {
            stream_type: resource.stream_type(),
            mode: self.mode.clone(),
            seekable: self.seekable,
            uri: self
                .location
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            extra: self.extra.clone(),
        })
    }

    /// Returns a single metadata entry, e.g. `"mode"` or `"uri"`.
    ///
    /// # Examples
    /// ```
    /// use maker_message::ByteStream;
    /// use serde_json::json;
    ///
    /// let stream = ByteStream::memory();
    ///
    /// assert_eq!(stream.metadata_value("mode"), Some(json!("w+b")));
    /// assert_eq!(stream.metadata_value("seekable"), Some(json!(true)));
    /// assert_eq!(stream.metadata_value("missing"), None);
    /// ```
    pub fn metadata_value(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self.metadata()?).ok()? {
            Value::Object(mut map) => map.remove(key),
            _ => None,
        }
    }
}

// Lifecycle
impl ByteStream {
    /// Takes the resource out of the stream.
    ///
    /// The stream becomes permanently inert: no capabilities, no size, no
    /// location. The caller now owns the resource.
    pub fn detach(&mut self) -> Option<Resource> {
        let resource = self.resource.take();
        self.reset();

        if let Some(resource) = &resource {
            debug!(stream_type = resource.stream_type(), "stream detached");
        }
        resource
    }

    /// Releases the resource, if still attached.
    pub fn close(&mut self) {
        if let Some(resource) = self.detach() {
            debug!(stream_type = resource.stream_type(), "stream closed");
            drop(resource);
        }
    }

    #[inline]
    fn reset(&mut self) {
        self.readable = false;
        self.writable = false;
        self.seekable = false;
        self.append = false;
        self.size = None;
        self.location = None;
        self.eof = true;
    }
}

impl Drop for ByteStream {
    fn drop(&mut self) {
        if let Some(resource) = &self.resource {
            debug!(stream_type = resource.stream_type(), "releasing stream resource");
        }
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("resource", &self.resource)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("seekable", &self.seekable)
            .field("size", &self.size)
            .field("location", &self.location)
            .finish()
    }
}

impl From<&str> for ByteStream {
    fn from(content: &str) -> Self {
        Self::from_bytes(content)
    }
}

impl From<String> for ByteStream {
    fn from(content: String) -> Self {
        Self::from_bytes(content)
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(content: Vec<u8>) -> Self {
        Self::from_bytes(content)
    }
}

impl From<&[u8]> for ByteStream {
    fn from(content: &[u8]) -> Self {
        Self::from_bytes(content)
    }
}

// BODY

/// Shared handle to the stream of a message body.
///
/// Cloning a `Body` (or a message holding one) aliases the same stream:
/// reading through one handle moves the position seen by all of them.
/// Message immutability covers which stream is attached, not the stream's
/// own read position.
///
/// # Examples
/// ```
/// use maker_message::Body;
///
/// let body = Body::from("hello");
/// let alias = body.clone();
///
/// assert_eq!(body.borrow_mut().read(2).unwrap(), b"he");
/// assert_eq!(alias.borrow_mut().read(3).unwrap(), b"llo");
/// assert!(Body::ptr_eq(&body, &alias));
/// ```
#[derive(Clone)]
pub struct Body(Rc<RefCell<ByteStream>>);

impl Body {
    #[inline]
    pub fn new(stream: ByteStream) -> Self {
        Self(Rc::new(RefCell::new(stream)))
    }

    /// An empty in-memory body.
    #[inline]
    pub fn empty() -> Self {
        Self::new(ByteStream::memory())
    }

    /// Borrows the stream mutably.
    ///
    /// # Panics
    /// Panics if the stream is already borrowed through another handle.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, ByteStream> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, ByteStream> {
        self.0.borrow()
    }

    /// Returns `true` when both handles point at the same stream.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// See [`ByteStream::size`].
    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.0.borrow_mut().size()
    }

    /// See [`ByteStream::to_string_lossy`].
    #[inline]
    pub fn to_string_lossy(&self) -> String {
        self.0.borrow_mut().to_string_lossy()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(stream) => f.debug_tuple("Body").field(&*stream).finish(),
            Err(_) => f.write_str("Body(<borrowed>)"),
        }
    }
}

impl From<ByteStream> for Body {
    fn from(stream: ByteStream) -> Self {
        Self::new(stream)
    }
}

macro_rules! impl_body_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Body {
            #[inline]
            fn from(content: $t) -> Self {
                Self::new(ByteStream::from(content))
            }
        })*
    };
}

impl_body_from!(&str, String, Vec<u8>, &[u8]);

/// Lazily attached message body.
///
/// Stays empty until first read, then holds an empty in-memory stream.
/// Cloning the slot aliases the attached body.
#[derive(Debug, Clone, Default)]
pub(crate) struct BodySlot(OnceCell<Body>);

impl BodySlot {
    #[inline]
    pub(crate) fn new(body: Option<Body>) -> Self {
        let slot = OnceCell::new();
        if let Some(body) = body {
            let _ = slot.set(body);
        }
        Self(slot)
    }

    #[inline]
    pub(crate) fn get(&self) -> Body {
        self.0.get_or_init(Body::empty).clone()
    }

    /// `true` when `body` is the attached stream.
    #[inline]
    pub(crate) fn holds(&self, body: &Body) -> bool {
        self.0.get().is_some_and(|current| Body::ptr_eq(current, body))
    }
}

// COPYING

/// Reads the rest of `stream` into a string, up to `max_len` bytes.
pub fn copy_to_string(stream: &mut ByteStream, max_len: Option<usize>) -> Result<String> {
    let bytes = match max_len {
        None => stream.contents()?,
        Some(max) => stream.read(max)?,
    };

    Ok(match simdutf8::basic::from_utf8(&bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Copies the rest of `src` into `dst`, up to `max_len` bytes, in chunks of
/// [`StreamLimits::copy_chunk_size`]. Returns the number of bytes copied.
pub fn copy_to_stream(
    src: &mut ByteStream,
    dst: &mut ByteStream,
    max_len: Option<u64>,
    limits: &StreamLimits,
) -> Result<u64> {
    let chunk = limits.chunk() as u64;
    let mut copied = 0u64;

    loop {
        let want = match max_len {
            Some(max) if copied >= max => break,
            Some(max) => chunk.min(max - copied),
            None => chunk,
        };

        let buffer = src.read(want as usize)?;
        if buffer.is_empty() {
            break;
        }
        dst.write(&buffer)?;
        copied += buffer.len() as u64;

        if (buffer.len() as u64) < want {
            break;
        }
    }

    Ok(copied)
}


#[cfg(test)]
mod body_tests {
    use super::*;

    #[test]
    fn aliasing() {
        let body = Body::from("abc");
        let alias = body.clone();

        assert!(Body::ptr_eq(&body, &alias));
        assert!(!Body::ptr_eq(&body, &Body::from("abc")));

        body.borrow_mut().read(1).unwrap();
        assert_eq!(alias.borrow_mut().tell().unwrap(), 1);
        assert_eq!(alias.size(), Some(3));
        assert_eq!(alias.to_string_lossy(), "abc");
    }

    #[test]
    fn lazy_slot() {
        let slot = BodySlot::default();
        let first = slot.get();

        assert_eq!(first.size(), Some(0));
        assert!(slot.holds(&first));
        assert!(Body::ptr_eq(&first, &slot.get()));
        assert!(Body::ptr_eq(&first, &slot.clone().get()));

        let given = Body::from("x");
        let slot = BodySlot::new(Some(given.clone()));
        assert!(slot.holds(&given));
        assert!(!slot.holds(&first));
    }

    #[test]
    fn empty() {
        let body = Body::empty();
        assert_eq!(body.size(), Some(0));
        assert_eq!(body.to_string_lossy(), "");
        assert!(body.borrow().is_writable());
    }
}
