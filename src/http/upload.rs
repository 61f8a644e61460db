//! Files received through a multipart upload.

use crate::{
    errors::{Error, Result},
    http::stream::{copy_to_stream, ByteStream},
    limits::StreamLimits,
    Body,
};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::debug;

/// Outcome of an upload as reported by the receiving server.
///
/// Discriminants are the numeric codes used by CGI-style environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum UploadError {
    /// The file was received in full
    #[default]
    Ok = 0,
    /// The file exceeds the server-wide upload size limit
    IniSize = 1,
    /// The file exceeds the size limit given by the submitted form
    FormSize = 2,
    /// Only part of the file was received
    Partial = 3,
    /// No file was submitted
    NoFile = 4,
    /// No temporary directory to store the file in
    NoTmpDir = 6,
    /// The file could not be written to disk
    CantWrite = 7,
    /// A server extension stopped the upload
    Extension = 8,
}

impl UploadError {
    #[inline(always)]
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(self, UploadError::Ok)
    }
}

impl TryFrom<i64> for UploadError {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Ok(match code {
            0 => UploadError::Ok,
            1 => UploadError::IniSize,
            2 => UploadError::FormSize,
            3 => UploadError::Partial,
            4 => UploadError::NoFile,
            6 => UploadError::NoTmpDir,
            7 => UploadError::CantWrite,
            8 => UploadError::Extension,
            _ => {
                return Err(Error::InvalidFileSpecification(format!(
                    "{code} is not a known upload error code"
                )))
            }
        })
    }
}

/// Where the uploaded bytes live.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// A temporary file written by the server
    Path(PathBuf),
    /// An already opened stream
    Body(Body),
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        UploadSource::Path(path)
    }
}

impl From<&Path> for UploadSource {
    fn from(path: &Path) -> Self {
        UploadSource::Path(path.to_path_buf())
    }
}

impl From<&str> for UploadSource {
    fn from(path: &str) -> Self {
        UploadSource::Path(PathBuf::from(path))
    }
}

impl From<Body> for UploadSource {
    fn from(body: Body) -> Self {
        UploadSource::Body(body)
    }
}

impl From<ByteStream> for UploadSource {
    fn from(stream: ByteStream) -> Self {
        UploadSource::Body(Body::new(stream))
    }
}

#[derive(Debug)]
struct UploadState {
    source: UploadSource,
    moved: bool,
}

/// A file received with a request.
///
/// Backed either by a file on disk or by a stream, never both. The file can
/// be relocated exactly once with [`move_to`](UploadedFile::move_to); after
/// that, and whenever the upload failed, the content is no longer reachable.
/// Clones share the moved state.
///
/// # Examples
/// ```
/// use maker_message::{upload::UploadError, Body, UploadedFile};
///
/// let dir = tempfile::tempdir().unwrap();
/// let target = dir.path().join("avatar.png");
///
/// let file = UploadedFile::new(Body::from("png bytes"), Some(9), UploadError::Ok, Some("me.png"), Some("image/png"));
/// assert_eq!(file.client_filename(), Some("me.png"));
///
/// file.move_to(&target).unwrap();
/// assert_eq!(std::fs::read_to_string(&target).unwrap(), "png bytes");
///
/// assert!(file.is_moved());
/// assert!(file.stream().is_err());
/// assert!(file.move_to(&target).is_err());
/// ```
#[derive(Clone)]
pub struct UploadedFile {
    state: Rc<RefCell<UploadState>>,
    size: Option<u64>,
    error: UploadError,
    client_filename: Option<String>,
    client_media_type: Option<String>,
}

impl UploadedFile {
    pub fn new<S: Into<UploadSource>>(
        source: S,
        size: Option<u64>,
        error: UploadError,
        client_filename: Option<&str>,
        client_media_type: Option<&str>,
    ) -> Self {
        UploadedFile {
            state: Rc::new(RefCell::new(UploadState {
                source: source.into(),
                moved: false,
            })),
            size,
            error,
            client_filename: client_filename.map(str::to_owned),
            client_media_type: client_media_type.map(str::to_owned),
        }
    }

    /// Declared size in bytes.
    #[inline(always)]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    #[inline(always)]
    pub const fn error(&self) -> UploadError {
        self.error
    }

    /// File name as sent by the client. Not to be trusted.
    #[inline(always)]
    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    /// Media type as sent by the client. Not to be trusted.
    #[inline(always)]
    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    #[inline]
    pub fn is_moved(&self) -> bool {
        self.state.borrow().moved
    }

    /// Path of the backing file, if the upload is file-backed.
    pub fn path(&self) -> Option<PathBuf> {
        match &self.state.borrow().source {
            UploadSource::Path(path) => Some(path.clone()),
            UploadSource::Body(_) => None,
        }
    }

    fn ensure_active(&self) -> Result<()> {
        if !self.error.is_ok() {
            return Err(Error::StreamState(format!(
                "cannot access uploaded file, upload failed with code {}",
                self.error.code()
            )));
        }
        if self.is_moved() {
            return Err(Error::StreamState(
                "cannot access uploaded file, it has already been moved".into(),
            ));
        }
        Ok(())
    }

    /// Returns a stream over the uploaded content.
    ///
    /// File-backed uploads are opened read/write on every call.
    pub fn stream(&self) -> Result<Body> {
        self.ensure_active()?;

        match &self.state.borrow().source {
            UploadSource::Body(body) => Ok(body.clone()),
            UploadSource::Path(path) => Ok(Body::new(ByteStream::open(path, "r+")?)),
        }
    }

    /// Moves the upload to `target` with default [`StreamLimits`].
    #[inline]
    pub fn move_to<P: AsRef<Path>>(&self, target: P) -> Result<()> {
        self.move_to_with(target, &StreamLimits::default())
    }

    /// Moves the upload to `target`.
    ///
    /// File-backed uploads are renamed, falling back to copy and remove when
    /// the rename fails (e.g. across file systems). Stream-backed uploads are
    /// copied from their start into a newly created file.
    pub fn move_to_with<P: AsRef<Path>>(&self, target: P, limits: &StreamLimits) -> Result<()> {
        let target = target.as_ref();
        self.ensure_active()?;

        if target.as_os_str().is_empty() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target path can not be empty",
            )));
        }

        let mut state = self.state.borrow_mut();
        match &state.source {
            UploadSource::Path(path) => {
                if let Err(err) = fs::rename(path, target) {
                    debug!(%err, from = %path.display(), "rename failed, copying upload instead");
                    fs::copy(path, target)?;
                    fs::remove_file(path)?;
                }
            }
            UploadSource::Body(body) => {
                let mut source = body.borrow_mut();
                if source.is_seekable() {
                    source.rewind()?;
                }

                let mut dest = ByteStream::open(target, "w")?;
                if let Err(err) = copy_to_stream(&mut source, &mut dest, None, limits) {
                    dest.close();
                    if let Err(remove) = fs::remove_file(target) {
                        debug!(%remove, target = %target.display(), "unable to remove partial upload");
                    }
                    return Err(err);
                }
            }
        }

        state.moved = true;
        debug!(target = %target.display(), "uploaded file moved");
        Ok(())
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("size", &self.size)
            .field("error", &self.error)
            .field("client_filename", &self.client_filename)
            .field("client_media_type", &self.client_media_type)
            .field("moved", &self.is_moved())
            .finish()
    }
}

/// Uploaded files keyed the way the form named them.
///
/// `photos[]` style fields become [`FileTree::List`], `doc[cover]` style
/// fields become [`FileTree::Map`].
#[derive(Debug, Clone)]
pub enum FileTree {
    File(UploadedFile),
    List(Vec<FileTree>),
    Map(BTreeMap<String, FileTree>),
}

impl FileTree {
    /// The leaf file, if this node is one.
    #[inline]
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FileTree::File(file) => Some(file),
            _ => None,
        }
    }

    /// Child at `index` of a list node.
    #[inline]
    pub fn index(&self, index: usize) -> Option<&FileTree> {
        match self {
            FileTree::List(list) => list.get(index),
            _ => None,
        }
    }

    /// Child named `key` of a map node.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&FileTree> {
        match self {
            FileTree::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Visits every leaf, depth first.
    pub fn files(&self) -> Vec<&UploadedFile> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a UploadedFile>) {
        match self {
            FileTree::File(file) => out.push(file),
            FileTree::List(list) => list.iter().for_each(|node| node.collect(out)),
            FileTree::Map(map) => map.values().for_each(|node| node.collect(out)),
        }
    }
}

impl From<UploadedFile> for FileTree {
    fn from(file: UploadedFile) -> Self {
        FileTree::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_upload(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("upload.tmp");
        fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn error_codes() {
        #[rustfmt::skip]
        let cases = [
            (0i64, Some(UploadError::Ok)),
            (1,  Some(UploadError::IniSize)),
            (4,  Some(UploadError::NoFile)),
            (6,  Some(UploadError::NoTmpDir)),
            (8,  Some(UploadError::Extension)),
            (5,  None),
            (9,  None),
            (-1, None),
        ];

        for (code, expected) in cases {
            match expected {
                Some(expected) => {
                    assert_eq!(UploadError::try_from(code).unwrap(), expected);
                    assert_eq!(expected.code() as i64, code);
                }
                None => assert!(matches!(
                    UploadError::try_from(code),
                    Err(Error::InvalidFileSpecification(_))
                )),
            }
        }
    }

    #[test]
    fn metadata() {
        let file = UploadedFile::new("/tmp/x", Some(3), UploadError::Ok, Some("a.txt"), None);

        assert_eq!(file.size(), Some(3));
        assert_eq!(file.error(), UploadError::Ok);
        assert_eq!(file.client_filename(), Some("a.txt"));
        assert_eq!(file.client_media_type(), None);
        assert_eq!(file.path(), Some(PathBuf::from("/tmp/x")));
        assert!(!file.is_moved());
    }

    #[test]
    fn move_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = temp_upload(dir.path(), "content");
        let target = dir.path().join("final.txt");

        let file = UploadedFile::new(source.clone(), Some(7), UploadError::Ok, None, None);
        assert_eq!(file.stream().unwrap().to_string_lossy(), "content");

        let alias = file.clone();
        file.move_to(&target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "content");
        assert!(alias.is_moved());
        assert!(matches!(alias.stream(), Err(Error::StreamState(_))));
        assert!(matches!(file.move_to(dir.path().join("again")), Err(Error::StreamState(_))));
    }

    #[test]
    fn move_stream() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("from_stream.bin");

        let body = Body::from("0123456789");
        body.borrow_mut().read(4).unwrap();

        let limits = StreamLimits {
            copy_chunk_size: 3,
            ..StreamLimits::default()
        };
        let file = UploadedFile::new(body.clone(), None, UploadError::Ok, None, None);
        assert!(Body::ptr_eq(&file.stream().unwrap(), &body));

        file.move_to_with(&target, &limits).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "0123456789");
        assert!(file.is_moved());
    }

    #[test]
    fn failed_upload() {
        let dir = tempfile::tempdir().unwrap();
        let source = temp_upload(dir.path(), "partial");
        let target = dir.path().join("never.txt");

        let file = UploadedFile::new(source.clone(), None, UploadError::Partial, None, None);

        assert!(matches!(file.stream(), Err(Error::StreamState(_))));
        assert!(matches!(file.move_to(&target), Err(Error::StreamState(_))));
        assert!(source.exists());
        assert!(!target.exists());
        assert!(!file.is_moved());
    }

    #[test]
    fn move_failures_keep_state() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile::new(dir.path().join("missing"), None, UploadError::Ok, None, None);

        assert!(matches!(file.move_to(""), Err(Error::Io(_))));
        assert!(matches!(file.move_to(dir.path().join("t")), Err(Error::Io(_))));
        assert!(!file.is_moved());
    }

    #[test]
    fn failed_stream_copy_leaves_no_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("partial.bin");

        let body = Body::from("0123456789");
        body.borrow_mut().detach();

        let file = UploadedFile::new(body, None, UploadError::Ok, None, None);
        assert!(matches!(file.move_to(&target), Err(Error::StreamState(_))));
        assert!(!target.exists());
        assert!(!file.is_moved());
    }

    #[test]
    fn tree() {
        let a = UploadedFile::new("/tmp/a", None, UploadError::Ok, Some("a"), None);
        let b = UploadedFile::new("/tmp/b", None, UploadError::Ok, Some("b"), None);

        let mut map = BTreeMap::new();
        map.insert("cover".to_owned(), FileTree::from(a));
        let tree = FileTree::List(vec![FileTree::Map(map), FileTree::File(b)]);

        let names: Vec<_> = tree.files().iter().map(|f| f.client_filename()).collect();
        assert_eq!(names, [Some("a"), Some("b")]);

        let cover = tree.index(0).and_then(|node| node.get("cover")).and_then(FileTree::as_file);
        assert_eq!(cover.and_then(UploadedFile::client_filename), Some("a"));
        assert!(tree.get("cover").is_none());
        assert!(tree.index(2).is_none());
    }
}
