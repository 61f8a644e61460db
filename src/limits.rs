//! Tunable limits for stream copies, raw message parsing and the server adapter
//!
//! # Defaults
//!
//! Every limit has a conservative default that suits ordinary web traffic.
//! They exist to bound work done on untrusted input:
//! - Unbounded header lists in raw messages
//! - Pathologically deep uploaded-file trees
//! - Query strings with thousands of parameters
//!
//! # Examples
//!
//! ```
//! use maker_message::{
//!     limits::{AdapterLimits, MessageLimits},
//!     message,
//! };
//!
//! let limits = MessageLimits {
//!     max_header_count: 4, // Tiny header budget
//!     ..MessageLimits::default()
//! };
//!
//! let raw = "GET / HTTP/1.1\r\nHost: a\r\nB: 1\r\nC: 2\r\nD: 3\r\nE: 4\r\n\r\n";
//! assert!(message::parse_request_with(raw, &limits).is_err());
//!
//! let adapter = AdapterLimits {
//!     max_query_params: 8,
//!     ..AdapterLimits::default()
//! };
//! assert_eq!(adapter.max_file_depth, 16);
//! ```

/// Controls how stream contents are shuttled between resources.
#[derive(Debug, Clone)]
pub struct StreamLimits {
    /// Size of each read when copying one stream into another (default: `8 KiB`)
    ///
    /// Used by [`copy_to_stream`](crate::stream::copy_to_stream) and by
    /// [`UploadedFile::move_to`](crate::UploadedFile::move_to) when the upload
    /// is backed by a stream instead of a file on disk. Larger chunks mean
    /// fewer system calls and more memory per copy. A value of `0` is treated
    /// as `1`.
    pub copy_chunk_size: usize,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for StreamLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            copy_chunk_size: 8 * 1024,
            _priv: (),
        }
    }
}

impl StreamLimits {
    #[inline(always)]
    pub(crate) fn chunk(&self) -> usize {
        self.copy_chunk_size.max(1)
    }
}

/// Limits applied while parsing raw HTTP/1.x message text
///
/// See [`message::parse_request_with`](crate::message::parse_request_with)
/// and [`message::parse_response_with`](crate::message::parse_response_with).
#[derive(Debug, Clone)]
pub struct MessageLimits {
    /// Maximum number of header lines accepted (default: `100`)
    ///
    /// Folded continuation lines do not count as separate headers.
    pub max_header_count: usize,

    /// Maximum length of the start line in bytes (default: `8 KiB`)
    ///
    /// The start line is the request line (`GET /path HTTP/1.1`) or the
    /// status line (`HTTP/1.1 200 OK`).
    pub max_start_line: usize,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for MessageLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_header_count: 100,
            max_start_line: 8 * 1024,
            _priv: (),
        }
    }
}

/// Limits applied by the server adapter when building a
/// [`ServerRequest`](crate::ServerRequest) from an
/// [`Environment`](crate::server::Environment).
#[derive(Debug, Clone)]
pub struct AdapterLimits {
    /// Maximum number of query parameters parsed from the URI (default: `256`)
    ///
    /// Only applies when the environment does not already carry parsed
    /// query parameters. Exceeding it fails the whole conversion.
    pub max_query_params: usize,

    /// Maximum nesting depth of the uploaded-file specification (default: `16`)
    ///
    /// Each map or nested record level counts as one. Deeper trees fail with
    /// [`Error::InvalidFileSpecification`](crate::Error::InvalidFileSpecification).
    pub max_file_depth: usize,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for AdapterLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_query_params: 256,
            max_file_depth: 16,
            _priv: (),
        }
    }
}
