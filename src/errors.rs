use crate::query;
use std::io;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the message value model can report.
///
/// All errors are raised synchronously by the call that detected them.
/// A failed constructor or `with_*` call never leaves a half-built value
/// behind: the receiver is untouched and nothing is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw URI string could not be split into components
    /// (missing host, bad port literal, bad scheme, ...).
    #[error("unable to parse URI: {0}")]
    UriParse(String),
    /// A single URI component given to a `with_*` call is invalid.
    #[error("invalid URI component: {0}")]
    InvalidUriComponent(String),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),
    /// A header value breaks the field-value grammar, or no values were given.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid status code: {0}")]
    InvalidStatusCode(String),
    #[error("invalid protocol version: {0}")]
    InvalidProtocolVersion(String),
    #[error("invalid request target: {0}")]
    InvalidRequestTarget(String),

    /// Operation on a closed, detached or non-capable stream, or on an
    /// uploaded file that was already moved or failed to upload.
    #[error("stream state error: {0}")]
    StreamState(String),

    #[error("invalid file specification: {0}")]
    InvalidFileSpecification(String),
    #[error("no HTTP method found in the server environment")]
    MissingMethod,
    #[error("invalid parsed body: {0}")]
    InvalidParsedBody(String),

    /// Raw HTTP message text that cannot be parsed.
    #[error("invalid HTTP message: {0}")]
    InvalidMessage(String),
    #[error("invalid query string: {0}")]
    Query(#[from] query::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    #[inline]
    pub(crate) fn detached() -> Self {
        Error::StreamState("stream is detached".into())
    }
}
