//! The boundary between messages and whatever actually sends them.
//!
//! This crate ships no network client. Implement [`Transport`] over the I/O
//! stack of your choice and keep the error split: failures before the server
//! could see the request are [`TransportError::Connect`], everything else is
//! [`TransportError::Request`].
//!
//! # Examples
//! ```
//! use maker_message::{
//!     client::{Transport, TransportError},
//!     Request, Response,
//! };
//!
//! struct Echo;
//!
//! impl Transport for Echo {
//!     fn send(&self, request: Request) -> Result<Response, TransportError> {
//!         if request.uri().host().is_empty() {
//!             return Err(TransportError::Connect {
//!                 request,
//!                 message: "no host to connect to".into(),
//!             });
//!         }
//!         Ok(Response::default().with_body(request.body()))
//!     }
//! }
//!
//! let request = Request::new("POST", "http://example.com/").unwrap().with_body("ping");
//! assert_eq!(Echo.send(request).unwrap().body().to_string_lossy(), "ping");
//!
//! let error = Echo.send(Request::new("GET", "/relative").unwrap()).unwrap_err();
//! assert!(error.is_connect());
//! assert_eq!(error.request().uri().path(), "/relative");
//! ```
use crate::{Request, Response};

/// Sends a [`Request`] and returns the server's [`Response`].
pub trait Transport {
    fn send(&self, request: Request) -> Result<Response, TransportError>;
}

/// A failed [`Transport::send`], carrying the request that failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Name resolution, connect, TLS handshake or connect timeout
    #[error("connect failed for {}: {message}", .request.uri())]
    Connect { request: Request, message: String },
    /// Any failure after the connection was up
    #[error("request to {} failed: {message}", .request.uri())]
    Request { request: Request, message: String },
}

impl TransportError {
    #[inline]
    pub fn request(&self) -> &Request {
        match self {
            TransportError::Connect { request, .. } | TransportError::Request { request, .. } => {
                request
            }
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        match self {
            TransportError::Connect { message, .. } | TransportError::Request { message, .. } => {
                message
            }
        }
    }

    #[inline]
    pub const fn is_connect(&self) -> bool {
        matches!(self, TransportError::Connect { .. })
    }

    /// Takes the request back, e.g. to retry it.
    #[inline]
    pub fn into_request(self) -> Request {
        match self {
            TransportError::Connect { request, .. } | TransportError::Request { request, .. } => {
                request
            }
        }
    }
}
