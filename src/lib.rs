//! maker_message - Immutable HTTP message values
//!
//! Requests, responses, URIs, headers and body streams as values: every
//! `with_*` call returns a new message and leaves the original untouched.
//! Unchanged parts are shared between the old and the new value, so a chain
//! of modifications stays cheap.
//!
//! # What is inside
//!
//! - **[`Uri`]**: parsing, normalization, component-wise modification
//! - **[`HeaderBag`]**: ordered, case-insensitive, multi-valued headers
//! - **[`Request`] / [`Response`]**: the messages themselves
//! - **[`ServerRequest`]**: a request plus server params, cookies, query,
//!   parsed body, uploaded files and attributes
//! - **[`ByteStream`] / [`Body`]**: readable, writable, seekable byte
//!   resources backed by memory, files or arbitrary readers and writers
//! - **[`UploadedFile`]**: an uploaded file that can be moved once
//! - **[`message`]**: wire serialization and parsing
//! - **[`server::Environment`]**: builds a [`ServerRequest`] from CGI-style
//!   server params
//! - **[`client::Transport`]**: the seam for anything that sends requests
//!
//! # Protocol Support
//!
//! Protocol versions `0.9`, `1.0`, `1.1`, `2` and `3`; the nine standard
//! methods; status codes `100..=599`, with standard reason phrases for the
//! registered ones.
//!
//! # Examples
//!
//! Building a request:
//! ```
//! use maker_message::{Method, Request};
//!
//! let request = Request::new("get", "https://example.com/items?page=2")
//!     .unwrap()
//!     .with_header("Accept", "application/json")
//!     .unwrap()
//!     .with_body("");
//!
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(request.request_target(), "/items?page=2");
//! assert_eq!(request.header_line("host"), "example.com");
//!
//! // the original is never touched
//! let post = request.with_method("POST").unwrap();
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(post.method(), Method::Post);
//! ```
//! Round-tripping through the wire format:
//! ```
//! use maker_message::{message, Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Created)
//!     .unwrap()
//!     .with_added_header("Set-Cookie", ["a=1", "b=2"])
//!     .unwrap()
//!     .with_body("done");
//!
//! let wire = message::to_string(&response);
//! assert_eq!(
//!     wire,
//!     "HTTP/1.1 201 Created\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\ndone"
//! );
//!
//! let parsed = message::parse_response(&wire).unwrap();
//! assert_eq!(parsed.status(), 201);
//! assert_eq!(parsed.header("set-cookie"), ["a=1", "b=2"]);
//! ```
//! Tuning limits:
//! ```
//! use maker_message::{limits::MessageLimits, message};
//!
//! let limits = MessageLimits {
//!     max_header_count: 1,
//!     ..MessageLimits::default()
//! };
//!
//! let wire = "GET / HTTP/1.1\r\nHost: a.com\r\nAccept: */*\r\n\r\n";
//! assert!(message::parse_request_with(wire, &limits).is_err());
//! ```

pub(crate) mod http {
    pub(crate) mod headers;
    pub mod message;
    pub mod query;
    pub(crate) mod request;
    pub(crate) mod response;
    pub(crate) mod server_request;
    pub mod stream;
    pub(crate) mod types;
    pub mod upload;
    pub(crate) mod uri;
}
pub mod server {
    //! Building a [`ServerRequest`](crate::ServerRequest) from what a server
    //! knows about an incoming request.
    mod environment;

    pub use environment::{Environment, FileSpec};
}
pub mod client;
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::{Error, Result},
    http::{
        headers::{HeaderBag, IntoHeaderValues},
        message, query,
        request::Request,
        response::Response,
        server_request::ServerRequest,
        stream::{self, Body, ByteStream},
        types::{Method, StatusCode, Version},
        upload::{self, FileTree, UploadedFile},
        uri::{IntoUri, Uri, UriParts},
    },
};

#[cfg(test)]
pub mod tools {
    use crate::HeaderBag;
    use std::collections::BTreeMap;

    #[inline]
    pub fn names(headers: &HeaderBag) -> Vec<&str> {
        headers.iter().map(|(name, _)| name).collect()
    }

    #[inline]
    pub fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}
