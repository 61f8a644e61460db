//! Plain HTTP/1.x text form of messages.
//!
//! [`to_string`] renders a [`Request`] or [`Response`] the way it would
//! travel on the wire. [`parse_request`] and [`parse_response`] read such
//! text back into values.
//!
//! # Parsing rules
//!
//! - The start line is `METHOD SP target [SP "HTTP/" version]` for requests
//!   and `"HTTP/" version SP code [SP reason]` for responses.
//! - Header lines are `name ":" value`. A line starting with a space or tab
//!   continues the previous value (obsolete line folding) and is joined to it
//!   with a single space.
//! - Lines end with `CRLF` or a bare `LF`. The first empty line ends the
//!   header section, everything after it is the body.
//! - The start line and headers must be valid `UTF-8`; the body is kept as
//!   raw bytes.
//!
//! # Examples
//! ```
//! use maker_message::message;
//!
//! let raw = "POST /submit?x=1 HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello";
//! let request = message::parse_request(raw).unwrap();
//!
//! assert_eq!(request.method().as_str(), "POST");
//! assert_eq!(request.uri().to_string(), "http://example.com/submit?x=1");
//! assert_eq!(request.header_line("content-length"), "5");
//! assert_eq!(request.body().to_string_lossy(), "hello");
//!
//! assert_eq!(message::to_string(&request), raw);
//! ```

use crate::{
    errors::{Error, Result},
    http::types::{self, Version},
    limits::MessageLimits,
    Body, HeaderBag, Request, Response, ServerRequest, Uri,
};
use memchr::memchr;

/// Header, body and protocol version plumbing shared by every message type.
///
/// Expects the type to have `headers: HeaderBag`, `body: BodySlot` and
/// `version: Version` fields and to be `Clone`.
macro_rules! impl_message_parts {
    ($ty:ident) => {
        // Headers
        impl $ty {
            /// All headers, in insertion order.
            #[inline(always)]
            pub fn headers(&self) -> &$crate::HeaderBag {
                &self.headers
            }

            /// Case-insensitive presence check.
            #[inline(always)]
            pub fn has_header(&self, name: &str) -> bool {
                self.headers.has_header(name)
            }

            /// All values of `name`, empty when absent.
            #[inline(always)]
            pub fn header(&self, name: &str) -> &[String] {
                self.headers.header(name)
            }

            /// Values of `name` joined with `", "`, empty when absent.
            #[inline(always)]
            pub fn header_line(&self, name: &str) -> String {
                self.headers.header_line(name)
            }

            /// See [`HeaderBag::with_header`](crate::HeaderBag::with_header).
            pub fn with_header<V: $crate::IntoHeaderValues>(
                &self,
                name: &str,
                values: V,
            ) -> $crate::Result<Self> {
                Ok(Self {
                    headers: self.headers.with_header(name, values)?,
                    ..self.clone()
                })
            }

            /// See [`HeaderBag::with_added_header`](crate::HeaderBag::with_added_header).
            pub fn with_added_header<V: $crate::IntoHeaderValues>(
                &self,
                name: &str,
                values: V,
            ) -> $crate::Result<Self> {
                Ok(Self {
                    headers: self.headers.with_added_header(name, values)?,
                    ..self.clone()
                })
            }

            /// See [`HeaderBag::without_header`](crate::HeaderBag::without_header).
            pub fn without_header(&self, name: &str) -> Self {
                Self {
                    headers: self.headers.without_header(name),
                    ..self.clone()
                }
            }
        }

        // Body and protocol version
        impl $ty {
            /// Returns the body handle, attaching an empty in-memory stream on
            /// first access.
            #[inline]
            pub fn body(&self) -> $crate::Body {
                self.body.get()
            }

            /// Returns a copy with `body` attached.
            ///
            /// Strings and byte vectors are wrapped in a fresh in-memory
            /// stream; a [`Body`](crate::Body) handle is attached as is.
            pub fn with_body<B: Into<$crate::Body>>(&self, body: B) -> Self {
                let body = body.into();
                if self.body.holds(&body) {
                    return self.clone();
                }

                Self {
                    body: $crate::http::stream::BodySlot::new(Some(body)),
                    ..self.clone()
                }
            }

            #[inline(always)]
            pub const fn protocol_version(&self) -> $crate::Version {
                self.version
            }

            /// Returns a copy speaking `version` (`"1.0"`, `"1.1"`, `"2"`, ...).
            pub fn with_protocol_version<V: AsRef<str>>(&self, version: V) -> $crate::Result<Self> {
                Ok(Self {
                    version: $crate::Version::try_from(version.as_ref())?,
                    ..self.clone()
                })
            }
        }
    };
}

pub(crate) use impl_message_parts;

/// A message that can be rendered as HTTP/1.x text.
pub trait Message: private::Sealed {
    /// `GET /path HTTP/1.1` or `HTTP/1.1 200 OK`
    fn start_line(&self) -> String;

    fn message_headers(&self) -> &HeaderBag;

    fn message_body(&self) -> Body;

    /// A `Host` value to print when the headers carry none.
    #[inline]
    fn implied_host(&self) -> Option<String> {
        None
    }

    /// Header names whose values go on separate lines.
    #[inline]
    fn is_repeated_line(&self, _name: &str) -> bool {
        false
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for crate::Request {}
    impl Sealed for crate::Response {}
    impl Sealed for crate::ServerRequest {}
}

impl Message for Request {
    fn start_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method(),
            self.request_target(),
            self.protocol_version()
        )
    }

    #[inline]
    fn message_headers(&self) -> &HeaderBag {
        self.headers()
    }

    #[inline]
    fn message_body(&self) -> Body {
        self.body()
    }

    fn implied_host(&self) -> Option<String> {
        match self.uri().host() {
            "" => None,
            host => Some(host.to_owned()),
        }
    }
}

impl Message for ServerRequest {
    #[inline]
    fn start_line(&self) -> String {
        self.request().start_line()
    }

    #[inline]
    fn message_headers(&self) -> &HeaderBag {
        self.headers()
    }

    #[inline]
    fn message_body(&self) -> Body {
        self.body()
    }

    #[inline]
    fn implied_host(&self) -> Option<String> {
        self.request().implied_host()
    }
}

impl Message for Response {
    fn start_line(&self) -> String {
        format!(
            "HTTP/{} {} {}",
            self.protocol_version(),
            self.status(),
            self.reason_phrase()
        )
    }

    #[inline]
    fn message_headers(&self) -> &HeaderBag {
        self.headers()
    }

    #[inline]
    fn message_body(&self) -> Body {
        self.body()
    }

    #[inline]
    fn is_repeated_line(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case("set-cookie")
    }
}

/// Renders `message` as HTTP/1.x text.
///
/// Multiple values share one line joined by `", "`, except `Set-Cookie` on
/// responses, which gets one line per value. The body is read in full from
/// its start.
///
/// # Examples
/// ```
/// use maker_message::{message, Response};
///
/// let response = Response::new(404u16)
///     .unwrap()
///     .with_header("Set-Cookie", ["a=1", "b=2"])
///     .unwrap()
///     .with_body("gone");
///
/// assert_eq!(
///     message::to_string(&response),
///     "HTTP/1.1 404 Not Found\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\ngone"
/// );
/// ```
pub fn to_string<M: Message>(message: &M) -> String {
    let mut out = message.start_line();
    let headers = message.message_headers();

    if !headers.has_header("host") {
        if let Some(host) = message.implied_host() {
            out.push_str("\r\nHost: ");
            out.push_str(&host);
        }
    }

    for (name, values) in headers {
        if message.is_repeated_line(name) {
            for value in values {
                out.push_str("\r\n");
                out.push_str(name);
                out.push_str(": ");
                out.push_str(value);
            }
        } else {
            out.push_str("\r\n");
            out.push_str(name);
            out.push_str(": ");
            out.push_str(&values.join(", "));
        }
    }

    out.push_str("\r\n\r\n");
    out.push_str(&message.message_body().to_string_lossy());
    out
}

// PARSING

struct RawMessage<'a> {
    start_line: &'a str,
    headers: Vec<(&'a str, String)>,
    body: &'a [u8],
}

#[inline]
fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidMessage(message.into())
}

/// Splits `raw` into start line, unfolded headers and body.
fn split_message<'a>(raw: &'a [u8], limits: &MessageLimits) -> Result<RawMessage<'a>> {
    if raw.is_empty() {
        return Err(invalid("message is empty"));
    }

    // Collect line boundaries up to the blank line
    let mut lines: Vec<&'a [u8]> = Vec::new();
    let mut body_start = raw.len();
    let mut start = 0;

    while start < raw.len() {
        let (line, next) = match memchr(b'\n', &raw[start..]) {
            Some(pos) => (&raw[start..start + pos], start + pos + 1),
            None => (&raw[start..], raw.len()),
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        if line.is_empty() && !lines.is_empty() {
            body_start = next;
            break;
        }
        lines.push(line);
        start = next;
    }

    let (first, header_lines) = lines
        .split_first()
        .ok_or_else(|| invalid("missing start line"))?;

    if first.is_empty() {
        return Err(invalid("missing start line"));
    }
    if first.len() > limits.max_start_line {
        return Err(invalid(format!(
            "start line exceeds {} bytes",
            limits.max_start_line
        )));
    }
    let start_line =
        simdutf8::basic::from_utf8(first).map_err(|_| invalid("start line is not valid UTF-8"))?;

    let mut headers: Vec<(&'a str, String)> = Vec::new();
    for line in header_lines {
        let line = simdutf8::basic::from_utf8(line)
            .map_err(|_| invalid("header section is not valid UTF-8"))?;

        if line.starts_with([' ', '\t']) {
            let (_, value) = headers
                .last_mut()
                .ok_or_else(|| invalid("continuation line without a header"))?;
            let folded = types::trim_ows(line);
            if !folded.is_empty() {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(folded);
            }
            continue;
        }

        if headers.len() >= limits.max_header_count {
            return Err(invalid(format!(
                "more than {} header lines",
                limits.max_header_count
            )));
        }

        let colon = memchr(b':', line.as_bytes())
            .ok_or_else(|| invalid(format!("header line without `:`: {line}")))?;
        headers.push((&line[..colon], types::trim_ows(&line[colon + 1..]).to_owned()));
    }

    Ok(RawMessage {
        start_line,
        headers,
        body: &raw[body_start..],
    })
}

#[inline]
fn build_headers(raw: &[(&str, String)]) -> Result<HeaderBag> {
    HeaderBag::from_pairs(raw.iter().map(|(name, value)| (*name, value.as_str())))
        .map_err(|err| invalid(err.to_string()))
}

#[inline]
fn build_body(raw: &[u8]) -> Option<Body> {
    match raw.is_empty() {
        true => None,
        false => Some(Body::from(raw)),
    }
}

#[inline]
fn parse_version(token: &str) -> Result<Version> {
    let version = token
        .strip_prefix("HTTP/")
        .ok_or_else(|| invalid(format!("bad protocol token `{token}`")))?;
    Version::try_from(version)
}

/// Parses HTTP/1.x request text with default [`MessageLimits`].
#[inline]
pub fn parse_request<R: AsRef<[u8]>>(raw: R) -> Result<Request> {
    parse_request_with(raw, &MessageLimits::default())
}

/// Parses HTTP/1.x request text.
///
/// Origin-form targets (`/path?query`) are combined with the `Host` header
/// into an `http` request URI; the text carries no scheme, so a port such as
/// `:443` is kept as given rather than read as `https`. Absolute-form targets (`http://host/path`) become
/// the URI as they are and are kept as the request target. `*` and
/// authority-form targets are kept as the request target only.
///
/// Structural problems fail with [`Error::InvalidMessage`]; an unknown
/// method or version fails with its own error variant.
pub fn parse_request_with<R: AsRef<[u8]>>(raw: R, limits: &MessageLimits) -> Result<Request> {
    let message = split_message(raw.as_ref(), limits)?;

    let mut parts = message.start_line.splitn(3, ' ');
    let method = parts.next().unwrap_or_default();
    let target = parts
        .next()
        .filter(|target| !target.is_empty())
        .ok_or_else(|| invalid(format!("bad request line `{}`", message.start_line)))?;
    let version = match parts.next() {
        Some(token) => parse_version(token)?,
        None => Version::Http11,
    };

    let headers = build_headers(&message.headers)?;
    let absolute = is_absolute_form(target);

    let uri = if absolute {
        Uri::parse(target)?
    } else {
        let path = match target.starts_with('/') {
            true => target,
            false => "/",
        };

        match headers.header("host").first() {
            Some(host) => Uri::parse(&format!("http://{host}{path}"))?,
            None if target.starts_with('/') => Uri::parse(target)?,
            None => Uri::default(),
        }
    };

    let request = Request::from_parts(method, uri, headers, build_body(message.body), version)?;
    match target.starts_with('/') {
        true => Ok(request),
        false => request.with_request_target(target),
    }
}

/// `scheme://...`
#[inline]
fn is_absolute_form(target: &str) -> bool {
    match target.find("://") {
        Some(end) => types::is_scheme(&target[..end]),
        None => false,
    }
}

/// Parses HTTP/1.x response text with default [`MessageLimits`].
#[inline]
pub fn parse_response<R: AsRef<[u8]>>(raw: R) -> Result<Response> {
    parse_response_with(raw, &MessageLimits::default())
}

/// Parses HTTP/1.x response text.
///
/// A missing or empty reason phrase falls back to the standard phrase of
/// the status code.
pub fn parse_response_with<R: AsRef<[u8]>>(raw: R, limits: &MessageLimits) -> Result<Response> {
    let message = split_message(raw.as_ref(), limits)?;

    let mut parts = message.start_line.splitn(3, ' ');
    let version = parse_version(parts.next().unwrap_or_default())?;

    let code = parts.next().unwrap_or_default();
    let status = match code.len() {
        3 => types::slice_to_u32(code.as_bytes()),
        _ => None,
    }
    .ok_or_else(|| invalid(format!("bad status code `{code}`")))?;

    let reason = parts.next().filter(|reason| !reason.is_empty());
    let headers = build_headers(&message.headers)?;

    Response::from_parts(
        status as u16,
        headers,
        build_body(message.body),
        version,
        reason,
    )
}

#[cfg(test)]
mod to_string_tests {
    use super::*;

    #[test]
    fn request() {
        let request = Request::new("GET", "http://example.com:8080/a?b=c")
            .unwrap()
            .with_added_header("Accept", ["text/html", "text/plain"])
            .unwrap();

        assert_eq!(
            to_string(&request),
            "GET /a?b=c HTTP/1.1\r\nHost: example.com:8080\r\nAccept: text/html, text/plain\r\n\r\n"
        );
    }

    #[test]
    fn implied_host() {
        let request = Request::new("PUT", "http://example.com/x")
            .unwrap()
            .without_header("Host")
            .with_protocol_version("1.0")
            .unwrap()
            .with_body("data");

        assert_eq!(
            to_string(&request),
            "PUT /x HTTP/1.0\r\nHost: example.com\r\n\r\ndata"
        );
    }

    #[test]
    fn response() {
        let response = Response::from_parts(299u16, HeaderBag::new(), None, Version::Http2, Some("Odd"))
            .unwrap()
            .with_header("X-A", ["1", "2"])
            .unwrap();

        assert_eq!(to_string(&response), "HTTP/2 299 Odd\r\nX-A: 1, 2\r\n\r\n");
    }
}
