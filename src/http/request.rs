use crate::{
    errors::{Error, Result},
    http::{message::impl_message_parts, stream::BodySlot, uri::IntoUri},
    Body, HeaderBag, Method, Uri, Version,
};

/// An immutable outgoing HTTP request.
///
/// Made of a [`Method`], a [`Uri`], a [`HeaderBag`], a lazily attached
/// [`Body`], a protocol [`Version`] and an optional request-target override.
/// Every `with_*` method returns a new request; untouched parts are shared
/// with the receiver.
///
/// # Host header
///
/// When the URI has a host, construction places a `Host` header first in
/// iteration order (`host` or `host:port`) unless the given headers already
/// carry one. [`with_uri`](Request::with_uri) refreshes it.
///
/// # Examples
/// ```
/// use maker_message::Request;
///
/// let request = Request::new("GET", "http://foo.com:8080/x").unwrap();
///
/// assert_eq!(request.header("Host"), ["foo.com:8080"]);
/// assert_eq!(request.request_target(), "/x");
///
/// let json = request.with_header("Accept", "application/json").unwrap();
/// assert!(json.has_header("accept"));
/// assert!(!request.has_header("accept")); // the original is untouched
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderBag,
    body: BodySlot,
    version: Version,
    request_target: Option<String>,
}

impl_message_parts!(Request);

impl Request {
    /// Creates a request without headers or body, speaking HTTP/1.1.
    ///
    /// The method is matched case-insensitively against the recognized set.
    #[inline]
    pub fn new<M: AsRef<str>, U: IntoUri>(method: M, uri: U) -> Result<Self> {
        Self::from_parts(method, uri, HeaderBag::new(), None, Version::Http11)
    }

    /// Creates a request from all of its parts.
    ///
    /// `body` stays unattached when `None` and becomes an empty in-memory
    /// stream on first access.
    pub fn from_parts<M: AsRef<str>, U: IntoUri>(
        method: M,
        uri: U,
        headers: HeaderBag,
        body: Option<Body>,
        version: Version,
    ) -> Result<Self> {
        let method = Method::try_from(method.as_ref())?;
        let uri = uri.into_uri()?;

        let headers = match headers.has_header("host") {
            true => headers,
            false => with_host_from(&headers, &uri),
        };

        Ok(Request {
            method,
            uri,
            headers,
            body: BodySlot::new(body),
            version,
            request_target: None,
        })
    }
}

/// Puts the `Host` derived from `uri` first, or leaves `headers` alone when
/// the URI has no host.
#[inline]
fn with_host_from(headers: &HeaderBag, uri: &Uri) -> HeaderBag {
    if uri.host().is_empty() {
        return headers.clone();
    }

    let host = match uri.port() {
        Some(port) => format!("{}:{port}", uri.host()),
        None => uri.host().to_owned(),
    };
    headers.with_leading("Host", host)
}

impl Request {
    #[inline(always)]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[inline(always)]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request target: the override when one was set, otherwise
    /// the origin form of the URI (`path?query`, `/` for an empty path).
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }

        let mut target = match self.uri.path() {
            "" => String::from("/"),
            path => path.to_owned(),
        };
        if !self.uri.query().is_empty() {
            target.push('?');
            target.push_str(self.uri.query());
        }
        target
    }

    /// Returns a copy with an explicit request target, such as `*` or an
    /// absolute-form URI.
    ///
    /// Fails with [`Error::InvalidRequestTarget`] when `target` contains
    /// whitespace.
    pub fn with_request_target(&self, target: &str) -> Result<Self> {
        if target.contains(char::is_whitespace) {
            return Err(Error::InvalidRequestTarget(format!(
                "`{target}` contains whitespace"
            )));
        }

        Ok(Request {
            request_target: Some(target.to_owned()),
            ..self.clone()
        })
    }

    /// Returns a copy using `method`.
    pub fn with_method<M: AsRef<str>>(&self, method: M) -> Result<Self> {
        Ok(Request {
            method: Method::try_from(method.as_ref())?,
            ..self.clone()
        })
    }

    /// Returns a copy addressed to `uri`.
    ///
    /// The `Host` header is replaced from the new URI (keeping its stored
    /// casing and moving it first) unless `preserve_host` is set and a `Host`
    /// header is already present. This holds even when `uri` equals the
    /// current one. A URI without host leaves headers alone.
    ///
    /// # Examples
    /// ```
    /// use maker_message::Request;
    ///
    /// let request = Request::new("GET", "http://a.com/")
    ///     .unwrap()
    ///     .with_header("Accept", "*/*")
    ///     .unwrap();
    ///
    /// let moved = request.with_uri("http://b.com:81/", false).unwrap();
    /// assert_eq!(moved.header("host"), ["b.com:81"]);
    ///
    /// let kept = request.with_uri("http://b.com:81/", true).unwrap();
    /// assert_eq!(kept.header("host"), ["a.com"]);
    /// ```
    pub fn with_uri<U: IntoUri>(&self, uri: U, preserve_host: bool) -> Result<Self> {
        let uri = uri.into_uri()?;
        let keep_host = preserve_host && self.headers.has_header("host");
        if keep_host && uri == self.uri {
            return Ok(self.clone());
        }

        let headers = match keep_host {
            true => self.headers.clone(),
            false => with_host_from(&self.headers, &uri),
        };

        Ok(Request {
            uri,
            headers,
            ..self.clone()
        })
    }
}
