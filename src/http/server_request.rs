use crate::{
    errors::{Error, Result},
    http::{upload::FileTree, uri::IntoUri},
    Body, HeaderBag, IntoHeaderValues, Method, Request, Uri, Version,
};
use serde_json::Value;
use std::{collections::BTreeMap, rc::Rc};

/// An incoming request as seen by server-side code.
///
/// Wraps a [`Request`] and adds what the receiving server knows about it:
///
/// | Part             | Set by                                   |
/// |------------------|------------------------------------------|
/// | server params    | construction only                        |
/// | cookie params    | [`with_cookie_params`](Self::with_cookie_params) |
/// | query params     | [`with_query_params`](Self::with_query_params)   |
/// | parsed body      | [`with_parsed_body`](Self::with_parsed_body)     |
/// | uploaded files   | [`with_uploaded_files`](Self::with_uploaded_files) |
/// | attributes       | [`with_attribute`](Self::with_attribute)         |
///
/// Cookie and query params are not derived from headers or the URI here;
/// the server adapter does that once when it builds the request.
///
/// # Examples
/// ```
/// use maker_message::ServerRequest;
/// use serde_json::json;
///
/// let request = ServerRequest::new("POST", "http://a.com/form", Default::default()).unwrap();
///
/// let parsed = request.with_parsed_body(Some(json!({"name": "x"}))).unwrap();
/// assert_eq!(parsed.parsed_body(), Some(&json!({"name": "x"})));
///
/// assert!(request.with_parsed_body(Some(json!("scalar"))).is_err());
///
/// let routed = request.with_attribute("route", json!("form.submit"));
/// assert_eq!(routed.attribute("route"), Some(&json!("form.submit")));
/// assert_eq!(request.attribute_or("route", json!(null)), json!(null));
/// ```
#[derive(Debug, Clone)]
pub struct ServerRequest {
    request: Request,
    server_params: Rc<BTreeMap<String, String>>,
    cookie_params: BTreeMap<String, String>,
    query_params: BTreeMap<String, String>,
    parsed_body: Option<Value>,
    uploaded_files: BTreeMap<String, FileTree>,
    attributes: BTreeMap<String, Value>,
}

impl ServerRequest {
    /// Creates a server request without headers or body, speaking HTTP/1.1.
    #[inline]
    pub fn new<M: AsRef<str>, U: IntoUri>(
        method: M,
        uri: U,
        server_params: BTreeMap<String, String>,
    ) -> Result<Self> {
        Ok(Self::from_request(Request::new(method, uri)?, server_params))
    }

    /// Wraps an existing request.
    pub fn from_request(request: Request, server_params: BTreeMap<String, String>) -> Self {
        ServerRequest {
            request,
            server_params: Rc::new(server_params),
            cookie_params: BTreeMap::new(),
            query_params: BTreeMap::new(),
            parsed_body: None,
            uploaded_files: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// The wrapped request.
    #[inline(always)]
    pub const fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    fn map_request(&self, request: Request) -> Self {
        ServerRequest {
            request,
            ..self.clone()
        }
    }
}

// Request parts
impl ServerRequest {
    #[inline(always)]
    pub const fn method(&self) -> Method {
        self.request.method()
    }

    #[inline(always)]
    pub const fn uri(&self) -> &Uri {
        self.request.uri()
    }

    #[inline]
    pub fn request_target(&self) -> String {
        self.request.request_target()
    }

    #[inline(always)]
    pub fn headers(&self) -> &HeaderBag {
        self.request.headers()
    }

    #[inline(always)]
    pub fn has_header(&self, name: &str) -> bool {
        self.request.has_header(name)
    }

    #[inline(always)]
    pub fn header(&self, name: &str) -> &[String] {
        self.request.header(name)
    }

    #[inline(always)]
    pub fn header_line(&self, name: &str) -> String {
        self.request.header_line(name)
    }

    #[inline]
    pub fn body(&self) -> Body {
        self.request.body()
    }

    #[inline(always)]
    pub const fn protocol_version(&self) -> Version {
        self.request.protocol_version()
    }

    pub fn with_method<M: AsRef<str>>(&self, method: M) -> Result<Self> {
        Ok(self.map_request(self.request.with_method(method)?))
    }

    /// See [`Request::with_uri`].
    pub fn with_uri<U: IntoUri>(&self, uri: U, preserve_host: bool) -> Result<Self> {
        Ok(self.map_request(self.request.with_uri(uri, preserve_host)?))
    }

    pub fn with_request_target(&self, target: &str) -> Result<Self> {
        Ok(self.map_request(self.request.with_request_target(target)?))
    }

    pub fn with_header<V: IntoHeaderValues>(&self, name: &str, values: V) -> Result<Self> {
        Ok(self.map_request(self.request.with_header(name, values)?))
    }

    pub fn with_added_header<V: IntoHeaderValues>(&self, name: &str, values: V) -> Result<Self> {
        Ok(self.map_request(self.request.with_added_header(name, values)?))
    }

    pub fn without_header(&self, name: &str) -> Self {
        self.map_request(self.request.without_header(name))
    }

    pub fn with_body<B: Into<Body>>(&self, body: B) -> Self {
        self.map_request(self.request.with_body(body))
    }

    pub fn with_protocol_version<V: AsRef<str>>(&self, version: V) -> Result<Self> {
        Ok(self.map_request(self.request.with_protocol_version(version)?))
    }
}

// Server side parts
impl ServerRequest {
    /// Server environment snapshot taken at construction.
    #[inline(always)]
    pub fn server_params(&self) -> &BTreeMap<String, String> {
        &self.server_params
    }

    #[inline(always)]
    pub fn cookie_params(&self) -> &BTreeMap<String, String> {
        &self.cookie_params
    }

    pub fn with_cookie_params(&self, cookies: BTreeMap<String, String>) -> Self {
        ServerRequest {
            cookie_params: cookies,
            ..self.clone()
        }
    }

    #[inline(always)]
    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query_params
    }

    pub fn with_query_params(&self, query: BTreeMap<String, String>) -> Self {
        ServerRequest {
            query_params: query,
            ..self.clone()
        }
    }

    /// Deserialized body, if any.
    #[inline(always)]
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    /// Returns a copy with another parsed body.
    ///
    /// Only arrays and objects are accepted; `None` and `null` clear it.
    /// Anything else fails with [`Error::InvalidParsedBody`].
    pub fn with_parsed_body(&self, body: Option<Value>) -> Result<Self> {
        let parsed_body = match body {
            None | Some(Value::Null) => None,
            Some(value @ (Value::Array(_) | Value::Object(_))) => Some(value),
            Some(other) => {
                return Err(Error::InvalidParsedBody(format!(
                    "expected an array, an object or nothing, got {other}"
                )))
            }
        };

        Ok(ServerRequest {
            parsed_body,
            ..self.clone()
        })
    }

    #[inline(always)]
    pub fn uploaded_files(&self) -> &BTreeMap<String, FileTree> {
        &self.uploaded_files
    }

    pub fn with_uploaded_files(&self, files: BTreeMap<String, FileTree>) -> Self {
        ServerRequest {
            uploaded_files: files,
            ..self.clone()
        }
    }

    #[inline(always)]
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attribute `name`, or `default` when it is not set.
    #[inline]
    pub fn attribute_or(&self, name: &str, default: Value) -> Value {
        self.attributes.get(name).cloned().unwrap_or(default)
    }

    pub fn with_attribute<V: Into<Value>>(&self, name: &str, value: V) -> Self {
        let mut request = self.clone();
        request.attributes.insert(name.to_owned(), value.into());
        request
    }

    /// Returns a copy without `name`; an equal copy when it is absent.
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut request = self.clone();
        request.attributes.remove(name);
        request
    }
}
