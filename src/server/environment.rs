use crate::{
    errors::{Error, Result},
    http::{types, upload::UploadError},
    limits::AdapterLimits,
    query::Query,
    Body, FileTree, HeaderBag, Request, ServerRequest, UploadedFile, Uri, Version,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything a server hands over about one incoming request.
///
/// The adapter reads only these fields, never process globals, so any
/// front end (CGI, FastCGI, an embedded server, a test) can fill them in.
///
/// # Server params
///
/// CGI-style keys, all optional except `REQUEST_METHOD`:
///
/// | Key               | Used for                                         |
/// |-------------------|--------------------------------------------------|
/// | `REQUEST_METHOD`  | method                                           |
/// | `HTTPS`           | scheme, `https` unless empty or `off`            |
/// | `HTTP_HOST`       | host and port                                    |
/// | `SERVER_NAME`     | host when `HTTP_HOST` is missing                 |
/// | `SERVER_ADDR`     | host when both of the above are missing          |
/// | `SERVER_PORT`     | port when `HTTP_HOST` carries none               |
/// | `REQUEST_URI`     | path and query                                   |
/// | `QUERY_STRING`    | query when `REQUEST_URI` has none                |
/// | `SERVER_PROTOCOL` | protocol version, e.g. `HTTP/1.1`                |
/// | `HTTP_*`          | headers when [`headers`](Self::headers) is unset |
/// | `CONTENT_TYPE`    | `Content-Type` header, same condition            |
/// | `CONTENT_LENGTH`  | `Content-Length` header, same condition          |
///
/// # Examples
/// ```
/// use maker_message::server::Environment;
///
/// let env = Environment::from_server([
///     ("REQUEST_METHOD", "GET"),
///     ("HTTP_HOST", "example.com:8080"),
///     ("REQUEST_URI", "/search?q=rust"),
///     ("HTTP_COOKIE", "theme=dark; lang=en"),
/// ]);
///
/// let request = env.into_server_request().unwrap();
///
/// assert_eq!(request.uri().to_string(), "http://example.com:8080/search?q=rust");
/// assert_eq!(request.header("host"), ["example.com:8080"]);
/// assert_eq!(request.query_params()["q"], "rust");
/// assert_eq!(request.cookie_params()["theme"], "dark");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// CGI-style server params, kept as the request's snapshot
    pub server: BTreeMap<String, String>,
    /// Raw headers; derived from `server` when `None`
    pub headers: Option<Vec<(String, String)>>,
    /// Cookies; parsed from the `Cookie` header when `None`
    pub cookies: Option<BTreeMap<String, String>>,
    /// Query params; parsed from the URI when `None`
    pub query: Option<BTreeMap<String, String>>,
    /// Deserialized body: an array, an object or nothing
    pub parsed_body: Option<Value>,
    /// Raw body; an empty stream is attached lazily when `None`
    pub body: Option<Body>,
    /// Uploaded-file specification, see [`FileSpec`]
    pub files: BTreeMap<String, FileSpec>,
}

/// One node of an uploaded-file specification.
///
/// # Raw records
///
/// A [`FileSpec::Raw`] JSON object with a `tmp_name` key is a record:
///
/// ```json
/// { "tmp_name": "/tmp/php123", "size": 42, "error": 0, "name": "a.png", "type": "image/png" }
/// ```
///
/// When `tmp_name` is an array (or object), every field is read in
/// parallel and the record expands to a list (or map) of files:
///
/// ```json
/// { "tmp_name": ["/tmp/a", "/tmp/b"], "size": [1, 2], "error": [0, 0], ... }
/// ```
///
/// Objects without `tmp_name` are maps of further specs. Anything else fails
/// with [`Error::InvalidFileSpecification`].
#[derive(Debug, Clone)]
pub enum FileSpec {
    /// A ready file
    File(UploadedFile),
    /// A record or a map of records, as JSON
    Raw(Value),
    /// Named sub-specs
    Map(BTreeMap<String, FileSpec>),
}

impl From<UploadedFile> for FileSpec {
    fn from(file: UploadedFile) -> Self {
        FileSpec::File(file)
    }
}

impl From<Value> for FileSpec {
    fn from(value: Value) -> Self {
        FileSpec::Raw(value)
    }
}

impl Environment {
    /// Creates an environment holding only server params.
    pub fn from_server<I, K, V>(server: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Environment {
            server: server
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            ..Environment::default()
        }
    }

    /// Builds a [`ServerRequest`] with default [`AdapterLimits`].
    #[inline]
    pub fn into_server_request(self) -> Result<ServerRequest> {
        self.into_server_request_with(&AdapterLimits::default())
    }

    /// Builds a [`ServerRequest`].
    ///
    /// Fails with [`Error::MissingMethod`] without `REQUEST_METHOD`, and with
    /// [`Error::InvalidFileSpecification`] on a malformed file spec.
    pub fn into_server_request_with(self, limits: &AdapterLimits) -> Result<ServerRequest> {
        let method = self
            .server
            .get("REQUEST_METHOD")
            .cloned()
            .ok_or(Error::MissingMethod)?;

        let headers = match &self.headers {
            Some(raw) => HeaderBag::from_pairs(raw.iter().map(|(k, v)| (k.as_str(), v.as_str())))?,
            None => HeaderBag::from_pairs(headers_from_server(&self.server))?,
        };

        let uri = uri_from_server(&self.server)?;
        let version = match self.server.get("SERVER_PROTOCOL") {
            Some(protocol) => {
                let token = protocol.strip_prefix("HTTP/").unwrap_or(protocol);
                Version::try_from(token)?
            }
            None => Version::Http11,
        };

        let request = Request::from_parts(&method, uri, headers, self.body, version)?;

        let cookies = match self.cookies {
            Some(cookies) => cookies,
            None => parse_cookies(&request.header_line("cookie")),
        };
        let query = match self.query {
            Some(query) => query,
            None => Query::parse(request.uri().query(), limits.max_query_params)?,
        };

        let mut files = BTreeMap::new();
        for (name, spec) in self.files {
            files.insert(name, normalize(spec, 1, limits)?);
        }

        debug!(
            method = %request.method(),
            uri = %request.uri(),
            files = files.len(),
            "server request built"
        );

        ServerRequest::from_request(request, self.server)
            .with_cookie_params(cookies)
            .with_query_params(query)
            .with_uploaded_files(files)
            .with_parsed_body(self.parsed_body)
    }
}

/// `HTTP_ACCEPT_LANGUAGE` -> `Accept-Language`, plus the two CGI content keys.
fn headers_from_server(server: &BTreeMap<String, String>) -> Vec<(String, &str)> {
    let mut headers = Vec::new();

    for (key, value) in server {
        let name = match key.as_str() {
            "CONTENT_TYPE" => "Content-Type".to_owned(),
            "CONTENT_LENGTH" => "Content-Length".to_owned(),
            _ => match key.strip_prefix("HTTP_") {
                Some(rest) if !rest.is_empty() => header_case(rest),
                _ => continue,
            },
        };

        if !value.is_empty() || name != "Content-Length" {
            headers.push((name, value.as_str()));
        }
    }

    headers
}

fn header_case(cgi: &str) -> String {
    cgi.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn uri_from_server(server: &BTreeMap<String, String>) -> Result<Uri> {
    let get = |key: &str| server.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let scheme = match get("HTTPS") {
        Some(https) if !https.eq_ignore_ascii_case("off") => "https",
        _ => "http",
    };
    let mut uri = Uri::default().with_scheme(scheme)?;

    let mut has_port = false;
    if let Some(host) = get("HTTP_HOST") {
        let (host, port) = split_host_port(host);
        uri = uri.with_host(host)?;
        if let Some(port) = port {
            uri = uri.with_port(Some(port))?;
            has_port = true;
        }
    } else if let Some(host) = get("SERVER_NAME").or_else(|| get("SERVER_ADDR")) {
        uri = uri.with_host(host)?;
    }

    if !has_port {
        let port = get("SERVER_PORT")
            .and_then(|port| types::slice_to_u32(port.as_bytes()))
            .and_then(|port| u16::try_from(port).ok())
            .filter(|&port| port != 0);
        if port.is_some() {
            uri = uri.with_port(port)?;
        }
    }

    let mut has_query = false;
    if let Some(request_uri) = get("REQUEST_URI") {
        let (path, query) = match request_uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request_uri, None),
        };
        uri = uri.with_path(path)?;
        if let Some(query) = query {
            uri = uri.with_query(query);
            has_query = true;
        }
    }

    if !has_query {
        if let Some(query) = get("QUERY_STRING") {
            uri = uri.with_query(query);
        }
    }

    Ok(uri)
}

/// `host[:port]` or `[v6]:port`; an unparsable port is ignored.
fn split_host_port(authority: &str) -> (&str, Option<u16>) {
    let split = match authority.starts_with('[') {
        true => authority.find(']').map(|close| close + 1),
        false => authority.rfind(':'),
    };

    match split {
        Some(at) if authority[at..].starts_with(':') => {
            let port = types::slice_to_u32(authority[at + 1..].as_bytes())
                .and_then(|port| u16::try_from(port).ok())
                .filter(|&port| port != 0);
            (&authority[..at], port)
        }
        Some(at) => (&authority[..at], None),
        None => (authority, None),
    }
}

/// `a=1; b=2` pairs; values are percent-decoded, the first name wins.
fn parse_cookies(line: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();

    for pair in line.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        cookies
            .entry(name.to_owned())
            .or_insert_with(|| types::percent_decode(value.trim(), true));
    }

    cookies
}

// FILE SPECS

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidFileSpecification(message.into())
}

fn normalize(spec: FileSpec, depth: usize, limits: &AdapterLimits) -> Result<FileTree> {
    if depth > limits.max_file_depth {
        return Err(invalid(format!(
            "nesting deeper than {} levels",
            limits.max_file_depth
        )));
    }

    match spec {
        FileSpec::File(file) => Ok(FileTree::File(file)),
        FileSpec::Map(map) => {
            let mut tree = BTreeMap::new();
            for (name, spec) in map {
                tree.insert(name, normalize(spec, depth + 1, limits)?);
            }
            Ok(FileTree::Map(tree))
        }
        FileSpec::Raw(value) => normalize_value(&value, depth, limits),
    }
}

fn normalize_value(value: &Value, depth: usize, limits: &AdapterLimits) -> Result<FileTree> {
    if depth > limits.max_file_depth {
        return Err(invalid(format!(
            "nesting deeper than {} levels",
            limits.max_file_depth
        )));
    }

    let Value::Object(object) = value else {
        return Err(invalid(format!("expected a record or a map, got {value}")));
    };

    match object.get("tmp_name") {
        Some(Value::String(_)) => record_to_file(object).map(FileTree::File),
        Some(Value::Array(names)) => {
            let mut list = Vec::with_capacity(names.len());
            for index in 0..names.len() {
                let record = slice_record(object, |field| field.get(index));
                list.push(normalize_value(&record, depth + 1, limits)?);
            }
            Ok(FileTree::List(list))
        }
        Some(Value::Object(names)) => {
            let mut map = BTreeMap::new();
            for key in names.keys() {
                let record = slice_record(object, |field| field.get(key.as_str()));
                map.insert(key.clone(), normalize_value(&record, depth + 1, limits)?);
            }
            Ok(FileTree::Map(map))
        }
        Some(other) => Err(invalid(format!("`tmp_name` must be a string, got {other}"))),
        None => {
            let mut map = BTreeMap::new();
            for (key, child) in object {
                map.insert(key.clone(), normalize_value(child, depth + 1, limits)?);
            }
            Ok(FileTree::Map(map))
        }
    }
}

const RECORD_FIELDS: [&str; 5] = ["tmp_name", "size", "error", "name", "type"];

/// Picks one element out of every parallel field of a nested record.
fn slice_record<'a>(
    record: &'a serde_json::Map<String, Value>,
    pick: impl Fn(&'a Value) -> Option<&'a Value>,
) -> Value {
    let mut out = serde_json::Map::new();
    for field in RECORD_FIELDS {
        if let Some(value) = record.get(field).and_then(&pick) {
            out.insert(field.to_owned(), value.clone());
        }
    }
    Value::Object(out)
}

fn record_to_file(record: &serde_json::Map<String, Value>) -> Result<UploadedFile> {
    let tmp_name = record
        .get("tmp_name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("record without `tmp_name`"))?;

    let size = match record.get("size") {
        None | Some(Value::Null) => None,
        Some(size) => Some(
            size.as_u64()
                .ok_or_else(|| invalid(format!("`size` must be a non-negative integer, got {size}")))?,
        ),
    };

    let error = match record.get("error") {
        None | Some(Value::Null) => UploadError::Ok,
        Some(code) => {
            let code = code
                .as_i64()
                .ok_or_else(|| invalid(format!("`error` must be an integer, got {code}")))?;
            UploadError::try_from(code)?
        }
    };

    let text = |field: &str| record.get(field).and_then(Value::as_str);

    Ok(UploadedFile::new(
        tmp_name,
        size,
        error,
        text("name"),
        text("type"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;
    use serde_json::json;

    fn env(server: &[(&str, &str)]) -> Environment {
        Environment::from_server(server.iter().copied())
    }

    #[test]
    fn missing_method() {
        let result = env(&[("HTTP_HOST", "a.com")]).into_server_request();
        assert!(matches!(result, Err(Error::MissingMethod)));
    }

    #[test]
    fn uri_from_params() {
        #[rustfmt::skip]
        let cases: [(&[(&str, &str)], &str); 10] = [
            (&[("HTTP_HOST", "a.com")],                                           "http://a.com"),
            (&[("HTTP_HOST", "a.com:8080")],                                      "http://a.com:8080"),
            (&[("HTTPS", "on"), ("HTTP_HOST", "a.com:443")],                      "https://a.com"),
            (&[("HTTPS", "off"), ("HTTP_HOST", "a.com")],                         "http://a.com"),
            (&[("HTTP_HOST", "[::1]:81")],                                        "http://[::1]:81"),
            (&[("SERVER_NAME", "b.com"), ("SERVER_PORT", "8000")],                "http://b.com:8000"),
            (&[("SERVER_ADDR", "10.0.0.1"), ("SERVER_PORT", "80")],               "http://10.0.0.1"),
            (&[("HTTP_HOST", "a.com:81"), ("SERVER_PORT", "99")],                 "http://a.com:81"),
            (&[("HTTP_HOST", "a.com"), ("REQUEST_URI", "/p?x=1"), ("QUERY_STRING", "y=2")], "http://a.com/p?x=1"),
            (&[("HTTP_HOST", "a.com"), ("REQUEST_URI", "/p"), ("QUERY_STRING", "y=2")],     "http://a.com/p?y=2"),
        ];

        for (server, expected) in cases {
            let mut params = vec![("REQUEST_METHOD", "GET")];
            params.extend_from_slice(server);

            let request = env(&params).into_server_request().unwrap();
            assert_eq!(request.uri().to_string(), expected, "{server:?}");
        }
    }

    #[test]
    fn headers_from_params() {
        let request = env(&[
            ("REQUEST_METHOD", "POST"),
            ("HTTP_HOST", "a.com"),
            ("HTTP_ACCEPT_LANGUAGE", "en"),
            ("HTTP_X_REQUEST_ID", "7"),
            ("CONTENT_TYPE", "text/plain"),
            ("CONTENT_LENGTH", ""),
            ("SERVER_NAME", "ignored"),
        ])
        .into_server_request()
        .unwrap();

        assert_eq!(request.header("accept-language"), ["en"]);
        assert_eq!(request.header("X-Request-Id"), ["7"]);
        assert_eq!(request.header("content-type"), ["text/plain"]);
        assert!(!request.has_header("content-length"));
        assert!(!request.has_header("server-name"));
        assert_eq!(
            names(request.headers()),
            ["Content-Type", "Accept-Language", "Host", "X-Request-Id"]
        );
    }

    #[test]
    fn explicit_parts() {
        let mut environment = env(&[
            ("REQUEST_METHOD", "put"),
            ("HTTP_HOST", "a.com"),
            ("REQUEST_URI", "/x?from=uri"),
            ("SERVER_PROTOCOL", "HTTP/2.0"),
        ]);
        environment.headers = Some(vec![
            ("X-Raw".to_owned(), "1".to_owned()),
            ("Cookie".to_owned(), "a=from-header".to_owned()),
        ]);
        environment.cookies = Some(map(&[("a", "given")]));
        environment.query = Some(map(&[("q", "given")]));
        environment.parsed_body = Some(json!({"k": "v"}));
        environment.body = Some(Body::from("raw"));

        let request = environment.into_server_request().unwrap();

        assert_eq!(request.method().as_str(), "PUT");
        assert_eq!(request.protocol_version(), Version::Http2);
        assert_eq!(names(request.headers()), ["Host", "X-Raw", "Cookie"]);
        assert_eq!(request.cookie_params()["a"], "given");
        assert_eq!(request.query_params(), &map(&[("q", "given")]));
        assert_eq!(request.parsed_body(), Some(&json!({"k": "v"})));
        assert_eq!(request.body().to_string_lossy(), "raw");
        assert_eq!(request.server_params()["SERVER_PROTOCOL"], "HTTP/2.0");
    }

    #[test]
    fn derived_cookies_and_query() {
        let request = env(&[
            ("REQUEST_METHOD", "GET"),
            ("HTTP_HOST", "a.com"),
            ("HTTP_COOKIE", "a=1; b=hello%20world; a=2; broken; =x"),
            ("QUERY_STRING", "q=two+words&n=1"),
        ])
        .into_server_request()
        .unwrap();

        assert_eq!(request.cookie_params(), &map(&[("a", "1"), ("b", "hello world")]));
        assert_eq!(request.query_params(), &map(&[("n", "1"), ("q", "two words")]));
    }

    #[test]
    fn query_limit() {
        let limits = AdapterLimits {
            max_query_params: 2,
            ..AdapterLimits::default()
        };
        #[rustfmt::skip]
        let cases = [
            ("a=1&b=2",     true),
            ("a=1&b=2&c=3", false),
            ("a=1&a=2&a=3", false),
        ];

        for (query, ok) in cases {
            let result = env(&[("REQUEST_METHOD", "GET"), ("QUERY_STRING", query)])
                .into_server_request_with(&limits);

            match ok {
                true => assert!(result.is_ok(), "{query}"),
                false => assert!(
                    matches!(result, Err(Error::Query(crate::query::Error::OverLimit(2)))),
                    "{query}"
                ),
            }
        }
    }

    #[test]
    fn invalid_inputs() {
        #[rustfmt::skip]
        let cases: [&[(&str, &str)]; 3] = [
            &[("REQUEST_METHOD", "BREW")],
            &[("REQUEST_METHOD", "GET"), ("SERVER_PROTOCOL", "HTTP/7")],
            &[("REQUEST_METHOD", "GET"), ("HTTP_X_BAD", "a\nb")],
        ];

        for server in cases {
            assert!(env(server).into_server_request().is_err(), "{server:?}");
        }

        let mut environment = env(&[("REQUEST_METHOD", "POST")]);
        environment.parsed_body = Some(json!(3));
        assert!(matches!(
            environment.into_server_request(),
            Err(Error::InvalidParsedBody(_))
        ));
    }

    fn with_files(files: Vec<(&str, FileSpec)>) -> Result<ServerRequest> {
        let mut environment = env(&[("REQUEST_METHOD", "POST")]);
        environment.files = files
            .into_iter()
            .map(|(name, spec)| (name.to_owned(), spec))
            .collect();
        environment.into_server_request()
    }

    #[test]
    fn single_record() {
        let request = with_files(vec![(
            "avatar",
            json!({"tmp_name": "/tmp/php1", "size": 12, "error": 0, "name": "me.png", "type": "image/png"}).into(),
        )])
        .unwrap();

        let file = request.uploaded_files()["avatar"].as_file().unwrap();
        assert_eq!(file.path(), Some("/tmp/php1".into()));
        assert_eq!(file.size(), Some(12));
        assert_eq!(file.error(), UploadError::Ok);
        assert_eq!(file.client_filename(), Some("me.png"));
        assert_eq!(file.client_media_type(), Some("image/png"));
    }

    #[test]
    fn nested_list() {
        let request = with_files(vec![(
            "photos",
            json!({
                "tmp_name": ["/tmp/a", "/tmp/b"],
                "size": [1, 2],
                "error": [0, 4],
                "name": ["a.jpg", "b.jpg"],
                "type": ["image/jpeg", "image/jpeg"],
            })
            .into(),
        )])
        .unwrap();

        let FileTree::List(list) = &request.uploaded_files()["photos"] else {
            panic!("expected a list");
        };
        assert_eq!(list.len(), 2);

        let a = list[0].as_file().unwrap();
        let b = list[1].as_file().unwrap();
        assert_eq!((a.client_filename(), a.size(), a.error()), (Some("a.jpg"), Some(1), UploadError::Ok));
        assert_eq!((b.client_filename(), b.size(), b.error()), (Some("b.jpg"), Some(2), UploadError::NoFile));
    }

    #[test]
    fn nested_map_of_lists() {
        let request = with_files(vec![(
            "doc",
            json!({
                "tmp_name": {"cover": "/tmp/c", "pages": ["/tmp/p1", "/tmp/p2"]},
                "size": {"cover": 5, "pages": [6, 7]},
                "error": {"cover": 0, "pages": [0, 0]},
                "name": {"cover": "c.pdf", "pages": ["1.pdf", "2.pdf"]},
            })
            .into(),
        )])
        .unwrap();

        let doc = &request.uploaded_files()["doc"];
        let cover = doc.get("cover").and_then(FileTree::as_file).unwrap();
        assert_eq!(cover.client_filename(), Some("c.pdf"));
        assert_eq!(cover.client_media_type(), None);

        let pages = doc.get("pages").unwrap();
        assert_eq!(pages.files().len(), 2);
        assert_eq!(pages.index(1).and_then(FileTree::as_file).and_then(|f| f.size()), Some(7));
    }

    #[test]
    fn plain_maps_and_ready_files() {
        let ready = UploadedFile::new("/tmp/r", None, UploadError::Ok, Some("r"), None);

        let mut inner = BTreeMap::new();
        inner.insert("ready".to_owned(), FileSpec::File(ready));
        inner.insert(
            "raw".to_owned(),
            FileSpec::Raw(json!({"deeper": {"tmp_name": "/tmp/d", "error": 0}})),
        );

        let request = with_files(vec![("form", FileSpec::Map(inner))]).unwrap();
        let form = &request.uploaded_files()["form"];

        assert_eq!(form.get("ready").and_then(FileTree::as_file).and_then(|f| f.client_filename()), Some("r"));
        let deeper = form.get("raw").and_then(|node| node.get("deeper")).and_then(FileTree::as_file);
        assert_eq!(deeper.and_then(|f| f.path()), Some("/tmp/d".into()));
    }

    #[test]
    fn invalid_specs() {
        #[rustfmt::skip]
        let cases = [
            json!("just a string"),
            json!(42),
            json!([1, 2]),
            json!({"tmp_name": 5}),
            json!({"tmp_name": "/tmp/x", "error": 5}),
            json!({"tmp_name": "/tmp/x", "error": "zero"}),
            json!({"tmp_name": "/tmp/x", "size": -1}),
            json!({"nested": {"tmp_name": "/tmp/x", "error": 99}}),
        ];

        for spec in cases {
            let result = with_files(vec![("f", spec.clone().into())]);
            assert!(
                matches!(result, Err(Error::InvalidFileSpecification(_))),
                "{spec}"
            );
        }
    }

    #[test]
    fn depth_limit() {
        let mut spec = json!({"tmp_name": "/tmp/leaf"});
        for _ in 0..20 {
            spec = json!({ "level": spec });
        }

        let result = with_files(vec![("deep", spec.into())]);
        assert!(matches!(result, Err(Error::InvalidFileSpecification(_))));
    }

    #[test]
    fn header_case() {
        #[rustfmt::skip]
        let cases = [
            ("ACCEPT",          "Accept"),
            ("ACCEPT_LANGUAGE", "Accept-Language"),
            ("X_FORWARDED_FOR", "X-Forwarded-For"),
            ("DNT",             "Dnt"),
        ];

        for (cgi, expected) in cases {
            assert_eq!(super::header_case(cgi), expected);
        }
    }
}
