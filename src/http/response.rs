use crate::{
    errors::{Error, Result},
    http::{
        message::impl_message_parts,
        stream::BodySlot,
        types::{reason_phrase, StatusCode},
    },
    Body, HeaderBag, Version,
};

/// An immutable HTTP response.
///
/// The status code is always in `100..=599`. The reason phrase is the
/// standard one for known codes unless an explicit phrase was given; codes
/// without a standard phrase require an explicit one.
///
/// # Examples
/// ```
/// use maker_message::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::NotFound).unwrap();
/// assert_eq!(response.status(), 404);
/// assert_eq!(response.reason_phrase(), "Not Found");
///
/// let created = response.with_status(201u16, None).unwrap();
/// assert_eq!(created.reason_phrase(), "Created");
///
/// let teapot = response.with_status(418u16, Some("Short and stout")).unwrap();
/// assert_eq!(teapot.reason_phrase(), "Short and stout");
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    reason: String,
    headers: HeaderBag,
    body: BodySlot,
    version: Version,
}

impl_message_parts!(Response);

impl Default for Response {
    /// `200 OK`, HTTP/1.1, no headers, empty body.
    fn default() -> Self {
        Response {
            status: StatusCode::Ok.as_u16(),
            reason: StatusCode::Ok.reason_phrase().to_owned(),
            headers: HeaderBag::new(),
            body: BodySlot::default(),
            version: Version::Http11,
        }
    }
}

impl Response {
    /// Creates a response with the standard reason phrase of `status`.
    ///
    /// Fails with [`Error::InvalidStatusCode`] when `status` has no standard
    /// phrase.
    #[inline]
    pub fn new<S: Into<u16>>(status: S) -> Result<Self> {
        Self::from_parts(status, HeaderBag::new(), None, Version::Http11, None)
    }

    /// Creates a response from all of its parts.
    ///
    /// An explicit `reason` is taken literally, including `""`. With `None`
    /// the standard phrase is used, and a code without one fails.
    pub fn from_parts<S: Into<u16>>(
        status: S,
        headers: HeaderBag,
        body: Option<Body>,
        version: Version,
        reason: Option<&str>,
    ) -> Result<Self> {
        let status = check_range(status.into())?;
        let reason = match reason {
            Some(reason) => reason.to_owned(),
            None => standard_reason(status)?.to_owned(),
        };

        Ok(Response {
            status,
            reason,
            headers,
            body: BodySlot::new(body),
            version,
        })
    }
}

#[inline]
fn check_range(status: u16) -> Result<u16> {
    match status {
        100..=599 => Ok(status),
        _ => Err(Error::InvalidStatusCode(format!(
            "{status} is outside 100..=599"
        ))),
    }
}

#[inline]
fn standard_reason(status: u16) -> Result<&'static str> {
    reason_phrase(status).ok_or_else(|| {
        Error::InvalidStatusCode(format!(
            "{status} has no standard reason phrase, give one explicitly"
        ))
    })
}

impl Response {
    #[inline(always)]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[inline(always)]
    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Returns a copy with another status.
    ///
    /// `status` must have a standard phrase, otherwise this fails with
    /// [`Error::InvalidStatusCode`]. A non-empty `reason` replaces that
    /// phrase; `None` or `""` keeps it.
    pub fn with_status<S: Into<u16>>(&self, status: S, reason: Option<&str>) -> Result<Self> {
        let status = check_range(status.into())?;
        let standard = standard_reason(status)?;
        let reason = reason.filter(|reason| !reason.is_empty()).unwrap_or(standard).to_owned();

        Ok(Response {
            status,
            reason,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn known_statuses() {
        #[rustfmt::skip]
        let cases = [
            (100u16, "Continue"),
            (200, "OK"),
            (203, "Non-Authoritative Information"),
            (404, "Not Found"),
            (418, "I'm a teapot"),
            (511, "Network Authentication Required"),
        ];

        for (status, reason) in cases {
            let response = Response::new(status).unwrap();
            assert_eq!(response.status(), status);
            assert_eq!(response.reason_phrase(), reason);
        }
    }

    #[test]
    fn unknown_statuses() {
        for status in [0u16, 99, 299, 600, 999] {
            assert!(matches!(Response::new(status), Err(Error::InvalidStatusCode(_))), "{status}");
        }
    }

    #[test]
    fn explicit_reason() {
        #[rustfmt::skip]
        let cases = [
            (200u16, Some("Fine"), Some("Fine")),
            (200, Some(""),       Some("")),
            (200, Some("0"),      Some("0")),
            (299, Some("Custom"), Some("Custom")),
            (299, None,           None),
            (600, Some("Nope"),   None),
            (99,  Some("Nope"),   None),
        ];

        for (status, reason, expected) in cases {
            let result = Response::from_parts(status, HeaderBag::new(), None, Version::Http11, reason);
            match expected {
                Some(expected) => assert_eq!(result.unwrap().reason_phrase(), expected),
                None => assert!(matches!(result, Err(Error::InvalidStatusCode(_)))),
            }
        }
    }

    #[test]
    fn with_status() {
        let response = Response::new(404u16).unwrap();

        #[rustfmt::skip]
        let cases = [
            (201u16, None,            Some("Created")),
            (201, Some(""),           Some("Created")),
            (201, Some("Made"),       Some("Made")),
            (299, Some("Odd"),        None),
            (299, None,               None),
            (299, Some(""),           None),
            (700, Some("Way off"),    None),
        ];

        for (status, reason, expected) in cases {
            let result = response.with_status(status, reason);
            match expected {
                Some(expected) => {
                    let changed = result.unwrap();
                    assert_eq!(changed.status(), status);
                    assert_eq!(changed.reason_phrase(), expected);
                }
                None => assert!(matches!(result, Err(Error::InvalidStatusCode(_)))),
            }
        }

        assert_eq!(response.status(), 404);
        assert_eq!(response.reason_phrase(), "Not Found");
    }

    #[test]
    fn default() {
        let response = Response::default();
        assert_eq!(response.status(), 200);
        assert_eq!(response.reason_phrase(), "OK");
        assert_eq!(response.protocol_version(), Version::Http11);
        assert!(response.headers().is_empty());
    }

    #[test]
    fn parts_are_shared() {
        let response = Response::default()
            .with_header("Content-Type", "text/plain")
            .unwrap()
            .with_added_header("Set-Cookie", ["a=1", "b=2"])
            .unwrap()
            .with_body("hello");

        let moved = response.with_status(StatusCode::Accepted, None).unwrap();
        assert!(HeaderBag::ptr_eq(moved.headers(), response.headers()));
        assert!(Body::ptr_eq(&moved.body(), &response.body()));
        assert_eq!(names(moved.headers()), ["Content-Type", "Set-Cookie"]);
        assert_eq!(moved.header("set-cookie"), ["a=1", "b=2"]);

        let h2 = moved.with_protocol_version("2.0").unwrap();
        assert_eq!(h2.protocol_version(), Version::Http2);
        assert_eq!(moved.protocol_version(), Version::Http11);
    }
}
