//! Ordered, case-insensitive header multimap shared by every message.

use crate::{
    errors::{Error, Result},
    http::types,
};
use std::{borrow::Cow, rc::Rc};

/// An ordered, case-insensitive multimap from header name to values.
///
/// - Lookups ignore ASCII case: `Content-Type` and `content-type` are the
///   same header.
/// - A name keeps the casing of its first write until the header is replaced
///   with [`with_header`](HeaderBag::with_header).
/// - Values of a multi-value header stay in insertion order.
/// - Every name is an [RFC 7230 token](https://tools.ietf.org/html/rfc7230#section-3.2.6)
///   and every value is trimmed of spaces/tabs and free of control characters.
///
/// The storage is shared between copies and only duplicated when a copy is
/// changed, so cloning a bag (or a message holding one) is cheap.
///
/// # Examples
/// ```
/// use maker_message::HeaderBag;
///
/// let headers = HeaderBag::new()
///     .with_header("Accept", ["text/html", "application/json"])
///     .unwrap()
///     .with_added_header("accept", "*/*")
///     .unwrap();
///
/// assert!(headers.has_header("ACCEPT"));
/// assert_eq!(headers.header("accept"), ["text/html", "application/json", "*/*"]);
/// assert_eq!(headers.header_line("Accept"), "text/html, application/json, */*");
/// assert_eq!(headers.iter().next().unwrap().0, "Accept");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Rc<Vec<HeaderEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderBag {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from `(name, values)` pairs.
    ///
    /// Repeated names (compared case-insensitively) are merged: values are
    /// appended and the first casing is kept.
    ///
    /// # Examples
    /// ```
    /// use maker_message::HeaderBag;
    ///
    /// let headers = HeaderBag::from_pairs([
    ///     ("X-Foo", vec!["a"]),
    ///     ("x-foo", vec!["b", "c"]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(headers.header("X-FOO"), ["a", "b", "c"]);
    /// assert_eq!(headers.len(), 1);
    /// ```
    pub fn from_pairs<I, N, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: IntoHeaderValues,
    {
        let mut entries: Vec<HeaderEntry> = Vec::new();

        for (name, values) in pairs {
            let name = Self::validate_name(name.as_ref())?;
            let values = Self::normalize_values(values)?;

            match entries.iter_mut().find(|e| e.name.eq_ignore_ascii_case(name)) {
                Some(entry) => entry.values.extend(values),
                None => entries.push(HeaderEntry {
                    name: name.to_owned(),
                    values,
                }),
            }
        }

        Ok(Self {
            entries: Rc::new(entries),
        })
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    fn validate_name(name: &str) -> Result<&str> {
        match types::is_token(name) {
            true => Ok(name),
            false => Err(Error::InvalidHeaderName(format!("`{name}` is not a valid token"))),
        }
    }

    fn normalize_values<V: IntoHeaderValues>(values: V) -> Result<Vec<String>> {
        let values = values.into_header_values();
        if values.is_empty() {
            return Err(Error::InvalidHeaderValue(
                "header values can not be an empty list".into(),
            ));
        }

        values
            .into_iter()
            .map(|value| {
                let trimmed = types::trim_ows(&value);
                match types::is_field_value(trimmed) {
                    true if trimmed.len() == value.len() => Ok(value),
                    true => Ok(trimmed.to_owned()),
                    false => Err(Error::InvalidHeaderValue(format!("{value:?}"))),
                }
            })
            .collect()
    }
}

// Read access
impl HeaderBag {
    /// Checks whether a header exists, ignoring case.
    #[inline]
    pub fn has_header(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns all values of a header, or an empty slice when absent.
    #[inline]
    pub fn header(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => &self.entries[index].values,
            None => &[],
        }
    }

    /// Returns the values of a header joined with `", "`, or `""` when absent.
    #[inline]
    pub fn header_line(&self, name: &str) -> String {
        self.header(name).join(", ")
    }

    /// Iterates over `(stored name, values)` in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.values.as_slice()))
    }

    /// Number of distinct header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when both bags share the same storage, which is the
    /// case for a clone or for a `without_header` call that removed nothing.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.entries, &other.entries)
    }
}

// Transformations
impl HeaderBag {
    /// Returns a copy where `name` holds exactly `values`.
    ///
    /// The header takes the casing of `name` as given here. An existing
    /// header keeps its position in iteration order.
    pub fn with_header<V: IntoHeaderValues>(&self, name: &str, values: V) -> Result<Self> {
        let name = Self::validate_name(name)?;
        let values = Self::normalize_values(values)?;

        let mut bag = self.clone();
        let entries = Rc::make_mut(&mut bag.entries);
        let entry = HeaderEntry {
            name: name.to_owned(),
            values,
        };

        match self.position(name) {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
        Ok(bag)
    }

    /// Returns a copy with `values` appended to `name`.
    ///
    /// An existing header keeps its stored casing; otherwise this behaves
    /// like [`with_header`](HeaderBag::with_header).
    pub fn with_added_header<V: IntoHeaderValues>(&self, name: &str, values: V) -> Result<Self> {
        let name = Self::validate_name(name)?;
        let values = Self::normalize_values(values)?;

        let mut bag = self.clone();
        let entries = Rc::make_mut(&mut bag.entries);

        match self.position(name) {
            Some(index) => entries[index].values.extend(values),
            None => entries.push(HeaderEntry {
                name: name.to_owned(),
                values,
            }),
        }
        Ok(bag)
    }

    /// Returns a copy without `name`.
    ///
    /// When the header is absent the result shares storage with `self`,
    /// so [`HeaderBag::ptr_eq`] tells "nothing changed" apart cheaply.
    ///
    /// # Examples
    /// ```
    /// use maker_message::HeaderBag;
    ///
    /// let headers = HeaderBag::new().with_header("A", "1").unwrap();
    ///
    /// let same = headers.without_header("B");
    /// assert!(HeaderBag::ptr_eq(&headers, &same));
    ///
    /// let removed = headers.without_header("a");
    /// assert!(removed.is_empty());
    /// assert!(headers.has_header("A"));
    /// ```
    pub fn without_header(&self, name: &str) -> Self {
        let Some(index) = self.position(name) else {
            return self.clone();
        };

        let mut bag = self.clone();
        Rc::make_mut(&mut bag.entries).remove(index);
        bag
    }

    /// Returns a copy where `name` holds the single `value` and comes first.
    ///
    /// An existing header keeps its stored casing. Used for `Host`, which
    /// must lead the header list.
    pub(crate) fn with_leading(&self, name: &str, value: String) -> Self {
        let mut bag = self.clone();
        let entries = Rc::make_mut(&mut bag.entries);

        let name = match self.position(name) {
            Some(index) => entries.remove(index).name,
            None => name.to_owned(),
        };
        entries.insert(
            0,
            HeaderEntry {
                name,
                values: vec![value],
            },
        );
        bag
    }
}

impl<'a> IntoIterator for &'a HeaderBag {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Conversion into a list of raw header values.
///
/// Implemented for strings, integers, booleans and chars (stringified before
/// validation) and for arrays, slices and vectors of those.
///
/// # Note on Floating-Point
/// Floating-point numbers are not implemented to avoid locale-dependent
/// formatting and precision issues in protocol headers. Format them to a
/// string with controlled precision first.
///
/// # Example
/// ```
/// use maker_message::{HeaderBag, IntoHeaderValues};
///
/// struct Etag(u64);
///
/// impl IntoHeaderValues for Etag {
///     fn into_header_values(self) -> Vec<String> {
///         vec![format!("\"{:x}\"", self.0)]
///     }
/// }
///
/// let headers = HeaderBag::new().with_header("ETag", Etag(255)).unwrap();
/// assert_eq!(headers.header_line("etag"), "\"ff\"");
/// ```
pub trait IntoHeaderValues {
    fn into_header_values(self) -> Vec<String>;
}

macro_rules! impl_into_header_values {
    ($($t:ty),* $(,)?) => {
        $(impl IntoHeaderValues for $t {
            #[inline]
            fn into_header_values(self) -> Vec<String> {
                vec![self.to_string()]
            }
        })*
    };
}

impl_into_header_values! {
    &str, String, &String, Cow<'_, str>, Rc<str>,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    bool, char,
}

impl<T: IntoHeaderValues> IntoHeaderValues for Vec<T> {
    #[inline]
    fn into_header_values(self) -> Vec<String> {
        self.into_iter()
            .flat_map(T::into_header_values)
            .collect()
    }
}

impl<T: IntoHeaderValues, const N: usize> IntoHeaderValues for [T; N] {
    #[inline]
    fn into_header_values(self) -> Vec<String> {
        self.into_iter()
            .flat_map(T::into_header_values)
            .collect()
    }
}

impl<T: IntoHeaderValues + Clone> IntoHeaderValues for &[T] {
    #[inline]
    fn into_header_values(self) -> Vec<String> {
        self.iter()
            .cloned()
            .flat_map(T::into_header_values)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_access() {
        #[rustfmt::skip]
        let cases = [
            ("Content-Type", "content-type"),
            ("content-type", "CONTENT-TYPE"),
            ("X-Request-Id", "x-REQUEST-id"),
        ];

        for (set, get) in cases {
            let headers = HeaderBag::new().with_header(set, "v").unwrap();

            assert!(headers.has_header(get));
            assert_eq!(headers.header(get), ["v"]);
            assert_eq!(headers.iter().next().unwrap().0, set);
        }
    }

    #[test]
    fn absent() {
        let headers = HeaderBag::new();

        assert!(!headers.has_header("x"));
        assert!(headers.header("x").is_empty());
        assert_eq!(headers.header_line("x"), "");
        assert_eq!(headers.len(), 0);
    }

    #[test]
    fn with_header_replaces_and_recases() {
        let headers = HeaderBag::new()
            .with_header("x-foo", ["a", "b"])
            .unwrap()
            .with_header("Y", "y")
            .unwrap();
        let replaced = headers.with_header("X-FOO", "c").unwrap();

        assert_eq!(replaced.header("x-foo"), ["c"]);
        let names: Vec<&str> = replaced.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["X-FOO", "Y"]);

        // The receiver is untouched
        assert_eq!(headers.header("x-foo"), ["a", "b"]);
        assert_eq!(headers.iter().next().unwrap().0, "x-foo");
    }

    #[test]
    fn with_added_header_keeps_casing() {
        let headers = HeaderBag::new()
            .with_header("Set-Cookie", "a=1")
            .unwrap()
            .with_added_header("SET-COOKIE", ["b=2", "c=3"])
            .unwrap()
            .with_added_header("Vary", "Accept")
            .unwrap();

        assert_eq!(headers.header("set-cookie"), ["a=1", "b=2", "c=3"]);
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Set-Cookie", "Vary"]);
    }

    #[test]
    fn without_header() {
        let headers = HeaderBag::new()
            .with_header("A", "1")
            .unwrap()
            .with_header("B", "2")
            .unwrap();

        let same = headers.without_header("c");
        assert!(HeaderBag::ptr_eq(&headers, &same));

        let removed = headers.without_header("a");
        assert!(!HeaderBag::ptr_eq(&headers, &removed));
        assert!(!removed.has_header("A"));
        assert!(headers.has_header("A"));
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn copy_on_write() {
        let headers = HeaderBag::new().with_header("A", "1").unwrap();
        let copy = headers.clone();
        assert!(HeaderBag::ptr_eq(&headers, &copy));

        let changed = copy.with_added_header("A", "2").unwrap();
        assert!(!HeaderBag::ptr_eq(&headers, &changed));
        assert_eq!(headers.header("A"), ["1"]);
        assert_eq!(changed.header("A"), ["1", "2"]);
    }

    #[test]
    fn trimming() {
        #[rustfmt::skip]
        let cases = [
            ("  value  ",   "value"),
            ("\tvalue\t",   "value"),
            (" a b ",       "a b"),
            ("   ",         ""),
            ("",            ""),
        ];

        for (raw, expected) in cases {
            let headers = HeaderBag::new().with_header("X", raw).unwrap();
            assert_eq!(headers.header("x"), [expected], "{raw:?}");
        }
    }

    #[test]
    fn numeric_values() {
        let headers = HeaderBag::new()
            .with_header("Content-Length", 128)
            .unwrap()
            .with_header("X-Neg", -5i64)
            .unwrap()
            .with_header("X-Flag", true)
            .unwrap()
            .with_header("X-List", vec![1u8, 2, 3])
            .unwrap();

        assert_eq!(headers.header_line("content-length"), "128");
        assert_eq!(headers.header_line("x-neg"), "-5");
        assert_eq!(headers.header_line("x-flag"), "true");
        assert_eq!(headers.header_line("x-list"), "1, 2, 3");
    }

    #[test]
    fn invalid_names() {
        let cases = ["", "a b", "a:b", "a\r\nb", "é", "(x)", "a\tb"];

        for name in cases {
            assert!(
                matches!(HeaderBag::new().with_header(name, "v"), Err(Error::InvalidHeaderName(_))),
                "{name:?}"
            );
            assert!(matches!(
                HeaderBag::new().with_added_header(name, "v"),
                Err(Error::InvalidHeaderName(_))
            ));
        }
    }

    #[test]
    fn invalid_values() {
        let cases = ["a\r\nb", "a\nb", "\0", "bell\x07", "del\x7f"];

        for value in cases {
            assert!(
                matches!(HeaderBag::new().with_header("X", value), Err(Error::InvalidHeaderValue(_))),
                "{value:?}"
            );
        }

        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            HeaderBag::new().with_header("X", empty.clone()),
            Err(Error::InvalidHeaderValue(_))
        ));
        assert!(matches!(
            HeaderBag::new().with_added_header("X", empty),
            Err(Error::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn obs_text_values() {
        let headers = HeaderBag::new().with_header("X", "naïve café").unwrap();
        assert_eq!(headers.header_line("x"), "naïve café");
    }

    #[test]
    fn from_pairs() {
        let headers = HeaderBag::from_pairs([
            ("Accept", vec!["a".to_string()]),
            ("Host", vec!["h".to_string()]),
            ("ACCEPT", vec!["b".to_string()]),
        ])
        .unwrap();

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Accept", "Host"]);
        assert_eq!(headers.header("accept"), ["a", "b"]);

        assert!(HeaderBag::from_pairs([("bad name", "x")]).is_err());
        assert!(HeaderBag::from_pairs([("X", "bad\nvalue")]).is_err());
    }

    #[test]
    fn leading() {
        let headers = HeaderBag::from_pairs([("Accept", "*/*"), ("HOST", "old")]).unwrap();

        let led = headers.with_leading("Host", "new".into());
        let entries: Vec<(&str, &[String])> = led.iter().collect();
        assert_eq!(entries[0].0, "HOST");
        assert_eq!(entries[0].1, ["new"]);
        assert_eq!(entries[1].0, "Accept");

        let fresh = HeaderBag::new().with_leading("Host", "h".into());
        assert_eq!(fresh.iter().next().unwrap().0, "Host");
    }
}
