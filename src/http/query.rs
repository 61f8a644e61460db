//! URL query string parsing and building with flexible collection support.

use crate::http::types;
use memchr::memchr;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// URL query string parser and builder.
///
/// Parsing splits on `&` and the first `=` of every pair, then percent-decodes
/// names and values (`+` is read as a space, as in
/// `application/x-www-form-urlencoded` bodies).
///
/// # Examples
/// ```rust
/// use maker_message::query::Query;
/// use std::collections::HashMap;
///
/// // Parse into Vec (preserves order)
/// let query = "name=john%20doe&age=25&city";
/// let vec_params: Vec<(String, String)> = Query::parse(query, 10).unwrap();
/// assert_eq!(vec_params.len(), 3);
/// assert_eq!(vec_params[0], ("name".into(), "john doe".into()));
///
/// // Parse into HashMap (deduplicates)
/// let hash_params: HashMap<String, String> = Query::parse(query, 10).unwrap();
/// assert_eq!(hash_params.len(), 3);
///
/// // Handle limits
/// let result = Query::parse::<Vec<(String, String)>>("a=1&b=2", 1);
/// assert!(result.is_err()); // Exceeds limit of 1 parameter
/// ```
/// All possible formats:
/// ```rust
/// use maker_message::query::Query;
///
/// let params: Vec<(String, String)> = Query::parse("debug&name=&=Qwe&key=sda&&", 10).unwrap();
///
/// assert_eq!(params.len(), 5);
/// assert_eq!(params[0], ("debug".into(), "".into()));
/// assert_eq!(params[1], ("name".into(), "".into()));
/// assert_eq!(params[2], ("".into(), "Qwe".into()));
/// assert_eq!(params[3], ("key".into(), "sda".into()));
/// assert_eq!(params[4], ("".into(), "".into()));
/// ```
pub struct Query;

impl Query {
    /// Parses a URL query string into a new collection.
    ///
    /// A leading `?` is skipped, so `?a=1` and `a=1` are equivalent.
    /// An empty string yields an empty collection.
    #[inline(always)]
    pub fn parse<C: QueryCollector>(query: &str, limit: usize) -> Result<C, Error> {
        let mut result = C::with_capacity(limit.min(16));
        Self::parse_into(&mut result, query, limit)?;
        Ok(result)
    }

    /// Parses a URL query string into an existing collection.
    ///
    /// # Examples
    /// ```
    /// use maker_message::query::Query;
    ///
    /// // Reuse collection for multiple parses
    /// let mut collector: Vec<(String, String)> = Vec::new();
    ///
    /// Query::parse_into(&mut collector, "a=1&b=2", 10).unwrap();
    /// Query::parse_into(&mut collector, "c=3&d=4", 10).unwrap();
    /// assert_eq!(collector.len(), 4); // parameters are appended
    ///
    /// // Values are decoded
    /// let mut collector: Vec<(String, String)> = Vec::new();
    /// Query::parse_into(&mut collector, "email=user%40example.com", 10).unwrap();
    /// assert_eq!(collector[0].1, "user@example.com");
    /// ```
    pub fn parse_into<C: QueryCollector>(
        result: &mut C,
        query: &str,
        limit: usize,
    ) -> Result<(), Error> {
        let data = query.strip_prefix('?').unwrap_or(query);
        let bytes = data.as_bytes();

        // Counts pairs read, not distinct keys: maps collapse repeats
        let mut count = result.length();
        let mut start = 0;
        while start < bytes.len() {
            if count >= limit {
                return Err(Error::OverLimit(limit));
            }
            count += 1;

            let end = memchr(b'&', &bytes[start..])
                .map(|pos| start + pos)
                .unwrap_or(bytes.len());

            let index = memchr(b'=', &bytes[start..end]).unwrap_or(end - start);
            let split_index = start + index;

            // `&` and `=` are ASCII, so both indices sit on char boundaries
            let key = &data[start..split_index];
            let value = match split_index < end {
                true => &data[split_index + 1..end],
                false => "",
            };

            result.add_param(
                types::percent_decode(key, true),
                types::percent_decode(value, true),
            );
            start = end + 1;
        }

        Ok(())
    }

    /// Builds a query string from name/value pairs.
    ///
    /// Everything outside the unreserved set is percent-encoded (spaces as
    /// `%20`). A `None` value emits the bare name.
    ///
    /// # Examples
    /// ```
    /// use maker_message::query::Query;
    ///
    /// let query = Query::build([("q", Some("a b&c")), ("flag", None), ("n", Some("1"))]);
    /// assert_eq!(query, "q=a%20b%26c&flag&n=1");
    /// ```
    pub fn build<I, K, V>(params: I) -> String
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut out = String::new();

        for (key, value) in params {
            if !out.is_empty() {
                out.push('&');
            }
            encode_into(&mut out, key.as_ref());

            if let Some(value) = value {
                out.push('=');
                encode_into(&mut out, value.as_ref());
            }
        }

        out
    }
}

fn encode_into(out: &mut String, value: &str) {
    const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

    for b in value.bytes() {
        if types::is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(b >> 4) as usize] as char);
            out.push(HEX_UPPER[(b & 0x0F) as usize] as char);
        }
    }
}

/// A trait for types that can collect parsed query parameters.
///
/// # Examples
/// ```rust
/// use maker_message::query::{Query, QueryCollector};
///
/// struct Names(Vec<String>);
///
/// impl QueryCollector for Names {
///     fn add_param(&mut self, key: String, _value: String) {
///         self.0.push(key);
///     }
///
///     fn length(&self) -> usize {
///         self.0.len()
///     }
///
///     fn with_capacity(capacity: usize) -> Self {
///         Names(Vec::with_capacity(capacity))
///     }
/// }
///
/// let names: Names = Query::parse("a=1&b=2", 8).unwrap();
/// assert_eq!(names.0, ["a", "b"]);
/// ```
pub trait QueryCollector
where
    Self: Sized,
{
    /// Adds a decoded parameter to the collection.
    fn add_param(&mut self, key: String, value: String);

    /// Returns the current number of parameters in the collection.
    fn length(&self) -> usize;

    /// Creates a new collection with the specified capacity.
    fn with_capacity(capacity: usize) -> Self;
}

// Preserves parameter order
impl QueryCollector for Vec<(String, String)> {
    #[inline(always)]
    fn add_param(&mut self, key: String, value: String) {
        self.push((key, value));
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }
}

// Last wins
impl QueryCollector for HashMap<String, String> {
    #[inline(always)]
    fn add_param(&mut self, key: String, value: String) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity(capacity)
    }
}

// Last wins, sorted by name
impl QueryCollector for BTreeMap<String, String> {
    #[inline(always)]
    fn add_param(&mut self, key: String, value: String) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn with_capacity(_: usize) -> Self {
        BTreeMap::new()
    }
}

/// Error types that can occur during query parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The number of parameters exceeded the specified limit.
    #[error("query parameter limit exceeded: limit={0}")]
    OverLimit(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    type Pairs = Vec<(String, String)>;

    fn pairs(params: &Pairs) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn basic() {
        let cases = ["a=1&b=2", "?a=1&b=2"];

        for line in cases {
            let params: Pairs = Query::parse(line, 8).unwrap();
            assert_eq!(pairs(&params), [("a", "1"), ("b", "2")]);
        }
    }

    #[test]
    fn full() {
        let params: Pairs = Query::parse("flag&empty=&=val&&key=value", 10).unwrap();

        assert_eq!(
            pairs(&params),
            [("flag", ""), ("empty", ""), ("", "val"), ("", ""), ("key", "value")]
        );
    }

    #[test]
    fn decoding() {
        #[rustfmt::skip]
        let cases = [
            ("a=hello+world",       ("a", "hello world")),
            ("a=hello%20world",     ("a", "hello world")),
            ("na%6De=x",            ("name", "x")),
            ("a=%E2%9C%93",         ("a", "\u{2713}")),
            ("a=100%",              ("a", "100%")),
            ("a=%zz",               ("a", "%zz")),
            ("a=b=c",               ("a", "b=c")),
        ];

        for (line, expected) in cases {
            let params: Pairs = Query::parse(line, 8).unwrap();
            assert_eq!(pairs(&params), [expected], "{line}");
        }
    }

    #[test]
    fn maps() {
        let hash: HashMap<String, String> = Query::parse("k=1&k=2", 8).unwrap();
        assert_eq!(hash.len(), 1);
        assert_eq!(hash["k"], "2");

        let tree: BTreeMap<String, String> = Query::parse("b=2&a=1", 8).unwrap();
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn empty() {
        for line in ["", "?"] {
            let params: Pairs = Query::parse(line, 8).unwrap();
            assert!(params.is_empty());
        }
    }

    #[test]
    fn limit_error() {
        assert_eq!(
            Query::parse::<Pairs>("a&a", 1),
            Err(Error::OverLimit(1))
        );
    }

    #[test]
    fn limit_counts_repeated_keys() {
        let repeated = "k=1&".repeat(10_000);

        assert_eq!(
            Query::parse::<BTreeMap<String, String>>(&repeated, 2),
            Err(Error::OverLimit(2))
        );
        assert_eq!(
            Query::parse::<HashMap<String, String>>("k=1&k=2&k=3", 2),
            Err(Error::OverLimit(2))
        );

        let within: BTreeMap<String, String> = Query::parse("k=1&k=2", 2).unwrap();
        assert_eq!(within["k"], "2");
    }

    #[test]
    fn build() {
        #[rustfmt::skip]
        let cases: [(Vec<(&str, Option<&str>)>, &str); 4] = [
            (vec![],                                 ""),
            (vec![("a", Some("1")), ("b", None)],    "a=1&b"),
            (vec![("sp ace", Some("x y"))],          "sp%20ace=x%20y"),
            (vec![("p", Some("50%"))],               "p=50%25"),
        ];

        for (params, expected) in cases {
            assert_eq!(Query::build(params), expected);
        }
    }

    #[test]
    fn build_then_parse() {
        let built = Query::build([("msg", Some("a+b=c&d")), ("empty", Some(""))]);
        let params: Pairs = Query::parse(&built, 8).unwrap();

        assert_eq!(pairs(&params), [("msg", "a+b=c&d"), ("empty", "")]);
    }
}
