//! URL parsing and endpoint composition.
//!
//! [`Url`] keeps the six generic-syntax components exactly as written
//! (`scheme://netloc/path;params?query#fragment`) so that parsing and printing
//! a URL gives back the same string. Unlike `url::Url` it does not normalise,
//! which matters for base URLs such as `https://example.com` that must not grow
//! a trailing slash before endpoint segments are joined onto them.

mod mime;
mod query;

pub use mime::parse_content_type;
pub use query::QueryParams;

use crate::error::UrlError;

use std::fmt;
use std::str::FromStr;

/// A parsed URL. Values are never mutated; [`Url::resolve`] and the `with_*`
/// methods return new instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Url {
    scheme: String,
    netloc: Option<String>,
    path: String,
    params: String,
    query: String,
    fragment: String,
}

impl Url {
    /// Parses `input` into its components.
    ///
    /// Splitting never fails on its own. When the string carries an authority
    /// it is also checked by the WHATWG parser, and a rejection there (bad
    /// port, malformed host) is reported as [`UrlError::Parse`].
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let parsed = split_url(input);

        if !parsed.scheme.is_empty() && parsed.netloc.as_deref().is_some_and(|n| !n.is_empty()) {
            url::Url::parse(input).map_err(|e| UrlError::parse(input, e))?;
        }

        Ok(parsed)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The authority (`host[:port]`), empty when the URL has none.
    pub fn netloc(&self) -> &str {
        self.netloc.as_deref().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The network host: the authority when present, otherwise the first path
    /// segment (for URLs typed without `//`).
    pub fn host(&self) -> &str {
        match self.netloc.as_deref() {
            Some(netloc) if !netloc.is_empty() => netloc,
            _ => self.path.split('/').next().unwrap_or_default(),
        }
    }

    pub fn with_scheme(&self, scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            ..self.clone()
        }
    }

    /// Joins `segments` onto the path and merges `query` into the query string.
    ///
    /// A segment starting with `/` discards everything before it; other
    /// segments are appended with a single `/`. Keys in `query` replace
    /// same-named existing keys in place and new keys are appended after the
    /// existing ones.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S], query: Option<&QueryParams>) -> Self {
        let path = join_path(&self.path, segments);

        let mut merged = self.parse_query();
        if let Some(query) = query {
            merged.merge(query);
        }

        Self {
            scheme: self.scheme.clone(),
            netloc: self.netloc.clone(),
            path,
            params: self.params.clone(),
            query: merged.encode(),
            fragment: self.fragment.clone(),
        }
    }

    /// Decodes the query string. A key may repeat; an empty query yields an
    /// empty mapping.
    pub fn parse_query(&self) -> QueryParams {
        if self.query.is_empty() {
            QueryParams::new()
        } else {
            QueryParams::parse(&self.query)
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if let Some(netloc) = &self.netloc {
            write!(f, "//{netloc}")?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.params.is_empty() {
            write!(f, ";{}", self.params)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

impl FromStr for Url {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
    }
}

/// Extracts the host from a URL string: the authority when present, otherwise
/// the first path segment (`example.com/path`, `https:example.com/path` or
/// `localhost:9000`).
pub fn parse_host(url: &str) -> String {
    split_url(url).host().to_string()
}

/// Splits a URL into components without validating any of them.
pub(crate) fn split_url(input: &str) -> Url {
    let mut rest = input;

    let scheme = match rest.split_once(':') {
        Some((candidate, after)) if is_scheme(candidate) && !starts_with_port(after) => {
            rest = after;
            candidate.to_ascii_lowercase()
        }
        _ => String::new(),
    };

    let netloc = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            rest = &after[end..];
            Some(after[..end].to_string())
        }
        None => None,
    };

    let (rest, fragment) = match rest.split_once('#') {
        Some((before, fragment)) => (before, fragment.to_string()),
        None => (rest, String::new()),
    };

    let (rest, query) = match rest.split_once('?') {
        Some((before, query)) => (before, query.to_string()),
        None => (rest, String::new()),
    };

    // Params hang off the last path segment only.
    let last_segment = rest.rfind('/').map_or(0, |i| i + 1);
    let (path, params) = match rest[last_segment..].find(';') {
        Some(i) => {
            let split = last_segment + i;
            (rest[..split].to_string(), rest[split + 1..].to_string())
        }
        None => (rest.to_string(), String::new()),
    };

    Url {
        scheme,
        netloc,
        path,
        params,
        query,
        fragment,
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// `host:port` rather than `scheme:path`: digits up to the end of the
/// authority-like part.
fn starts_with_port(after_colon: &str) -> bool {
    let end = after_colon.find(['/', '?', '#']).unwrap_or(after_colon.len());
    let port = &after_colon[..end];
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
}

/// POSIX path join over a list of segments.
pub(crate) fn join_path<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut path = base.to_string();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.starts_with('/') {
            path = segment.to_string();
        } else if path.is_empty() || path.ends_with('/') {
            path.push_str(segment);
        } else {
            path.push('/');
            path.push_str(segment);
        }
    }
    path
}
