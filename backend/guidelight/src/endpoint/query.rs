//! Ordered, multi-valued query parameters.

use url::form_urlencoded;

/// Query string parameters, keyed in insertion order.
///
/// A key may carry several values (`tag=a&tag=b`). Replacing a key keeps its
/// original position, which is what makes endpoint query merging stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw query string (without the leading `?`).
    ///
    /// Pairs with blank values, including bare keys with no `=`, are dropped.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            params.append(key, value);
        }
        params
    }

    /// Sets `key` to the single `value`, replacing any existing values in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set_all(key, vec![value.into()])
    }

    /// Sets `key` to `values`, replacing any existing values in place.
    pub fn set_all(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((key, values)),
        }
        self
    }

    /// Adds another value for `key`, keeping existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
        self
    }

    /// Overrides keys present in `other`; keys only in `self` keep their
    /// values and position, keys only in `other` are appended.
    pub fn merge(&mut self, other: &QueryParams) -> &mut Self {
        for (key, values) in &other.entries {
            self.set_all(key.clone(), values.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.position(key).map(|i| self.entries[i].1.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Form-encodes every value as its own `key=value` pair.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
