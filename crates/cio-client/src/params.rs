//! Parameter encoding.
//!
//! Every typed parameter set in [`crate::api`] encodes itself into a
//! [`Params`] map of wire names to wire values. Fields are `Option`s and a
//! `None` field is never written: the server applies its own default for
//! anything omitted, so "unset" and "set to the zero value" stay distinct.
//!
//! Encoding rules:
//!
//! - booleans become `"1"` / `"0"`
//! - integers become decimal strings
//! - lists are comma-joined in caller order
//! - timestamps become Unix seconds
//! - strings pass through verbatim (no regex/literal checks on `subject`)

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Ordered mapping of parameter names to encoded values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unconditionally, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert a string field if set.
    pub fn opt_str(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    /// Insert a boolean field as `"1"`/`"0"` if set.
    pub fn opt_bool(&mut self, key: &str, value: Option<bool>) {
        if let Some(v) = value {
            self.insert(key, encode_bool(v));
        }
    }

    /// Insert an integer field as a decimal string if set.
    pub fn opt_int<T: fmt::Display>(&mut self, key: &str, value: Option<T>) {
        if let Some(v) = value {
            self.insert(key, v.to_string());
        }
    }

    /// Insert a comma-joined list if set. An empty list is still sent.
    pub fn opt_list<S: AsRef<str>>(&mut self, key: &str, value: Option<&[S]>) {
        if let Some(items) = value {
            self.insert(key, join_list(items));
        }
    }

    /// Insert a timestamp as Unix seconds if set.
    pub fn opt_time(&mut self, key: &str, value: Option<DateTime<Utc>>) {
        if let Some(v) = value {
            self.insert(key, v.timestamp().to_string());
        }
    }

    /// Insert an enumerated field by its wire token if set.
    pub fn opt_token<T: WireToken>(&mut self, key: &str, value: Option<T>) {
        if let Some(v) = value {
            self.insert(key, v.wire_token());
        }
    }

    /// Merge free-form parameters, overriding keys already present.
    pub fn extend<K, V, I>(&mut self, iter: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }

    /// Look up an encoded value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl From<BTreeMap<String, String>> for Params {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A typed parameter set that knows its wire encoding.
pub trait EncodeParams {
    /// Write every explicitly-set field into `params`.
    fn encode_into(&self, params: &mut Params);

    /// Encode into a fresh map.
    fn encode(&self) -> Params {
        let mut params = Params::new();
        self.encode_into(&mut params);
        params
    }
}

impl EncodeParams for Params {
    fn encode_into(&self, params: &mut Params) {
        params.extend(self.iter());
    }
}

impl EncodeParams for BTreeMap<String, String> {
    fn encode_into(&self, params: &mut Params) {
        params.extend(self.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
}

/// An enumerated parameter value with a fixed wire token.
pub trait WireToken {
    fn wire_token(&self) -> &'static str;
}

/// Encode a boolean as the API expects it.
pub fn encode_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Decode a boolean previously written by [`encode_bool`].
///
/// Returns `None` for anything other than `"1"` or `"0"`.
pub fn parse_bool_param(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Comma-join list items, preserving order.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Result ordering for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl WireToken for SortOrder {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// How message headers are included in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeHeaders {
    /// Headers omitted (`0`).
    No,
    /// Headers parsed into an array (`1`).
    Parsed,
    /// Headers as one raw unparsed string (`raw`).
    Raw,
}

impl WireToken for IncludeHeaders {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::No => "0",
            Self::Parsed => "1",
            Self::Raw => "raw",
        }
    }
}
