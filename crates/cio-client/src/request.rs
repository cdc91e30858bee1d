//! Request descriptors.
//!
//! A [`RequestDescriptor`] captures everything needed to sign and send one
//! API call: method, path template, resolved path, encoded parameters, and
//! the shape the response body is expected to have. Descriptors are built
//! by the per-resource functions in [`crate::api`] and are immutable once
//! built; the `with_*` methods consume the descriptor and return a new one.

use std::fmt;

use crate::oauth::{percent_encode, percent_encode_path};
use crate::params::{EncodeParams, Params};

/// API version prefix shared by every path.
pub const API_VERSION: &str = "2.0";

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name, as it appears in the signature base string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether request parameters travel in the query string.
    pub fn params_in_query(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the caller should interpret the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A single JSON object.
    Dictionary,
    /// A JSON array of objects.
    Array,
    /// An opaque string (download URL, raw headers).
    String,
    /// Raw bytes (file content, RFC-822 message source).
    Raw,
}

/// A fully-resolved, unsigned API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    path_template: &'static str,
    path: String,
    params: Params,
    shape: ResponseShape,
    unverified: bool,
}

impl RequestDescriptor {
    /// Build a descriptor from an already-resolved path.
    pub fn new(
        method: HttpMethod,
        path_template: &'static str,
        path: impl Into<String>,
        shape: ResponseShape,
    ) -> Self {
        Self {
            method,
            path_template,
            path: path.into(),
            params: Params::new(),
            shape,
            unverified: false,
        }
    }

    /// Build a descriptor by substituting `segments` into `path_template`.
    ///
    /// Placeholders are `{name}` and are filled in order. A placeholder named
    /// `{folder}` keeps `/` as the hierarchy delimiter; every other segment
    /// is escaped completely.
    pub fn from_template(
        method: HttpMethod,
        path_template: &'static str,
        segments: &[&str],
        shape: ResponseShape,
    ) -> Self {
        let path = resolve_path(path_template, segments);
        Self::new(method, path_template, path, shape)
    }

    /// Attach the encoded form of a typed parameter set.
    pub fn with_params(mut self, params: &impl EncodeParams) -> Self {
        params.encode_into(&mut self.params);
        self
    }

    /// Add a single parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Merge free-form parameters not covered by a typed parameter set.
    /// Keys already present are overridden.
    pub fn with_extra_params<K, V, I>(mut self, extra: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.params.extend(extra);
        self
    }

    /// Flag the operation as having an unconfirmed wire contract.
    pub(crate) fn unverified(mut self) -> Self {
        self.unverified = true;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Template the path was resolved from, e.g.
    /// `2.0/accounts/{account_id}/messages/{message_id}`.
    pub fn path_template(&self) -> &'static str {
        self.path_template
    }

    /// Resolved, percent-encoded path relative to the API base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn shape(&self) -> ResponseShape {
        self.shape
    }

    /// True for operations whose signing has known problems upstream and
    /// which need targeted integration testing.
    pub fn is_unverified(&self) -> bool {
        self.unverified
    }
}

/// Substitute encoded segments into a `{placeholder}` template.
///
/// Extra placeholders with no matching segment are left as-is; surplus
/// segments are ignored.
pub fn resolve_path(template: &str, segments: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    let mut values = segments.iter();

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + close];
        out.push_str(&rest[..open]);
        match values.next() {
            Some(value) if name == "folder" => out.push_str(&percent_encode_path(value)),
            Some(value) => out.push_str(&percent_encode(value)),
            None => out.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
