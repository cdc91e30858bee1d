//! HTTP transport and response interpretation.
//!
//! A [`Transport`] takes a [`SignedRequest`] and returns the raw status,
//! headers, and body. It must produce exactly one result per request and
//! must not replay a signed request: a retry goes back through the signer.
//! [`ReqwestTransport`] is the default implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::oauth::SignedRequest;
use crate::request::{HttpMethod, ResponseShape};

/// Status, headers, and body of an HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8, replacing invalid sequences.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into [`ClientError::Server`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Server {
                status: self.status,
                body: self.text_lossy(),
            })
        }
    }
}

/// Executes signed requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse>;
}

/// Transport backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport with the given timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http, timeout })
    }

    /// Build a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.timeout(), &config.user_agent())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse> {
        let mut builder = self
            .http
            .request(to_reqwest_method(request.method()), request.url().clone());

        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| timeout_or(e, |e| ClientError::Transport(e.to_string())))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| timeout_or(e, ClientError::Http))?
            .to_vec();

        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// The client timeout covers the body too, so both the send and the body
/// read report it as [`ClientError::Timeout`].
fn timeout_or(
    err: reqwest::Error,
    other: impl FnOnce(reqwest::Error) -> ClientError,
) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        other(err)
    }
}

/// A response body interpreted according to its [`ResponseShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Dictionary(Map<String, Value>),
    Array(Vec<Value>),
    String(String),
    Raw(Vec<u8>),
}

impl ApiResponse {
    /// Interpret a successful body.
    pub fn from_body(shape: ResponseShape, body: Vec<u8>) -> Result<Self> {
        match shape {
            ResponseShape::Dictionary => match serde_json::from_slice::<Value>(&body)? {
                Value::Object(map) => Ok(Self::Dictionary(map)),
                other => Err(ClientError::InvalidResponse(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                ))),
            },
            ResponseShape::Array => match serde_json::from_slice::<Value>(&body)? {
                Value::Array(items) => Ok(Self::Array(items)),
                other => Err(ClientError::InvalidResponse(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                ))),
            },
            ResponseShape::String => String::from_utf8(body)
                .map(Self::String)
                .map_err(|e| ClientError::InvalidResponse(format!("body is not UTF-8: {e}"))),
            ResponseShape::Raw => Ok(Self::Raw(body)),
        }
    }

    pub fn as_dictionary(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Convert to a JSON value. Raw bytes become a lossy UTF-8 string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Dictionary(map) => Value::Object(map),
            Self::Array(items) => Value::Array(items),
            Self::String(s) => Value::String(s),
            Self::Raw(bytes) => {
                warn!(bytes = bytes.len(), "converting raw body to a string value");
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn success_range() {
        assert!(raw(200, "").is_success());
        assert!(raw(204, "").is_success());
        assert!(!raw(301, "").is_success());
        assert!(!raw(404, "").is_success());
    }

    #[test]
    fn error_for_status_keeps_body() {
        let err = raw(400, "{\"type\":\"error\",\"value\":\"bad limit\"}")
            .error_for_status()
            .unwrap_err();
        match err {
            ClientError::Server { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad limit"));
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[test]
    fn dictionary_shape() {
        let resp = ApiResponse::from_body(ResponseShape::Dictionary, br#"{"id":"a"}"#.to_vec())
            .unwrap();
        assert_eq!(resp.as_dictionary().unwrap()["id"], "a");
    }

    #[test]
    fn dictionary_shape_rejects_array() {
        let err = ApiResponse::from_body(ResponseShape::Dictionary, b"[]".to_vec()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn array_shape() {
        let resp = ApiResponse::from_body(ResponseShape::Array, br#"[{"a":1},{"a":2}]"#.to_vec())
            .unwrap();
        assert_eq!(resp.as_array().unwrap().len(), 2);
    }

    #[test]
    fn array_shape_rejects_malformed_json() {
        let err = ApiResponse::from_body(ResponseShape::Array, b"not json".to_vec()).unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[test]
    fn string_shape() {
        let resp = ApiResponse::from_body(
            ResponseShape::String,
            b"https://files.example.com/abc".to_vec(),
        )
        .unwrap();
        assert_eq!(resp.as_str(), Some("https://files.example.com/abc"));
    }

    #[test]
    fn raw_shape_keeps_bytes() {
        let bytes = vec![0u8, 159, 146, 150];
        let resp = ApiResponse::from_body(ResponseShape::Raw, bytes.clone()).unwrap();
        assert_eq!(resp.as_bytes(), Some(&bytes[..]));
    }

    #[test]
    fn reqwest_transport_timeout() {
        let transport = ReqwestTransport::from_config(&ClientConfig {
            timeout_secs: Some(7),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(7));
    }
}
