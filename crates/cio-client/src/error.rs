//! Error types for cio-client.
//!
//! All client operations return [`Result<T>`] which uses [`ClientError`]
//! as the error type. Parameter values are never validated locally, so a
//! malformed parameter only ever shows up as [`ClientError::Server`].

use thiserror::Error;

/// Errors that can occur while building, signing, or executing a request.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// A credential required to sign or scope the request is missing
    /// (consumer key/secret, or the account id for account-scoped calls).
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The transport failed before an HTTP status was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("timeout")]
    Timeout,

    /// An auth-completion response was malformed or rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The API answered with a non-2xx status.
    #[error("server error: HTTP {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },

    /// The response body did not match the expected response shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A URL could not be parsed or assembled.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The credential store could not save, load, or clear credentials.
    #[error("credential store error: {0}")]
    Store(String),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Server`] error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the OAuth signature or token (401/403).
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// A convenience type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credentials() {
        let err = ClientError::MissingCredentials("consumer key".into());
        assert_eq!(err.to_string(), "missing credentials: consumer key");
    }

    #[test]
    fn display_server_error() {
        let err = ClientError::Server {
            status: 404,
            body: "no such message".into(),
        };
        assert_eq!(err.to_string(), "server error: HTTP 404: no such message");
    }

    #[test]
    fn display_timeout() {
        assert_eq!(ClientError::Timeout.to_string(), "timeout");
    }

    #[test]
    fn status_only_for_server_errors() {
        let server = ClientError::Server {
            status: 503,
            body: String::new(),
        };
        assert_eq!(server.status(), Some(503));
        assert_eq!(ClientError::Timeout.status(), None);
    }

    #[test]
    fn auth_rejected_on_401_and_403() {
        for status in [401, 403] {
            let err = ClientError::Server {
                status,
                body: "bad signature".into(),
            };
            assert!(err.is_auth_rejected());
        }
        let err = ClientError::Server {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_auth_rejected());
    }

    #[test]
    fn json_error_from_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = serde_err.into();
        assert!(err.to_string().starts_with("json error:"));
    }
}
