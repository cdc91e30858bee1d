//! Client configuration.
//!
//! [`ClientConfig`] describes where the API lives and how to reach it. The
//! consumer key and secret are never stored in the config itself: it holds
//! the names of the environment variables that carry them.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{ClientError, Result};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.context.io";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for a [`CioClient`](crate::client::CioClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without the `2.0/` version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Defaults to 60.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the consumer key.
    #[serde(default = "default_consumer_key_env")]
    pub consumer_key_env: String,

    /// Environment variable holding the consumer secret.
    #[serde(default = "default_consumer_secret_env")]
    pub consumer_secret_env: String,

    /// Directory for saved credentials. Defaults to `~/.cio/credentials`.
    #[serde(default)]
    pub credentials_dir: Option<PathBuf>,

    /// `User-Agent` sent by the default transport.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_consumer_key_env() -> String {
    "CIO_CONSUMER_KEY".to_string()
}

fn default_consumer_secret_env() -> String {
    "CIO_CONSUMER_SECRET".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            consumer_key_env: default_consumer_key_env(),
            consumer_secret_env: default_consumer_secret_env(),
            credentials_dir: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Effective `User-Agent`.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("cio-client/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Effective credential directory.
    pub fn credentials_dir(&self) -> PathBuf {
        self.credentials_dir
            .clone()
            .unwrap_or_else(crate::store::default_credentials_dir)
    }

    /// Read the consumer key and secret from the configured env vars.
    pub fn consumer_credentials(&self) -> Result<Credentials> {
        let key = read_env(&self.consumer_key_env)?;
        let secret = read_env(&self.consumer_secret_env)?;
        Ok(Credentials::new(key, secret))
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::MissingCredentials(format!(
            "set {name} env var"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.context.io");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.consumer_key_env, "CIO_CONSUMER_KEY");
        assert_eq!(config.consumer_secret_env, "CIO_CONSUMER_SECRET");
        assert!(config.user_agent().starts_with("cio-client/"));
    }

    #[test]
    fn deserialize_minimal() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn deserialize_overrides() {
        let json = r#"{
            "base_url": "http://localhost:8080",
            "timeout_secs": 5,
            "consumer_key_env": "MY_KEY",
            "credentials_dir": "/tmp/cio"
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.consumer_key_env, "MY_KEY");
        assert_eq!(config.consumer_secret_env, "CIO_CONSUMER_SECRET");
        assert_eq!(config.credentials_dir, Some(PathBuf::from("/tmp/cio")));
        assert_eq!(config.credentials_dir(), PathBuf::from("/tmp/cio"));
    }

    #[test]
    fn credentials_dir_defaults_under_home() {
        let dir = ClientConfig::default().credentials_dir();
        assert!(dir.ends_with(".cio/credentials"));
    }

    #[test]
    fn consumer_credentials_from_env() {
        let config = ClientConfig {
            consumer_key_env: "CIO_TEST_CONSUMER_KEY_31337".into(),
            consumer_secret_env: "CIO_TEST_CONSUMER_SECRET_31337".into(),
            ..ClientConfig::default()
        };
        unsafe {
            std::env::set_var("CIO_TEST_CONSUMER_KEY_31337", "ck");
            std::env::set_var("CIO_TEST_CONSUMER_SECRET_31337", "cs");
        }
        let creds = config.consumer_credentials().unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.consumer_secret, "cs");
        unsafe {
            std::env::remove_var("CIO_TEST_CONSUMER_KEY_31337");
            std::env::remove_var("CIO_TEST_CONSUMER_SECRET_31337");
        }
    }

    #[test]
    fn consumer_credentials_missing() {
        let config = ClientConfig {
            consumer_key_env: "CIO_NONEXISTENT_KEY_98765".into(),
            ..ClientConfig::default()
        };
        let err = config.consumer_credentials().unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials(_)));
        assert!(err.to_string().contains("CIO_NONEXISTENT_KEY_98765"));
    }
}
