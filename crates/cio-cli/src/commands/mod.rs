//! CLI command implementations for `cio`.
//!
//! - [`auth`] -- Connect-token handshake and saved credentials.
//! - [`request`] -- Sign or send an arbitrary API request.
//! - [`messages`] -- Typed message listing and lookup.
//! - [`config_cmd`] -- Show the resolved configuration.

pub mod auth;
pub mod config_cmd;
pub mod messages;
pub mod request;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use cio_client::{ApiResponse, CioClient, ClientConfig, FileCredentialStore, Params};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CIO_CONFIG";

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, loads from that path. Otherwise:
/// 1. `CIO_CONFIG` env var
/// 2. `~/.cio/config.json`
///
/// Returns a default `ClientConfig` if no config file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<ClientConfig> {
    let path = match config_override {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                anyhow::bail!("config file not found: {path_str}");
            }
            Some(path)
        }
        None => discover_config_path(),
    };

    match path {
        Some(path) => read_config(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(ClientConfig::default())
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: ClientConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// First existing config file in the discovery chain.
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV)
        && !env_path.is_empty()
    {
        let path = expand_home(&env_path);
        if path.exists() {
            return Some(path);
        }
    }
    let default = dirs::home_dir()?.join(".cio").join("config.json");
    default.exists().then_some(default)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Build a client from config: consumer pair from the environment, file
/// store under the configured credentials directory, saved token restored.
pub fn build_client(config: ClientConfig) -> anyhow::Result<CioClient> {
    let store = FileCredentialStore::with_dir(config.credentials_dir());
    let mut client = CioClient::from_env(config)?.with_store(Arc::new(store));
    if client.restore_credentials()? {
        tracing::debug!(account_id = ?client.account_id(), "using saved credentials");
    }
    Ok(client)
}

/// Parse repeated `key=value` arguments into parameters.
pub fn parse_params(pairs: &[String]) -> anyhow::Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got '{pair}'"))?;
        if key.is_empty() {
            anyhow::bail!("empty parameter name in '{pair}'");
        }
        params.insert(key, value);
    }
    Ok(params)
}

/// Print a response: JSON pretty-printed, strings verbatim, raw bytes to
/// `output` if given or stdout otherwise.
pub fn print_response(response: ApiResponse, output: Option<&Path>) -> anyhow::Result<()> {
    match response {
        ApiResponse::Raw(bytes) => match output {
            Some(path) => {
                std::fs::write(path, &bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("wrote {} bytes to {}", bytes.len(), path.display());
            }
            None => std::io::stdout().write_all(&bytes)?,
        },
        ApiResponse::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other.into_value())?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_tilde() {
        let expanded = expand_home("~/.cio/config.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains(".cio"));
    }

    #[test]
    fn expand_home_absolute() {
        assert_eq!(expand_home("/etc/cio.json"), PathBuf::from("/etc/cio.json"));
    }

    #[test]
    fn load_config_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url": "http://localhost:9000", "timeout_secs": 3}"#)
            .unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, Some(3));
    }

    #[test]
    fn load_config_missing_override() {
        let err = load_config(Some("/nonexistent/cio/config.json")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_config_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn parse_params_pairs() {
        let params = parse_params(&["limit=10".into(), "subject=a=b".into()]).unwrap();
        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.get("subject"), Some("a=b"));
    }

    #[test]
    fn parse_params_rejects_bad_pairs() {
        assert!(parse_params(&["novalue".into()]).is_err());
        assert!(parse_params(&["=x".into()]).is_err());
    }
}
