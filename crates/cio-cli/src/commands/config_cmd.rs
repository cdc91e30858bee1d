//! `cio config` -- display resolved configuration.
//!
//! # Examples
//!
//! ```text
//! cio config show
//! cio config path
//! ```

use cio_client::ClientConfig;

/// Display the resolved configuration as formatted JSON.
pub fn config_show(config: &ClientConfig) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }
}

/// Show which config file would be loaded, and where credentials live.
pub fn config_path(config: &ClientConfig) {
    match super::discover_config_path() {
        Some(path) => println!("config:      {}", path.display()),
        None => println!("config:      (none, using defaults)"),
    }
    println!("credentials: {}", config.credentials_dir().display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_show_does_not_panic() {
        config_show(&ClientConfig::default());
    }

    #[test]
    fn config_path_does_not_panic() {
        config_path(&ClientConfig::default());
    }
}
