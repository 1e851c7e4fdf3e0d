// SPDX-License-Identifier: BUSL-1.1
//! # Service Configuration
//!
//! Loaded once at startup from a TOML file and then shared read-only through
//! [`AppState`](crate::state::AppState). Keys keep the names deployments
//! already use:
//!
//! ```toml
//! server = "https://decode.example.com/openapi/decode"
//! port = ":8080"
//! router = "/decode"
//! app_id = "app-001"
//! app_key = "shared-secret"
//! timeout_secs = 30   # optional
//! ```
//!
//! `IDRELAY_APP_KEY`, when set, replaces `app_key` so the secret can stay
//! out of the file.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use idrelay_client::config::DEFAULT_TIMEOUT_SECS;
use idrelay_client::DecodeClientConfig;

/// Environment variable overriding `app_key`.
pub const APP_KEY_ENV: &str = "IDRELAY_APP_KEY";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: String,
    port: String,
    router: String,
    app_id: String,
    app_key: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Immutable process-wide configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Decoding service endpoint.
    pub endpoint: Url,
    /// Socket address to bind, normalized to `host:port`.
    pub listen_addr: String,
    /// Inbound route path, starting with `/`.
    pub route: String,
    pub app_id: String,
    /// Shared signing secret.
    pub app_key: Zeroizing<String>,
    /// Outbound request timeout.
    pub timeout_secs: u64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("listen_addr", &self.listen_addr)
            .field("route", &self.route)
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl AppConfig {
    /// Read and validate a TOML config file, then apply the env override.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        if let Ok(key) = std::env::var(APP_KEY_ENV) {
            config = config.with_app_key(key)?;
        }
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let endpoint = Url::parse(&file.server).map_err(|e| ConfigError::Invalid {
            field: "server",
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "server",
                reason: format!("unsupported scheme `{}`", endpoint.scheme()),
            });
        }

        let listen_addr = normalize_listen_addr(&file.port)?;

        if !file.router.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "router",
                reason: format!("route `{}` must start with `/`", file.router),
            });
        }
        if file.app_id.is_empty() {
            return Err(ConfigError::Invalid {
                field: "app_id",
                reason: "must not be empty".into(),
            });
        }

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }

        Self {
            endpoint,
            listen_addr,
            route: file.router,
            app_id: file.app_id,
            app_key: Zeroizing::new(String::new()),
            timeout_secs,
        }
        .with_app_key(file.app_key)
    }

    /// Replace the signing secret.
    pub fn with_app_key(mut self, key: String) -> Result<Self, ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "app_key",
                reason: "must not be empty".into(),
            });
        }
        self.app_key = Zeroizing::new(key);
        Ok(self)
    }

    /// Client settings for the decoding service.
    pub fn client_config(&self) -> DecodeClientConfig {
        DecodeClientConfig::new(self.endpoint.clone()).with_timeout_secs(self.timeout_secs)
    }
}

/// Accept `":8080"` (all interfaces) or `host:port`.
fn normalize_listen_addr(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let addr = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };

    let port_ok = addr
        .rsplit_once(':')
        .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
        .unwrap_or(false);
    if !port_ok {
        return Err(ConfigError::Invalid {
            field: "port",
            reason: format!("`{raw}` is not `:port` or `host:port`"),
        });
    }
    Ok(addr)
}
