// SPDX-License-Identifier: BUSL-1.1
//! Decoding service client configuration.

use url::Url;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how long to talk to the decoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeClientConfig {
    /// Full URL of the decode endpoint (the form is POSTed here as-is).
    pub endpoint: Url,
    /// Request timeout in seconds, covering connect through body read.
    pub timeout_secs: u64,
}

impl DecodeClientConfig {
    /// Configuration with the default timeout.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Parse `endpoint` and build a configuration with the default timeout.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidUrl(endpoint.to_string(), e.to_string()))?;
        let config = Self::new(url);
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,
}
