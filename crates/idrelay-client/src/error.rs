// SPDX-License-Identifier: BUSL-1.1
//! Decoding service client error types.

/// Errors from calling the decoding service.
#[derive(Debug, thiserror::Error)]
pub enum DecodeApiError {
    /// HTTP transport error (connect, TLS, body read).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {endpoint} timed out after {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// Decoding service returned a non-2xx status.
    #[error("decode service {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body is not a JSON envelope.
    #[error("failed to deserialize response from {endpoint}: {source} (body: {body})")]
    Deserialization {
        endpoint: String,
        body: String,
        source: serde_json::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl DecodeApiError {
    /// Whether the failure happened before a usable reply was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout { .. } | Self::ApiError { .. }
        )
    }
}
