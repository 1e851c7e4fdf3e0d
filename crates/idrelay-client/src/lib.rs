// SPDX-License-Identifier: BUSL-1.1
//! # idrelay-client: Typed client for the remote decoding service
//!
//! Submits a [`SignedRequest`](idrelay_crypto::SignedRequest) as an
//! `application/x-www-form-urlencoded` POST and parses the JSON reply into a
//! [`RemoteEnvelope`].
//!
//! ## Envelope
//!
//! The service answers in two levels:
//!
//! ```text
//! { "code": "10000", "msg": "...", "data": { "info": "<b64>" } }        accepted
//! { "code": "10000", "data": { "sub_code": "X1", "sub_msg": "..." } }  declined
//! { "code": "20000", "msg": "invalid app" }                            rejected
//! ```
//!
//! [`RemoteEnvelope::status`] folds that into [`EnvelopeStatus`]. This crate
//! does not decide what a decline means for the caller, and never decrypts.
//!
//! ## Timeout & Retry
//!
//! Every request is bounded by [`DecodeClientConfig::timeout_secs`]. There
//! is no retry: one inbound call maps to at most one outbound call.

pub mod config;
pub mod envelope;
pub mod error;

pub use config::{ConfigError, DecodeClientConfig};
pub use envelope::{BusinessResult, EnvelopeError, EnvelopeStatus, RemoteEnvelope, SUCCESS_CODE};
pub use error::DecodeApiError;

use std::time::Duration;

use idrelay_crypto::SignedRequest;

/// HTTP client for the decoding service endpoint.
#[derive(Debug, Clone)]
pub struct DecodeClient {
    http: reqwest::Client,
    endpoint: url::Url,
    timeout_secs: u64,
}

impl DecodeClient {
    /// Create a new client from configuration.
    pub fn new(config: DecodeClientConfig) -> Result<Self, DecodeApiError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DecodeApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// POST the signed form and parse the reply envelope.
    ///
    /// Errors are transport-level only (`Http`, `Timeout`, `ApiError`) or
    /// `Deserialization`. A well-formed envelope carrying a failure code is
    /// returned as `Ok`.
    pub async fn invoke(&self, request: &SignedRequest) -> Result<RemoteEnvelope, DecodeApiError> {
        let endpoint = self.endpoint.as_str();
        let form: Vec<(&str, &str)> = request.iter().collect();

        tracing::debug!(
            endpoint,
            request_id = request.get("request_id").unwrap_or_default(),
            encrypt_factor = request.get("encrypt_factor").unwrap_or_default(),
            sign = request.sign_value(),
            "posting signed decode request"
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DecodeApiError::ApiError {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body: truncate(&body, 512),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let envelope: RemoteEnvelope =
            serde_json::from_slice(&body).map_err(|e| DecodeApiError::Deserialization {
                endpoint: endpoint.into(),
                body: truncate(&String::from_utf8_lossy(&body), 512),
                source: e,
            })?;

        tracing::debug!(
            endpoint,
            code = %envelope.code,
            msg = envelope.msg.as_deref().unwrap_or_default(),
            has_data = envelope.data.is_some(),
            "decode service replied"
        );
        Ok(envelope)
    }

    fn transport_error(&self, e: reqwest::Error) -> DecodeApiError {
        if e.is_timeout() {
            DecodeApiError::Timeout {
                endpoint: self.endpoint.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            DecodeApiError::Http {
                endpoint: self.endpoint.to_string(),
                source: e,
            }
        }
    }
}

/// Cut `s` to at most `max` bytes on a char boundary, for log excerpts.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
