// SPDX-License-Identifier: BUSL-1.1
//! # Relay Error Types
//!
//! Every stage of the relay pipeline fails into [`RelayError`]. The
//! `IntoResponse` impl logs the full error server-side and returns only a
//! coarse body token to the caller:
//!
//! | Kind | Body |
//! |------|------|
//! | `Validation` | `no request id` |
//! | everything else | `failed` |
//!
//! Callers cannot tell which stage failed. Status is always `200 OK`; the
//! body token is the contract.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use idrelay_client::{DecodeApiError, EnvelopeError};
use idrelay_crypto::{CipherError, SignError};

/// Body returned when `request_id` is missing or empty.
pub const NO_REQUEST_ID: &str = "no request id";

/// Body returned for every other failure.
pub const FAILED: &str = "failed";

/// Failure of one inbound decode request.
#[derive(Error, Debug)]
pub enum RelayError {
    /// No usable `request_id` in the inbound form.
    #[error("missing request id")]
    Validation,

    /// The signer refused the outbound parameter set.
    #[error("failed to sign outbound request: {0}")]
    Signing(#[from] SignError),

    /// The decoding service could not be reached or answered with a
    /// non-2xx status.
    #[error("decode service transport error: {0}")]
    Transport(DecodeApiError),

    /// The reply is not a usable envelope.
    #[error("malformed decode service response: {0}")]
    EnvelopeParse(String),

    /// Transport-level failure code in the envelope.
    #[error("decode service rejected request [code = {code}] [msg = {msg}]")]
    Rejected { code: String, msg: String },

    /// Transport succeeded, business outcome declined.
    #[error("decode service declined request [sub_code = {sub_code}] [sub_msg = {sub_msg}]")]
    Declined { sub_code: String, sub_msg: String },

    /// The `info` payload could not be decrypted.
    #[error("identity payload decryption failed: {0}")]
    Decryption(#[from] CipherError),
}

impl RelayError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Signing(_) => "signing",
            Self::Transport(_) => "transport",
            Self::EnvelopeParse(_) => "envelope_parse",
            Self::Rejected { .. } | Self::Declined { .. } => "business_decline",
            Self::Decryption(_) => "decryption",
        }
    }

    /// Body token shown to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation => NO_REQUEST_ID,
            _ => FAILED,
        }
    }
}

impl From<DecodeApiError> for RelayError {
    fn from(err: DecodeApiError) -> Self {
        match err {
            DecodeApiError::Deserialization { .. } => Self::EnvelopeParse(err.to_string()),
            other => Self::Transport(other),
        }
    }
}

impl From<EnvelopeError> for RelayError {
    fn from(err: EnvelopeError) -> Self {
        Self::EnvelopeParse(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match &self {
            Self::Validation => tracing::info!(kind, "rejected inbound request without request id"),
            Self::Rejected { .. } | Self::Declined { .. } => {
                tracing::warn!(kind, error = %self, "decode request declined")
            }
            _ => tracing::error!(kind, error = %self, "decode request failed"),
        }

        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
