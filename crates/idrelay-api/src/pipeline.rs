// SPDX-License-Identifier: BUSL-1.1
//! # Relay Pipeline
//!
//! One inbound request runs through five stages, each a terminal failure
//! point:
//!
//! 1. Validate: `request_id` must be non-empty.
//! 2. Prepare: fresh [`EncryptFactor`], then sign `app_id`, `request_id`,
//!    `encrypt_factor` with the shared secret.
//! 3. Invoke: one POST to the decoding service, no retry.
//! 4. Interpret: transport code, then business `sub_code` / `info`.
//! 5. Decrypt: base64 + DES-CBC under the factor from stage 2.
//!
//! Nothing survives the call; the factor and signed request are dropped on
//! return.

use std::collections::BTreeMap;

use idrelay_client::EnvelopeStatus;
use idrelay_crypto::{decrypt_info, EncryptFactor, SignError, SignedRequest};

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::state::AppState;

/// Assemble and sign the outbound parameter set.
pub fn prepare(
    config: &AppConfig,
    request_id: &str,
    factor: &EncryptFactor,
) -> Result<SignedRequest, SignError> {
    let params = BTreeMap::from([
        ("app_id".to_string(), config.app_id.clone()),
        ("request_id".to_string(), request_id.to_string()),
        ("encrypt_factor".to_string(), factor.as_str().to_string()),
    ]);
    SignedRequest::sign(params, config.app_key.as_str())
}

/// Run the full relay for one `request_id`, returning the decrypted payload.
pub async fn relay(state: &AppState, request_id: &str) -> Result<Vec<u8>, RelayError> {
    if request_id.is_empty() {
        return Err(RelayError::Validation);
    }
    tracing::info!(request_id, "decode request received");

    let factor = EncryptFactor::generate();
    let request = prepare(&state.config, request_id, &factor)?;

    let envelope = state.client.invoke(&request).await?;

    let info = match envelope.status()? {
        EnvelopeStatus::Rejected { code, msg } => {
            return Err(RelayError::Rejected {
                code,
                msg: msg.unwrap_or_default(),
            });
        }
        EnvelopeStatus::Declined { sub_code, sub_msg } => {
            return Err(RelayError::Declined {
                sub_code,
                sub_msg: sub_msg.unwrap_or_default(),
            });
        }
        EnvelopeStatus::Accepted { info } => info,
    };

    let plaintext = decrypt_info(&info, &factor)?;
    tracing::info!(
        request_id,
        bytes = plaintext.len(),
        "identity payload decrypted"
    );
    Ok(plaintext)
}
