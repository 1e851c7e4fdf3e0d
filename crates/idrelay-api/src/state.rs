// SPDX-License-Identifier: BUSL-1.1
//! Shared application state.

use std::sync::Arc;

use idrelay_client::{DecodeApiError, DecodeClient};

use crate::config::AppConfig;

/// Per-process state handed to every handler.
///
/// Cheap to clone: the config sits behind an `Arc` and `DecodeClient` wraps
/// a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: DecodeClient,
}

impl AppState {
    /// Build the state, including the outbound HTTP client.
    pub fn new(config: AppConfig) -> Result<Self, DecodeApiError> {
        let client = DecodeClient::new(config.client_config())?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}
