// SPDX-License-Identifier: BUSL-1.1
//! # idrelay-api: Identity Decode Relay Service
//!
//! Accepts a caller's `request_id`, forwards it to the remote decoding
//! service as a signed form, and returns the decrypted identity document.
//!
//! ## API Surface
//!
//! | Route | Module | Purpose |
//! |-------|--------|---------|
//! | `POST <router>` (configured) | [`routes::decode`] | relay + decrypt |
//! | `GET /health/liveness` | here | process liveness |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Inbound bodies are a single short form field.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let route = state.config.route.clone();

    let api = routes::decode::router(&route).layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}
