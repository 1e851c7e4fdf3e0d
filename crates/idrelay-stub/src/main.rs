// SPDX-License-Identifier: BUSL-1.1
//! Decoding service stub: standalone development server.
//!
//! Environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `STUB_PORT` | `8090` | listen port |
//! | `STUB_APP_ID` | `app-001` | the only accepted `app_id` |
//! | `STUB_APP_KEY` | `secret` | shared signing secret |
//! | `STUB_RECORDS` | unset | JSON file of `request_id -> record` |
//!
//! Storage is in-memory with no persistence.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use idrelay_stub::{router, RecordStore, StubState};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8090);
    let app_id = std::env::var("STUB_APP_ID").unwrap_or_else(|_| "app-001".to_string());
    let app_key = std::env::var("STUB_APP_KEY").unwrap_or_else(|_| "secret".to_string());

    let store = RecordStore::new();
    if let Some(path) = std::env::var_os("STUB_RECORDS").map(PathBuf::from) {
        match store.load_file(&path) {
            Ok(count) => tracing::info!(count, path = %path.display(), "records seeded"),
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::from(1);
            }
        }
    }

    let app = router(StubState::new(&app_id, &app_key, store));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%app_id, "idrelay-stub listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            return ExitCode::from(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("server error: {e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
