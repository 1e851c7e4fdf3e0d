// SPDX-License-Identifier: BUSL-1.1
//! Route handlers for the decoding service stub.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use idrelay_crypto::{encrypt_info, SignedRequest, FACTOR_LEN};

use crate::store::RecordStore;

/// Transport-level success.
pub const CODE_SUCCESS: &str = "10000";
/// Caller not authenticated or form unusable.
pub const CODE_REJECTED: &str = "20000";
/// Business-level decline: no record for the `request_id`.
pub const SUB_CODE_NOT_FOUND: &str = "40004";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct StubState {
    app_id: Arc<str>,
    app_key: Arc<str>,
    store: RecordStore,
}

impl StubState {
    pub fn new(app_id: &str, app_key: &str, store: RecordStore) -> Self {
        Self {
            app_id: Arc::from(app_id),
            app_key: Arc::from(app_key),
            store,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}

/// Build the stub router.
pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/decode", post(decode))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn rejected(msg: &str) -> Json<Value> {
    Json(json!({ "code": CODE_REJECTED, "msg": msg }))
}

async fn decode(
    State(state): State<StubState>,
    form: Result<Form<BTreeMap<String, String>>, FormRejection>,
) -> Json<Value> {
    let Ok(Form(form)) = form else {
        return rejected("invalid form");
    };
    let Some(request) = SignedRequest::from_form(form) else {
        return rejected("missing sign");
    };

    if request.get("app_id") != Some(&*state.app_id) {
        tracing::warn!(app_id = ?request.get("app_id"), "unknown app_id");
        return rejected("invalid app_id");
    }
    if !request.verify(&state.app_key) {
        tracing::warn!("signature mismatch");
        return rejected("invalid sign");
    }

    let factor = request.get("encrypt_factor").unwrap_or_default();
    if factor.len() != FACTOR_LEN {
        return rejected("invalid encrypt_factor");
    }
    let request_id = request.get("request_id").unwrap_or_default();

    let Some(record) = state.store.get(request_id) else {
        tracing::info!(request_id, "no record for request_id");
        return Json(json!({
            "code": CODE_SUCCESS,
            "msg": "success",
            "data": { "sub_code": SUB_CODE_NOT_FOUND, "sub_msg": "request_id not found" }
        }));
    };

    match encrypt_info(&record, factor.as_bytes()) {
        Ok(info) => {
            tracing::info!(request_id, "record served");
            Json(json!({
                "code": CODE_SUCCESS,
                "msg": "success",
                "data": { "info": info }
            }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "encrypting record failed");
            rejected("invalid encrypt_factor")
        }
    }
}
