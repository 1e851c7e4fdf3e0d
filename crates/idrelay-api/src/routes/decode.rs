// SPDX-License-Identifier: BUSL-1.1
//! # Decode Route
//!
//! `POST <router>` with form field `request_id`, sent either urlencoded or
//! as `multipart/form-data`. On success the body is the decrypted identity
//! document, served as `application/json` byte for byte as the decoding
//! service encrypted it.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use serde::Deserialize;

use crate::error::RelayError;
use crate::pipeline;
use crate::state::AppState;

/// Build the decode router at `route`.
pub fn router(route: &str) -> Router<AppState> {
    Router::new().route(route, post(decode))
}

/// Inbound form.
#[derive(Debug, Default, Deserialize)]
pub struct DecodeForm {
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Decrypted identity document, passed through unparsed.
#[derive(Debug)]
pub struct DecodedIdentity(pub Vec<u8>);

impl IntoResponse for DecodedIdentity {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.0,
        )
            .into_response()
    }
}

/// POST <router>: relay one identity decode request.
///
/// A missing or unreadable form counts as an empty `request_id`.
async fn decode(
    State(state): State<AppState>,
    request: Request,
) -> Result<DecodedIdentity, RelayError> {
    let request_id = read_request_id(request).await;

    pipeline::relay(&state, &request_id)
        .await
        .map(DecodedIdentity)
}

/// Pull `request_id` out of a urlencoded or multipart body.
async fn read_request_id(request: Request) -> String {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"));

    if is_multipart {
        return match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart_request_id(multipart).await,
            Err(rejection) => {
                tracing::debug!(%rejection, "inbound multipart form not readable");
                String::new()
            }
        };
    }

    match Form::<DecodeForm>::from_request(request, &()).await {
        Ok(Form(form)) => form.request_id.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(%rejection, "inbound form not readable");
            String::new()
        }
    }
}

/// First `request_id` part wins; a broken stream ends the search.
async fn multipart_request_id(mut multipart: Multipart) -> String {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("request_id") => {
                return field.text().await.unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "request_id part not readable");
                    String::new()
                });
            }
            Ok(Some(_)) => continue,
            Ok(None) => return String::new(),
            Err(e) => {
                tracing::debug!(error = %e, "inbound multipart form not readable");
                return String::new();
            }
        }
    }
}
