//! `/api/revalidate`: drop cached pages after a content change.
//!
//! The store's webhook POSTs `{_type, operation}`; every page that reads the
//! document type (see [`crate::pages::PAGE_SOURCES`]) is invalidated, and an
//! unknown type invalidates them all. `GET` invalidates one path by hand. Both
//! require the shared secret from `REVALIDATE_SECRET`.

use super::{AppState, ServerError};
use crate::config::Secrets;
use crate::pages::pages_reading;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Json, Response};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::info;

/// `{error}`-shaped failures for this endpoint.
pub struct RevalidateError(ServerError);

impl From<ServerError> for RevalidateError {
    fn from(e: ServerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for RevalidateError {
    fn into_response(self) -> Response {
        self.0.into_bare_response()
    }
}

/// The caller's secret: `secret` query parameter, else the `Authorization`
/// header with any `Bearer ` prefix removed.
fn provided_secret<'a>(
    params: &'a HashMap<String, String>,
    headers: &'a HeaderMap,
) -> Option<&'a str> {
    params
        .get("secret")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
        })
}

fn authorize(secrets: &Secrets, provided: Option<&str>) -> Result<(), ServerError> {
    let Some(expected) = secrets.revalidate_secret.as_deref() else {
        return Err(ServerError::Configuration(
            "Revalidation not configured".to_string(),
        ));
    };
    if provided != Some(expected) {
        return Err(ServerError::Unauthorized);
    }
    Ok(())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `POST`: webhook-driven invalidation.
pub async fn webhook(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, RevalidateError> {
    authorize(&state.secrets, provided_secret(&params, &headers))?;

    let body: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    let doc_type = body.get("_type").and_then(Value::as_str);
    let operation = body
        .get("operation")
        .and_then(Value::as_str)
        .filter(|op| !op.is_empty())
        .unwrap_or("unknown");

    let paths = pages_reading(doc_type);
    for path in &paths {
        let dropped = state.cache.invalidate(path);
        info!(path, dropped, "revalidated");
    }
    info!(
        doc_type = doc_type.unwrap_or("none"),
        operation,
        cache = %state.cache.stats(),
        "webhook handled"
    );

    Ok(Json(json!({
        "revalidated": true,
        "paths": paths,
        "timestamp": timestamp(),
        "type": doc_type,
        "operation": operation,
    })))
}

/// `GET`: invalidate a single path (default `/`).
pub async fn single(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, RevalidateError> {
    authorize(
        &state.secrets,
        params.get("secret").map(String::as_str),
    )?;
    let path = params
        .get("path")
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .unwrap_or("/");
    let dropped = state.cache.invalidate(path);
    info!(path, dropped, "revalidated");

    Ok(Json(json!({
        "revalidated": true,
        "path": path,
        "timestamp": timestamp(),
    })))
}
