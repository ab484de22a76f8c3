//! `POST /api/location/share`: store a visitor's location for a travel
//! estimate.
//!
//! Public and unauthenticated, so every request is rate limited by client
//! key before the body is even parsed. Validation runs in a fixed order and
//! reports only the first failing field.

use super::{AppState, ServerError, client_key};
use crate::source::SourceError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

const MAX_PHONE_LEN: usize = 20;
const MAX_NAME_LEN: usize = 100;

/// The document written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationShare {
    #[serde(rename = "_type")]
    pub doc_type: &'static str,
    pub user_latitude: f64,
    pub user_longitude: f64,
    pub distance_km: f64,
    pub travel_time_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    pub shared_at: String,
}

fn number_in(body: &Value, field: &str, min: f64, max: f64) -> Option<f64> {
    body.get(field)
        .and_then(Value::as_f64)
        .filter(|n| (min..=max).contains(n))
}

/// Trimmed text of an optional field. Empty, null and non-scalar values
/// count as absent.
fn optional_text(body: &Value, field: &str) -> Option<String> {
    let text = match body.get(field)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Validate a request body and build the document to store.
pub fn validate(body: &Value, now: DateTime<Utc>) -> Result<LocationShare, ServerError> {
    let invalid = |msg: &str| ServerError::Validation(msg.to_string());

    let latitude = number_in(body, "latitude", -90.0, 90.0)
        .ok_or_else(|| invalid("Invalid latitude. Must be a number between -90 and 90."))?;
    let longitude = number_in(body, "longitude", -180.0, 180.0)
        .ok_or_else(|| invalid("Invalid longitude. Must be a number between -180 and 180."))?;
    let distance_km = number_in(body, "distanceKm", 0.0, f64::INFINITY)
        .ok_or_else(|| invalid("Invalid distanceKm. Must be a non-negative number."))?;
    let travel_time_minutes = number_in(body, "travelTimeMinutes", 0.0, f64::INFINITY)
        .ok_or_else(|| invalid("Invalid travelTimeMinutes. Must be a non-negative number."))?;

    let name = optional_text(body, "name");
    let phone = optional_text(body, "phone");
    if phone.as_ref().is_some_and(|p| p.chars().count() > MAX_PHONE_LEN) {
        return Err(invalid("Phone number is too long (max 20 characters)."));
    }
    if name.as_ref().is_some_and(|n| n.chars().count() > MAX_NAME_LEN) {
        return Err(invalid("Name is too long (max 100 characters)."));
    }

    Ok(LocationShare {
        doc_type: "userLocationShare",
        user_latitude: latitude,
        user_longitude: longitude,
        distance_km,
        travel_time_minutes,
        user_name: name,
        user_phone: phone,
        shared_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn share(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let client = client_key(&headers);
    if !state.limiter.try_acquire(&client) {
        warn!(%client, "location share rate limited");
        return Err(ServerError::RateLimited);
    }

    let body: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    let share = validate(&body, Utc::now())?;

    let Some(writer) = &state.writer else {
        error!("location share received but no document writer is configured");
        return Err(ServerError::Configuration(
            "Server configuration error".to_string(),
        ));
    };
    let document = serde_json::to_value(&share).map_err(SourceError::from)?;
    let id = writer.create(document).await?;
    info!(%id, %client, "location shared");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "id": id,
            "message": "Location shared successfully",
        })),
    ))
}

/// `GET`: describe the endpoint.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "message": "Location share API endpoint",
        "method": "POST",
        "requiredFields": ["latitude", "longitude", "distanceKm", "travelTimeMinutes"],
        "optionalFields": ["name", "phone"],
    }))
}
