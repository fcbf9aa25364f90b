//! Attendee handlers for Video Service.
//!
//! - `POST /attendee` - Add an attendee to an existing meeting
//!
//! # Validation
//!
//! `meetingId` and `externalUserId` must both be present and truthy.
//! Absent, `null`, `false`, `0` and `""` are falsy and yield 400 before the
//! provider is called.
//!
//! A body that is not JSON at all is not a validation failure: it is an
//! internal error and yields the generic 500. So is a truthy value that is
//! not a string (`12345`, `true`, an object or array), which the provider
//! cannot accept as an id.

use crate::errors::VideoError;
use crate::models::{Attendee, CreateAttendeeRequest};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for POST /attendee
///
/// # Response
///
/// - 201 Created: the provider's attendee object, verbatim
/// - 400 Bad Request: `meetingId` or `externalUserId` missing
/// - 500 Internal Server Error: unparsable body or provider failure
#[instrument(skip_all, name = "video.attendees.create")]
pub async fn create_attendee(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Attendee>), VideoError> {
    let body = body.map_err(|rejection| VideoError::MalformedBody(rejection.body_text()))?;
    let request = parse_attendee_request(&body)?;

    let attendee = state.provider.create_attendee(&request).await?;

    info!(
        target: "video.handlers.attendees",
        meeting_id = %request.meeting_id,
        "Attendee created"
    );

    Ok((StatusCode::CREATED, Json(attendee)))
}

/// Parse and validate an attendee request body.
pub fn parse_attendee_request(body: &[u8]) -> Result<CreateAttendeeRequest, VideoError> {
    let value: Value = serde_json::from_slice(body)?;

    // Field access on `null` has no object to read from
    if value.is_null() {
        return Err(VideoError::MalformedBody("request body is null".to_string()));
    }

    let meeting_id = field(&value, "meetingId");
    let external_user_id = field(&value, "externalUserId");

    match (meeting_id, external_user_id) {
        (Field::Falsy, _) | (_, Field::Falsy) => Err(VideoError::MissingAttendeeFields),
        (Field::Text(meeting_id), Field::Text(external_user_id)) => Ok(CreateAttendeeRequest {
            meeting_id: meeting_id.to_string(),
            external_user_id: external_user_id.to_string(),
        }),
        (Field::NotText(name), _) | (_, Field::NotText(name)) => Err(VideoError::MalformedBody(
            format!("{} must be a string", name),
        )),
    }
}

/// Truthiness of a single body field.
enum Field<'a> {
    /// Absent, `null`, `false`, `0` or `""`.
    Falsy,
    /// Non-empty string.
    Text(&'a str),
    /// Truthy but not a string; carries the field name.
    NotText(&'static str),
}

fn field<'a>(value: &'a Value, name: &'static str) -> Field<'a> {
    match value.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Field::Falsy,
        Some(Value::String(s)) if s.is_empty() => Field::Falsy,
        Some(Value::String(s)) => Field::Text(s),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Field::Falsy,
        Some(_) => Field::NotText(name),
    }
}
