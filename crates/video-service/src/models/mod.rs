//! Data models for Video Service.
//!
//! Meetings and attendees are owned by the video provider. This service
//! never inspects their fields; they are carried as raw JSON values and
//! returned to the caller verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON body for 400/404/500 responses: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Provider-defined meeting object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meeting(pub serde_json::Value);

impl Meeting {
    /// Provider-assigned meeting id, if the provider returned one.
    pub fn meeting_id(&self) -> Option<&str> {
        self.0.get("MeetingId").and_then(serde_json::Value::as_str)
    }
}

/// Provider-defined attendee object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attendee(pub serde_json::Value);

/// Parameters for creating a meeting.
///
/// `client_request_token` and `external_meeting_id` carry the same freshly
/// generated value for every inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMeetingRequest {
    /// Idempotency key for the provider.
    pub client_request_token: String,

    /// Media region the meeting is hosted in.
    pub media_region: String,

    /// Caller-side identifier for the meeting.
    pub external_meeting_id: String,
}

/// Parameters for adding an attendee to a meeting.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateAttendeeRequest {
    /// Provider meeting id the attendee joins.
    pub meeting_id: String,

    /// Opaque user id from the identity provider. Treated as PII.
    pub external_user_id: String,
}

impl fmt::Debug for CreateAttendeeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAttendeeRequest")
            .field("meeting_id", &self.meeting_id)
            .field("external_user_id", &"[REDACTED]")
            .finish()
    }
}

/// Provider envelope for a created meeting: `{"Meeting": {...}}`.
#[derive(Debug, Deserialize)]
pub struct CreateMeetingResponse {
    #[serde(rename = "Meeting")]
    pub meeting: Meeting,
}

/// Provider envelope for a created attendee: `{"Attendee": {...}}`.
#[derive(Debug, Deserialize)]
pub struct CreateAttendeeResponse {
    #[serde(rename = "Attendee")]
    pub attendee: Attendee,
}
