//! Meeting handlers for Video Service.
//!
//! - `POST /meeting` - Create a meeting with the video provider
//!
//! The request body is ignored. Each call generates a fresh token that is
//! sent as both the provider idempotency key and the external meeting id.

use crate::errors::VideoError;
use crate::models::{CreateMeetingRequest, Meeting};
use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Handler for POST /meeting
///
/// # Response
///
/// - 201 Created: the provider's meeting object, verbatim
/// - 500 Internal Server Error: provider call failed
#[instrument(skip_all, name = "video.meetings.create")]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Meeting>), VideoError> {
    let token = Uuid::new_v4().to_string();
    let request = CreateMeetingRequest {
        client_request_token: token.clone(),
        media_region: state.config.media_region.clone(),
        external_meeting_id: token,
    };

    let meeting = state.provider.create_meeting(&request).await?;

    info!(
        target: "video.handlers.meetings",
        external_meeting_id = %request.external_meeting_id,
        meeting_id = meeting.meeting_id().unwrap_or("unknown"),
        region = %request.media_region,
        "Meeting created"
    );

    Ok((StatusCode::CREATED, Json(meeting)))
}
