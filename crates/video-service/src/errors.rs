//! Video Service error types.
//!
//! Every failure collapses into one of three caller-visible shapes:
//!
//! - 404 `{"message":"Not Found"}`
//! - 400 `{"message":"Missing meetingId or externalUserId"}`
//! - 500 `{"message":"Internal Server Error"}`
//!
//! Internal details never reach the caller. For 500 responses the detail is
//! attached to the response as an [`InternalErrorDetail`] extension, which the
//! audit boundary logs together with the request id and then strips.

use crate::models::MessageBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Body message for unmatched routes.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Body message for attendee requests missing a required field.
pub const MISSING_ATTENDEE_FIELDS_MESSAGE: &str = "Missing meetingId or externalUserId";

/// Body message for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Video Service error type.
///
/// Maps to HTTP status codes:
/// - NotFound: 404 Not Found
/// - MissingAttendeeFields: 400 Bad Request
/// - MalformedBody, Provider, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Not found")]
    NotFound,

    #[error("Missing meetingId or externalUserId")]
    MissingAttendeeFields,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Video provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VideoError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            VideoError::NotFound => 404,
            VideoError::MissingAttendeeFields => 400,
            VideoError::MalformedBody(_) | VideoError::Provider(_) | VideoError::Internal(_) => {
                500
            }
        }
    }
}

/// Detail of an internal failure, carried from the handler to the audit
/// boundary in the response extensions. Never serialized to the caller.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for VideoError {
    fn into_response(self) -> Response {
        match self {
            VideoError::NotFound => message_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            VideoError::MissingAttendeeFields => {
                message_response(StatusCode::BAD_REQUEST, MISSING_ATTENDEE_FIELDS_MESSAGE)
            }
            err @ (VideoError::MalformedBody(_)
            | VideoError::Provider(_)
            | VideoError::Internal(_)) => internal_error_response(err.to_string()),
        }
    }
}

/// Build the generic 500 response, attaching `detail` for the audit boundary.
pub fn internal_error_response(detail: String) -> Response {
    let mut response = message_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
    response.extensions_mut().insert(InternalErrorDetail(detail));
    response
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

impl From<serde_json::Error> for VideoError {
    fn from(err: serde_json::Error) -> Self {
        VideoError::MalformedBody(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(VideoError::NotFound.to_string(), "Not found");
        assert_eq!(
            VideoError::MissingAttendeeFields.to_string(),
            "Missing meetingId or externalUserId"
        );
        assert_eq!(
            VideoError::MalformedBody("expected value at line 1".to_string()).to_string(),
            "Malformed request body: expected value at line 1"
        );
        assert_eq!(
            VideoError::Provider("connection refused".to_string()).to_string(),
            "Video provider error: connection refused"
        );
        assert_eq!(
            VideoError::Internal("boom".to_string()).to_string(),
            "Internal error: boom"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(VideoError::NotFound.status_code(), 404);
        assert_eq!(VideoError::MissingAttendeeFields.status_code(), 400);
        assert_eq!(VideoError::MalformedBody("x".to_string()).status_code(), 500);
        assert_eq!(VideoError::Provider("x".to_string()).status_code(), 500);
        assert_eq!(VideoError::Internal("x".to_string()).status_code(), 500);
    }

    #[test]
    fn test_from_serde_json_error_is_malformed_body() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(VideoError::from(err), VideoError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_into_response_not_found() {
        let response = VideoError::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<InternalErrorDetail>().is_none());

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json, serde_json::json!({"message": "Not Found"}));
    }

    #[tokio::test]
    async fn test_into_response_missing_attendee_fields() {
        let response = VideoError::MissingAttendeeFields.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(
            body_json,
            serde_json::json!({"message": "Missing meetingId or externalUserId"})
        );
    }

    #[tokio::test]
    async fn test_into_response_provider_error_is_generic() {
        let response =
            VideoError::Provider("provider returned 503 for meeting abc".to_string())
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response
            .extensions()
            .get::<InternalErrorDetail>()
            .cloned()
            .expect("detail should be attached for the audit boundary");
        assert!(detail.0.contains("provider returned 503"));

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(
            body_json,
            serde_json::json!({"message": "Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_into_response_malformed_body_is_generic() {
        let response = VideoError::MalformedBody("EOF while parsing".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], "Internal Server Error");
        assert!(!body_json.to_string().contains("EOF"));
    }
}
