//! Video provider HTTP client.
//!
//! The provider owns every meeting and attendee; this client only asks it to
//! create them and hands back whatever object it returns.
//!
//! # Wire format
//!
//! - `POST {base}/meetings` with `{"ClientRequestToken","MediaRegion","ExternalMeetingId"}`
//!   returns `{"Meeting": {...}}`
//! - `POST {base}/meetings/{meetingId}/attendees` with `{"ExternalUserId"}`
//!   returns `{"Attendee": {...}}`
//!
//! # Security
//!
//! - Requests carry the provider API key as a bearer token
//! - Provider error bodies are never logged (they may echo user ids)
//! - The external user id is never a log or span field
//! - Timeouts prevent hanging connections

use crate::config::Config;
use crate::errors::VideoError;
use crate::models::{
    Attendee, CreateAttendeeRequest, CreateAttendeeResponse, CreateMeetingRequest,
    CreateMeetingResponse, Meeting,
};
use crate::observability::metrics::record_provider_request;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, instrument, warn};

const TARGET: &str = "video.services.provider_client";

/// Operations exposed by the video provider (enables mocking).
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Create a meeting and return the provider's meeting object.
    async fn create_meeting(&self, request: &CreateMeetingRequest) -> Result<Meeting, VideoError>;

    /// Add an attendee to a meeting and return the provider's attendee object.
    async fn create_attendee(
        &self,
        request: &CreateAttendeeRequest,
    ) -> Result<Attendee, VideoError>;
}

/// Request body for attendee creation. The meeting id travels in the path.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttendeeBody<'a> {
    external_user_id: &'a str,
}

/// HTTP client for the video provider API.
#[derive(Clone)]
pub struct HttpVideoProvider {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Provider API base URL, without trailing slash.
    base_url: String,

    /// Bearer credential for the provider API.
    api_key: SecretString,
}

impl HttpVideoProvider {
    /// Create a new provider client.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Internal` if the HTTP client cannot be built or
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: String,
        api_key: SecretString,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, VideoError> {
        Url::parse(&base_url).map_err(|e| {
            error!(target: TARGET, error = %e, "Invalid provider base URL");
            VideoError::Internal(format!("invalid provider URL: {}", e))
        })?;

        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                error!(target: TARGET, error = %e, "Failed to build HTTP client");
                VideoError::Internal(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a provider client from service configuration.
    pub fn from_config(config: &Config) -> Result<Self, VideoError> {
        Self::new(
            config.provider_url.clone(),
            config.provider_api_key.clone(),
            Duration::from_secs(config.provider_request_timeout_seconds),
            Duration::from_secs(config.provider_connect_timeout_seconds),
        )
    }

    fn meetings_url(&self) -> String {
        format!("{}/meetings", self.base_url)
    }

    /// `{base}/meetings/{meeting_id}/attendees`, with the meeting id encoded
    /// as a single path segment.
    fn attendees_url(&self, meeting_id: &str) -> Result<Url, VideoError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VideoError::Internal(format!("invalid provider URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|()| VideoError::Internal("provider URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("meetings")
            .push(meeting_id)
            .push("attendees");

        Ok(url)
    }

    async fn post_json<B, T>(
        &self,
        operation: &'static str,
        url: Url,
        body: &B,
    ) -> Result<T, VideoError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let start = Instant::now();

        let result = match self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
        {
            Ok(response) => handle_response(operation, response).await,
            Err(e) => {
                warn!(target: TARGET, operation, error = %e, "Provider request failed");
                Err(VideoError::Provider(format!(
                    "{} request failed: {}",
                    operation, e
                )))
            }
        };

        let status = if result.is_ok() { "success" } else { "error" };
        record_provider_request(operation, status, start.elapsed());

        result
    }
}

/// Map provider status codes to errors. Codes are not interpreted beyond
/// success or failure.
async fn handle_response<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<T, VideoError> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.map_err(|e| {
            warn!(target: TARGET, operation, error = %e, "Failed to parse provider response");
            VideoError::Provider(format!("{} returned an invalid body: {}", operation, e))
        })
    } else {
        warn!(target: TARGET, operation, status = %status, "Provider returned error status");
        Err(VideoError::Provider(format!(
            "{} failed with status {}",
            operation, status
        )))
    }
}

#[async_trait::async_trait]
impl VideoProvider for HttpVideoProvider {
    #[instrument(
        skip(self, request),
        fields(external_meeting_id = %request.external_meeting_id, region = %request.media_region)
    )]
    async fn create_meeting(&self, request: &CreateMeetingRequest) -> Result<Meeting, VideoError> {
        let url = Url::parse(&self.meetings_url())
            .map_err(|e| VideoError::Internal(format!("invalid provider URL: {}", e)))?;

        let envelope: CreateMeetingResponse =
            self.post_json("create_meeting", url, request).await?;

        Ok(envelope.meeting)
    }

    #[instrument(skip(self, request), fields(meeting_id = %request.meeting_id))]
    async fn create_attendee(
        &self,
        request: &CreateAttendeeRequest,
    ) -> Result<Attendee, VideoError> {
        let url = self.attendees_url(&request.meeting_id)?;
        let body = AttendeeBody {
            external_user_id: &request.external_user_id,
        };

        let envelope: CreateAttendeeResponse =
            self.post_json("create_attendee", url, &body).await?;

        Ok(envelope.attendee)
    }
}

/// Mock video provider for testing.
///
/// Records every request it receives so tests can assert on what would
/// have been sent to the provider.
pub mod mock {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::{Mutex, PoisonError};

    enum Behavior {
        /// Build plausible objects from the request.
        Echo,
        /// Return these exact objects.
        Fixed { meeting: Value, attendee: Value },
        /// Fail every call.
        Fail,
    }

    /// Mock implementation of [`VideoProvider`].
    pub struct MockVideoProvider {
        behavior: Behavior,
        meeting_requests: Mutex<Vec<CreateMeetingRequest>>,
        attendee_requests: Mutex<Vec<CreateAttendeeRequest>>,
    }

    impl MockVideoProvider {
        fn with_behavior(behavior: Behavior) -> Self {
            Self {
                behavior,
                meeting_requests: Mutex::new(Vec::new()),
                attendee_requests: Mutex::new(Vec::new()),
            }
        }

        /// Create a mock that succeeds, deriving objects from each request.
        pub fn succeeding() -> Self {
            Self::with_behavior(Behavior::Echo)
        }

        /// Create a mock that always returns the given objects.
        pub fn returning(meeting: Value, attendee: Value) -> Self {
            Self::with_behavior(Behavior::Fixed { meeting, attendee })
        }

        /// Create a mock whose every call fails with a provider error.
        pub fn failing() -> Self {
            Self::with_behavior(Behavior::Fail)
        }

        /// Meeting requests received so far.
        pub fn meeting_requests(&self) -> Vec<CreateMeetingRequest> {
            self.meeting_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Attendee requests received so far.
        pub fn attendee_requests(&self) -> Vec<CreateAttendeeRequest> {
            self.attendee_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Total number of provider calls made.
        pub fn call_count(&self) -> usize {
            self.meeting_requests().len() + self.attendee_requests().len()
        }
    }

    #[async_trait::async_trait]
    impl VideoProvider for MockVideoProvider {
        async fn create_meeting(
            &self,
            request: &CreateMeetingRequest,
        ) -> Result<Meeting, VideoError> {
            self.meeting_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            match &self.behavior {
                Behavior::Echo => Ok(Meeting(json!({
                    "MeetingId": uuid::Uuid::new_v4().to_string(),
                    "ExternalMeetingId": request.external_meeting_id,
                    "MediaRegion": request.media_region,
                }))),
                Behavior::Fixed { meeting, .. } => Ok(Meeting(meeting.clone())),
                Behavior::Fail => Err(VideoError::Provider(
                    "mock provider: create_meeting unavailable".to_string(),
                )),
            }
        }

        async fn create_attendee(
            &self,
            request: &CreateAttendeeRequest,
        ) -> Result<Attendee, VideoError> {
            self.attendee_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            match &self.behavior {
                Behavior::Echo => Ok(Attendee(json!({
                    "AttendeeId": uuid::Uuid::new_v4().to_string(),
                    "ExternalUserId": request.external_user_id,
                    "JoinToken": "mock-join-token",
                }))),
                Behavior::Fixed { attendee, .. } => Ok(Attendee(attendee.clone())),
                Behavior::Fail => Err(VideoError::Provider(
                    "mock provider: create_attendee unavailable".to_string(),
                )),
            }
        }
    }

}
