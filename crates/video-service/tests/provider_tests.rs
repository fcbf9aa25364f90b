//! End-to-end tests: public router -> HttpVideoProvider -> mock provider API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use video_service::services::HttpVideoProvider;
use video_test_utils::TestVideoServer;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_against(provider_api: &MockServer) -> TestVideoServer {
    let config = TestVideoServer::test_config(HashMap::from([
        ("VIDEO_PROVIDER_URL".to_string(), provider_api.uri()),
        (
            "PROVIDER_REQUEST_TIMEOUT_SECONDS".to_string(),
            "2".to_string(),
        ),
    ]))
    .unwrap();
    let provider = HttpVideoProvider::from_config(&config).unwrap();
    TestVideoServer::spawn_with_config(config, Arc::new(provider))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_meeting_flow_through_http_provider() -> Result<(), anyhow::Error> {
    let provider_api = MockServer::start().await;
    let meeting = json!({
        "MeetingId": "m-77",
        "MediaRegion": "test-region-1",
        "MediaPlacement": {"SignalingUrl": "wss://signal.example"}
    });
    Mock::given(method("POST"))
        .and(path("/meetings"))
        .and(header("authorization", "Bearer test-provider-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Meeting": meeting })))
        .expect(1)
        .mount(&provider_api)
        .await;

    let server = spawn_against(&provider_api).await;
    let response = reqwest::Client::new()
        .post(format!("{}/meeting", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body, meeting);

    let received = provider_api.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&received[0].body)?;
    assert_eq!(sent["MediaRegion"], "test-region-1");
    assert_eq!(sent["ClientRequestToken"], sent["ExternalMeetingId"]);

    Ok(())
}

#[tokio::test]
async fn test_attendee_flow_through_http_provider() -> Result<(), anyhow::Error> {
    let provider_api = MockServer::start().await;
    let attendee = json!({"AttendeeId": "a-1", "ExternalUserId": "u-1", "JoinToken": "jt"});
    Mock::given(method("POST"))
        .and(path("/meetings/m-77/attendees"))
        .and(body_json(json!({"ExternalUserId": "u-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "Attendee": attendee })))
        .expect(1)
        .mount(&provider_api)
        .await;

    let server = spawn_against(&provider_api).await;
    let response = reqwest::Client::new()
        .post(format!("{}/attendee", server.url()))
        .body(r#"{"meetingId":"m-77","externalUserId":"u-1"}"#)
        .send()
        .await?;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body, attendee);

    Ok(())
}

#[tokio::test]
async fn test_provider_error_status_is_generic_500() -> Result<(), anyhow::Error> {
    let provider_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/meetings/gone/attendees"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"Message": "Meeting gone not found"})),
        )
        .mount(&provider_api)
        .await;

    let server = spawn_against(&provider_api).await;
    let response = reqwest::Client::new()
        .post(format!("{}/attendee", server.url()))
        .body(r#"{"meetingId":"gone","externalUserId":"u-1"}"#)
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"message": "Internal Server Error"}));

    Ok(())
}
