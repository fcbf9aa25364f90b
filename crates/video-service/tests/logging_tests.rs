//! Audit and error log records emitted by the public router.
//!
//! Log capture is per-thread, so these tests rely on the default
//! current-thread runtime of `#[tokio::test]`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use video_service::observability::logging::DEFAULT_LOG_FILTER;
use video_service::services::MockVideoProvider;
use video_test_utils::{LogCapture, TestVideoServer};

const USER_ID: &str = "user-pii-7731";

fn keys(record: &Value) -> BTreeSet<String> {
    record
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<BTreeSet<_>>()
}

#[tokio::test]
async fn test_audit_record_has_request_metadata_only() -> Result<(), anyhow::Error> {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::succeeding())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/attendee", server.url()))
        .header("x-request-id", "audit-req-1")
        .body(format!(
            r#"{{"meetingId":"m1","externalUserId":"{}"}}"#,
            USER_ID
        ))
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let audits = capture.records_with_message("Video Service Invoked");
    assert_eq!(audits.len(), 1);
    let audit = &audits[0];
    assert_eq!(audit["target"], "video.audit");
    assert_eq!(audit["level"], "INFO");
    assert_eq!(audit["request_id"], "audit-req-1");
    assert_eq!(audit["path"], "/attendee");
    assert_eq!(audit["method"], "POST");

    let output = capture.output();
    assert!(!output.contains(USER_ID));
    assert!(!output.contains("externalUserId"));
    assert!(capture.records_at_level("ERROR").is_empty());

    Ok(())
}

#[tokio::test]
async fn test_provider_failure_logs_exactly_one_error_record() -> Result<(), anyhow::Error> {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::failing())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/attendee", server.url()))
        .header("x-request-id", "err-req-9")
        .body(format!(
            r#"{{"meetingId":"m1","externalUserId":"{}"}}"#,
            USER_ID
        ))
        .send()
        .await?;
    assert_eq!(response.status(), 500);

    let errors = capture.records_at_level("ERROR");
    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error["message"], "Video Service Error");
    assert_eq!(error["request_id"], "err-req-9");
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("create_attendee unavailable"));

    let expected: BTreeSet<String> = ["timestamp", "level", "target", "message", "error", "request_id"]
        .iter()
        .map(|k| k.to_string())
        .collect();
    assert_eq!(keys(error), expected);

    assert!(!capture.output().contains(USER_ID));

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_error_record_omits_body() -> Result<(), anyhow::Error> {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::succeeding())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/attendee", server.url()))
        .body(format!("externalUserId={}", USER_ID))
        .send()
        .await?;
    assert_eq!(response.status(), 500);

    let errors = capture.records_at_level("ERROR");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["message"], "Video Service Error");
    assert!(!capture.output().contains(USER_ID));

    Ok(())
}

#[tokio::test]
async fn test_client_errors_do_not_log_errors() -> Result<(), anyhow::Error> {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::succeeding())).await?;
    let client = reqwest::Client::new();

    let missing = client
        .post(format!("{}/attendee", server.url()))
        .body(format!(r#"{{"externalUserId":"{}"}}"#, USER_ID))
        .send()
        .await?;
    assert_eq!(missing.status(), 400);

    let unknown = client.get(format!("{}/nowhere", server.url())).send().await?;
    assert_eq!(unknown.status(), 404);

    assert!(capture.records_at_level("ERROR").is_empty());
    assert_eq!(capture.records_with_message("Video Service Invoked").len(), 2);
    assert!(!capture.output().contains(USER_ID));

    Ok(())
}

#[tokio::test]
async fn test_default_filter_keeps_single_error_record() -> Result<(), anyhow::Error> {
    let capture = LogCapture::new();
    let _guard = capture.install_with_filter(DEFAULT_LOG_FILTER);

    let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::failing())).await?;
    let client = reqwest::Client::new();

    let meeting = client
        .post(format!("{}/meeting", server.url()))
        .header("x-request-id", "default-filter-1")
        .send()
        .await?;
    assert_eq!(meeting.status(), 500);

    let errors = capture.records_at_level("ERROR");
    assert_eq!(errors.len(), 1, "error records: {:?}", errors);
    assert_eq!(errors[0]["message"], "Video Service Error");
    assert_eq!(errors[0]["request_id"], "default-filter-1");

    let attendee = client
        .post(format!("{}/attendee", server.url()))
        .body(format!(
            r#"{{"meetingId":"m1","externalUserId":"{}"}}"#,
            USER_ID
        ))
        .send()
        .await?;
    assert_eq!(attendee.status(), 500);

    assert_eq!(capture.records_at_level("ERROR").len(), 2);
    assert!(!capture.output().contains(USER_ID));

    Ok(())
}
