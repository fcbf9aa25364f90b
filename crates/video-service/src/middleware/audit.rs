//! Audit logging and the top-level error boundary.
//!
//! For every request this middleware:
//!
//! 1. Emits the audit record (`Video Service Invoked`) with request id,
//!    path and method, before the request is dispatched
//! 2. Runs the router
//! 3. If the response is an internal failure, emits exactly one ERROR record
//!    (`Video Service Error`) with the failure detail and request id
//! 4. Records HTTP metrics
//!
//! Request bodies and user identifiers are never log fields.

use crate::errors::{internal_error_response, InternalErrorDetail};
use crate::observability::metrics::record_http_request;
use axum::{extract::Request, middleware::Next, response::Response};
use std::any::Any;
use std::time::Instant;
use tower_http::request_id::RequestId;
use tracing::{error, info};

const TARGET: &str = "video.audit";

/// Request id used when none was assigned upstream.
const UNKNOWN_REQUEST_ID: &str = "unknown";

pub async fn audit_boundary(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or(UNKNOWN_REQUEST_ID)
        .to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    info!(
        target: TARGET,
        request_id = %request_id,
        path = %path,
        method = %method,
        "Video Service Invoked"
    );

    let mut response = next.run(request).await;

    let failure = response.extensions_mut().remove::<InternalErrorDetail>();
    if let Some(InternalErrorDetail(detail)) = failure {
        error!(
            target: TARGET,
            error = %detail,
            request_id = %request_id,
            "Video Service Error"
        );
    }

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}

/// Convert a handler panic into the generic 500 response.
///
/// The panic payload is not inspected; it may contain request data.
pub fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    internal_error_response("request handler panicked".to_string())
}
