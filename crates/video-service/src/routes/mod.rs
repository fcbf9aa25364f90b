//! HTTP routes for Video Service.
//!
//! Defines the public Axum router, the operations router, and application
//! state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{apply_fixed_headers, audit_boundary, handle_panic};
use crate::services::VideoProvider;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::Level;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Video provider the handlers delegate to.
    pub provider: Arc<dyn VideoProvider>,
}

/// Build the public router.
///
/// Creates an Axum router with:
/// - `POST /meeting` - Create a meeting
/// - `POST /attendee` - Add an attendee to a meeting
/// - 404 `{"message":"Not Found"}` for every other method and path
pub fn build_routes(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route(
            "/meeting",
            post(handlers::create_meeting).fallback(handlers::not_found),
        )
        .route(
            "/attendee",
            post(handlers::create_attendee).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    apply_public_layers(routes)
}

/// Wrap a router in the public middleware stack.
///
/// Layer order (bottom-to-top execution):
/// 1. CatchPanicLayer - panics become the generic 500 (innermost)
/// 2. audit_boundary - audit record, error record, metrics
/// 3. apply_fixed_headers - fixed header set on every response
/// 4. PropagateRequestIdLayer - echo `x-request-id` back to the caller
/// 5. SetRequestIdLayer - assign `x-request-id` if the caller sent none
/// 6. TraceLayer - request spans (outermost); failures at DEBUG, since
///    audit_boundary emits the request's only ERROR record
pub fn apply_public_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(audit_boundary))
        .layer(middleware::from_fn(apply_fixed_headers))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
}

/// Build the operations router.
///
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics
pub fn build_ops_routes(metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::services::MockVideoProvider;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn test_config() -> Config {
        let vars = HashMap::from([
            (
                "VIDEO_PROVIDER_URL".to_string(),
                "http://provider.test".to_string(),
            ),
            ("VIDEO_PROVIDER_API_KEY".to_string(), "k".to_string()),
            ("MEDIA_REGION".to_string(), "ap-southeast-2".to_string()),
        ]);
        Config::from_vars(&vars).unwrap()
    }

    fn app_with(provider: Arc<MockVideoProvider>) -> Router {
        build_routes(Arc::new(AppState {
            config: test_config(),
            provider,
        }))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_create_meeting_uses_configured_region() {
        let provider = Arc::new(MockVideoProvider::succeeding());
        let (status, _, body) = send(app_with(provider.clone()), "POST", "/meeting", "").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["MediaRegion"], "ap-southeast-2");

        let requests = provider.meeting_requests();
        assert_eq!(requests.len(), 1);
        let request = requests.first().unwrap();
        assert_eq!(request.media_region, "ap-southeast-2");
        assert!(!request.client_request_token.is_empty());
        assert_eq!(request.client_request_token, request.external_meeting_id);
    }

    #[tokio::test]
    async fn test_wrong_method_on_known_path_is_404_not_405() {
        for (method, uri) in [("GET", "/meeting"), ("DELETE", "/attendee"), ("PUT", "/meeting")] {
            let provider = Arc::new(MockVideoProvider::succeeding());
            let (status, headers, body) = send(app_with(provider.clone()), method, uri, "").await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            assert_eq!(body, serde_json::json!({"message": "Not Found"}));
            assert_eq!(headers.get("content-type").unwrap(), "application/json");
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let app = app_with(Arc::new(MockVideoProvider::succeeding()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/unknown")
                    .header("x-request-id", "req-abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-abc-123");
    }

    #[tokio::test]
    async fn test_request_id_is_generated_when_absent() {
        let (_, headers, _) = send(
            app_with(Arc::new(MockVideoProvider::succeeding())),
            "POST",
            "/meeting",
            "",
        )
        .await;

        let id = headers.get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_panicking_handler_yields_generic_500_with_fixed_headers() {
        async fn explode() -> &'static str {
            panic!("handler blew up with meetingId=m1")
        }

        let app = apply_public_layers(Router::new().route("/boom", get(explode)));
        let (status, headers, body) = send(app, "GET", "/boom", "").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "Internal Server Error"}));
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    }

    #[tokio::test]
    async fn test_ops_routes_serve_health_and_metrics() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let app = build_ops_routes(handle);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
