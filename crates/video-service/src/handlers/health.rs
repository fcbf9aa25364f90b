//! Health check handler.
//!
//! Served on the operations listener, not the public router.

/// Liveness probe handler.
///
/// Returns "OK" while the process is running. Does not call the video
/// provider: a provider outage must not restart this service.
pub async fn health_check() -> &'static str {
    "OK"
}
