//! Test server harness for E2E testing
//!
//! Provides `TestVideoServer` for spawning real Video Service instances in tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use video_service::config::Config;
use video_service::routes::{self, AppState};
use video_service::services::VideoProvider;

/// Region configured by [`TestVideoServer::spawn`].
pub const TEST_MEDIA_REGION: &str = "test-region-1";

/// Test harness for spawning the Video Service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_unknown_route() -> Result<(), anyhow::Error> {
///     let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::succeeding())).await?;
///
///     let response = reqwest::get(&format!("{}/nope", server.url())).await?;
///
///     assert_eq!(response.status(), 404);
///     Ok(())
/// }
/// ```
pub struct TestVideoServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestVideoServer {
    /// Spawn a server backed by `provider` with the default test configuration.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the public router in the background
    pub async fn spawn(provider: Arc<dyn VideoProvider>) -> Result<Self, anyhow::Error> {
        let config = Self::test_config(HashMap::new())?;
        Self::spawn_with_config(config, provider).await
    }

    /// Spawn a server with a caller-supplied configuration.
    pub async fn spawn_with_config(
        config: Config,
        provider: Arc<dyn VideoProvider>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            config: config.clone(),
            provider,
        });

        // Build routes using video-service's real route builder
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Build a test configuration, with `overrides` applied on top of the
    /// defaults.
    pub fn test_config(overrides: HashMap<String, String>) -> Result<Config, anyhow::Error> {
        let mut vars = HashMap::from([
            (
                "VIDEO_PROVIDER_URL".to_string(),
                "http://127.0.0.1:1".to_string(),
            ),
            (
                "VIDEO_PROVIDER_API_KEY".to_string(),
                "test-provider-key".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("OPS_BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("MEDIA_REGION".to_string(), TEST_MEDIA_REGION.to_string()),
            ("VIDEO_DRAIN_SECONDS".to_string(), "0".to_string()),
        ]);
        vars.extend(overrides);

        Config::from_vars(&vars).map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestVideoServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
