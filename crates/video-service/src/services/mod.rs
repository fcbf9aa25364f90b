//! Service layer for Video Service.
//!
//! # Components
//!
//! - `provider_client` - HTTP client for the external video provider, plus
//!   the `VideoProvider` trait handlers depend on

pub mod provider_client;

pub use provider_client::{HttpVideoProvider, VideoProvider};
// Mock provider for testing (exposed for integration tests)
pub use provider_client::mock::MockVideoProvider;
