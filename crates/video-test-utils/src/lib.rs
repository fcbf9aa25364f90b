//! # Video Test Utilities
//!
//! Shared test utilities for the Video Service.
//!
//! This crate provides:
//! - Server test harness (`TestVideoServer` for E2E tests)
//! - Log capture (`LogCapture` for asserting on emitted JSON records)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use video_test_utils::*;
//! use video_service::services::MockVideoProvider;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestVideoServer::spawn(Arc::new(MockVideoProvider::succeeding())).await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .post(format!("{}/meeting", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 201);
//!     Ok(())
//! }
//! ```

pub mod log_capture;
pub mod server_harness;

// Re-export commonly used items
pub use log_capture::*;
pub use server_harness::*;
