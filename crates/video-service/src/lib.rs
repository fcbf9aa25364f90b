//! Video Service Library
//!
//! A small HTTP router in front of a managed video-meeting provider:
//!
//! - `POST /meeting` creates a meeting with a fresh idempotency token
//! - `POST /attendee` adds an attendee to an existing meeting
//! - Every other method and path is a JSON 404
//!
//! Every response carries a fixed set of CORS and security headers, and every
//! request produces one audit log record that never contains the request body
//! or user identifiers.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/*.rs -> handlers/*.rs -> services/provider_client.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Fixed headers, audit logging, error boundary
//! - `models` - Request and response models
//! - `observability` - Logging and Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Video provider client and its test double

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
