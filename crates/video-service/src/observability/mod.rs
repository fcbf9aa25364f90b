//! Observability for Video Service.
//!
//! Provides metrics definitions and the structured log format.

pub mod logging;
pub mod metrics;
