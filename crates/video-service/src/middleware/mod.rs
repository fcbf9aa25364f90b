//! Middleware for Video Service.
//!
//! - `audit` - audit record, single error boundary, HTTP metrics, panic mapping
//! - `headers` - fixed response header set

pub mod audit;
pub mod headers;

pub use audit::{audit_boundary, handle_panic};
pub use headers::apply_fixed_headers;
