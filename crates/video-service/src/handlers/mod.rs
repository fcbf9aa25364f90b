//! HTTP request handlers for Video Service.

pub mod attendees;
pub mod fallback;
pub mod health;
pub mod meetings;
pub mod metrics;

pub use attendees::create_attendee;
pub use fallback::not_found;
pub use health::health_check;
pub use meetings::create_meeting;
pub use metrics::metrics_handler;
