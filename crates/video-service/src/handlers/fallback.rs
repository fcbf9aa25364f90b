//! Fallback for unmatched routes.
//!
//! Used both as the router fallback (unknown path) and as the method
//! fallback on known paths, so `GET /meeting` is a 404 rather than a 405.

use crate::errors::VideoError;

pub async fn not_found() -> VideoError {
    VideoError::NotFound
}
