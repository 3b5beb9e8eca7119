//! Error types for recall-core.

use thiserror::Error;

/// Result type alias using SchedulerError.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors surfaced at the crate's conversion boundaries.
///
/// The scheduling math itself never fails: out-of-range numeric inputs are
/// clamped, not rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("invalid rating value {0}, expected 1-4")]
    InvalidRating(u8),
}
