//! Tracker error types.

use crate::tracker::HabitRef;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors returned by tracker operations.
///
/// Persistence failures are not part of this type: they are logged and the
/// in-memory change stands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// Habit name was empty or whitespace
    #[error("habit name must not be empty")]
    EmptyName,

    /// Weekly target below one
    #[error("weekly target must be at least 1 (got {0})")]
    InvalidTarget(u32),

    /// No habit matches the reference
    #[error("habit {0} not found")]
    NotFound(HabitRef),
}
