//! habitkit core data models.
//!
//! This crate defines the habit and user entities together with the derived
//! weekly-progress and streak computations.

#![warn(missing_docs)]

mod id;
mod clock;

mod habit;
mod user;
mod document;

// Re-exports
pub use id::HabitId;
pub use clock::{Clock, SystemClock, FixedClock};
pub use habit::{Habit, HabitStatus, DEFAULT_CATEGORY, WEEK_WINDOW_DAYS};
pub use user::UserProfile;
pub use document::TrackerDocument;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
