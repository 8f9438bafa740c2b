//! Habit tracking aggregate.
//!
//! Owns the user profile and habit collection, mediates every mutation and
//! saves the full state after each one.

#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod reminder;
pub mod tracker;

pub use error::{TrackerError, Result};
pub use filter::{HabitFilter, FilteredHabits};
pub use reminder::next_reminder;
pub use tracker::{Tracker, HabitRef, SummaryStats};
