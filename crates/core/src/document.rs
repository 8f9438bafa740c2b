//! Persisted tracker document.

use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::user::UserProfile;

/// Whole tracker state as stored on disk.
///
/// ```json
/// { "user": { "name": "...", "createdAt": "..." }, "habits": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerDocument {
    /// The user profile
    pub user: UserProfile,

    /// Habits in insertion order
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl TrackerDocument {
    /// A document with no habits.
    pub fn empty(user: UserProfile) -> Self {
        Self {
            user,
            habits: Vec::new(),
        }
    }
}
