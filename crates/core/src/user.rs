//! User profile model.

use serde::{Deserialize, Serialize};

use crate::Time;

/// The single local user of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// When the user joined
    pub created_at: Time,
}

impl UserProfile {
    /// Create a profile that joined at `now`.
    pub fn new(name: impl Into<String>, now: Time) -> Self {
        Self {
            name: name.into(),
            created_at: now,
        }
    }

    /// Whole days since joining, never negative.
    pub fn days_joined(&self, now: Time) -> u32 {
        let days = (now - self.created_at).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }
}
