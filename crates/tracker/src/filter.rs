//! Habit list filters.

use std::str::FromStr;

use chrono::NaiveDate;
use habitkit_core::Habit;
use serde::{Deserialize, Serialize};

/// Which habits to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFilter {
    /// Every habit, insertion order
    #[default]
    All,
    /// Habits not yet on track this week
    Active,
    /// Habits on track this week
    Completed,
}

impl std::fmt::Display for HabitFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HabitFilter::All => write!(f, "all"),
            HabitFilter::Active => write!(f, "active"),
            HabitFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for HabitFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(HabitFilter::All),
            "active" => Ok(HabitFilter::Active),
            "completed" | "done" => Ok(HabitFilter::Completed),
            other => Err(format!(
                "unknown filter `{other}` (expected all, active or completed)"
            )),
        }
    }
}

/// Outcome of filtering the habit collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilteredHabits<'a> {
    /// Habits matching the filter (may be empty for `all` and `active`)
    Habits(Vec<&'a Habit>),
    /// Nothing is on track yet; these habits have some progress this week
    PartialProgress(Vec<&'a Habit>),
    /// `completed` found neither on-track nor partially done habits
    NothingToShow,
}

impl<'a> FilteredHabits<'a> {
    /// Habits carried by the outcome, empty for [`FilteredHabits::NothingToShow`].
    pub fn habits(&self) -> &[&'a Habit] {
        match self {
            FilteredHabits::Habits(h) | FilteredHabits::PartialProgress(h) => h,
            FilteredHabits::NothingToShow => &[],
        }
    }
}

/// Apply `filter` to `habits` as of `today`.
pub fn filter_habits(habits: &[Habit], filter: HabitFilter, today: NaiveDate) -> FilteredHabits<'_> {
    match filter {
        HabitFilter::All => FilteredHabits::Habits(habits.iter().collect()),
        HabitFilter::Active => FilteredHabits::Habits(
            habits
                .iter()
                .filter(|h| !h.is_on_track_this_week(today))
                .collect(),
        ),
        HabitFilter::Completed => {
            let on_track: Vec<_> = habits
                .iter()
                .filter(|h| h.is_on_track_this_week(today))
                .collect();
            if !on_track.is_empty() {
                return FilteredHabits::Habits(on_track);
            }

            let partial: Vec<_> = habits
                .iter()
                .filter(|h| h.weekly_count(today) > 0)
                .collect();
            if partial.is_empty() {
                FilteredHabits::NothingToShow
            } else {
                FilteredHabits::PartialProgress(partial)
            }
        }
    }
}
