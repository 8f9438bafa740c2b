//! Habit model - a recurring activity with a weekly completion target.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::id::HabitId;
use crate::Time;

/// Category given to habits created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Length of the trailing completion window, today included.
pub const WEEK_WINDOW_DAYS: u64 = 7;

/// A trackable recurring activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier
    pub id: HabitId,

    /// Display name
    pub name: String,

    /// Completions required per rolling week to be on track
    pub target_frequency: u32,

    /// Days the habit was completed
    #[serde(default, deserialize_with = "deserialize_completions")]
    completions: BTreeSet<NaiveDate>,

    /// When created
    pub created_at: Time,

    /// Free-text label
    #[serde(default = "default_category")]
    pub category: String,
}

/// Weekly status of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    /// Target met in the trailing week
    OnTrack,
    /// Target not yet met this week
    Active,
}

impl std::fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HabitStatus::OnTrack => write!(f, "on track"),
            HabitStatus::Active => write!(f, "active"),
        }
    }
}

impl Habit {
    /// Create a habit with a fresh id and no completions.
    ///
    /// A blank category falls back to [`DEFAULT_CATEGORY`].
    pub fn new(
        name: impl Into<String>,
        target_frequency: u32,
        category: Option<String>,
        now: Time,
    ) -> Self {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(default_category);

        Self {
            id: HabitId::new(),
            name: name.into(),
            target_frequency,
            completions: BTreeSet::new(),
            created_at: now,
            category,
        }
    }

    /// Record a completion for `today`.
    ///
    /// Returns `false` when the day was already recorded; the call is then a
    /// no-op.
    pub fn mark_complete(&mut self, today: NaiveDate) -> bool {
        self.completions.insert(today)
    }

    /// Whether a completion exists for `date`.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    /// Number of distinct completion days ever recorded.
    pub fn total_completions(&self) -> usize {
        self.completions.len()
    }

    /// Most recent completion date.
    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.completions.last().copied()
    }

    /// Completions in the inclusive 7-day window ending at `today`.
    pub fn weekly_completions(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let start = week_start(today);
        self.completions.range(start..=today).copied().collect()
    }

    /// Size of [`Habit::weekly_completions`].
    pub fn weekly_count(&self, today: NaiveDate) -> usize {
        let start = week_start(today);
        self.completions.range(start..=today).count()
    }

    /// Whether the weekly target is met.
    pub fn is_on_track_this_week(&self, today: NaiveDate) -> bool {
        self.weekly_count(today) >= self.target_frequency as usize
    }

    /// Weekly progress towards the target, floored and clamped to `0..=100`.
    pub fn progress_percentage(&self, today: NaiveDate) -> u8 {
        if self.target_frequency == 0 {
            return 0;
        }
        let done = self.weekly_count(today) as u64;
        let pct = done * 100 / u64::from(self.target_frequency);
        pct.min(100) as u8
    }

    /// Weekly status label.
    pub fn status(&self, today: NaiveDate) -> HabitStatus {
        if self.is_on_track_this_week(today) {
            HabitStatus::OnTrack
        } else {
            HabitStatus::Active
        }
    }

    /// Consecutive completed days walking back from `today`.
    ///
    /// Zero when `today` itself has no completion.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = Some(today);
        while let Some(d) = day {
            if !self.completions.contains(&d) {
                break;
            }
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }

    /// Longest run of consecutive completed days anywhere in the history.
    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut prev: Option<NaiveDate> = None;
        for &day in &self.completions {
            run = match prev {
                Some(p) if p.succ_opt() == Some(day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }
        longest
    }
}

fn week_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(WEEK_WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Accepts `YYYY-MM-DD` entries as well as full RFC 3339 timestamps, keeping
/// only the calendar date. Duplicates collapse.
fn deserialize_completions<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_completion(s).map_err(serde::de::Error::custom))
        .collect()
}

fn parse_completion(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| format!("invalid completion date `{s}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(target: u32) -> Habit {
        Habit::new("Read", target, None, Utc::now())
    }

    fn days_back(today: NaiveDate, n: u64) -> NaiveDate {
        today.checked_sub_days(Days::new(n)).unwrap()
    }

    #[test]
    fn test_new_habit_defaults_category() {
        let h = Habit::new("Walk", 2, Some("   ".to_string()), Utc::now());
        assert_eq!(h.category, DEFAULT_CATEGORY);
        assert_eq!(h.total_completions(), 0);

        let h = Habit::new("Walk", 2, Some("Health".to_string()), Utc::now());
        assert_eq!(h.category, "Health");
    }

    #[test]
    fn test_mark_complete_is_idempotent_per_day() {
        let today = date(2024, 5, 20);
        let mut h = habit(3);

        assert!(h.mark_complete(today));
        assert!(!h.mark_complete(today));
        assert_eq!(h.total_completions(), 1);
        assert_eq!(h.weekly_count(today), 1);
    }

    #[test]
    fn test_weekly_window_is_inclusive_seven_days() {
        let today = date(2024, 5, 20);
        let mut h = habit(7);

        h.mark_complete(today);
        h.mark_complete(days_back(today, 6));
        h.mark_complete(days_back(today, 7));
        // Future dates are outside the window too.
        h.mark_complete(date(2024, 5, 21));

        let week = h.weekly_completions(today);
        assert_eq!(week, vec![days_back(today, 6), today]);
    }

    #[test]
    fn test_weekly_count_grows_with_distinct_dates() {
        let today = date(2024, 5, 20);
        let mut h = habit(7);
        let mut last = 0;
        for n in 0..7 {
            h.mark_complete(days_back(today, n));
            let count = h.weekly_count(today);
            assert!(count > last);
            last = count;
        }
        assert_eq!(last, 7);
    }

    #[test]
    fn test_on_track_scenario() {
        let today = date(2024, 5, 20);
        let mut h = habit(3);
        for n in 0..3 {
            h.mark_complete(days_back(today, n));
        }

        assert!(h.is_on_track_this_week(today));
        assert_eq!(h.progress_percentage(today), 100);
        assert_eq!(h.current_streak(today), 3);
        assert_eq!(h.status(today), HabitStatus::OnTrack);
    }

    #[test]
    fn test_progress_percentage_bounds() {
        let today = date(2024, 5, 20);

        let h = habit(1);
        assert_eq!(h.progress_percentage(today), 0);

        let mut h = habit(3);
        h.mark_complete(today);
        assert_eq!(h.progress_percentage(today), 33);
        h.mark_complete(days_back(today, 1));
        assert_eq!(h.progress_percentage(today), 66);

        let mut h = habit(1);
        for n in 0..5 {
            h.mark_complete(days_back(today, n));
        }
        assert_eq!(h.progress_percentage(today), 100);

        let mut h = habit(0);
        h.mark_complete(today);
        assert_eq!(h.progress_percentage(today), 0);
    }

    #[test]
    fn test_status_active_below_target() {
        let today = date(2024, 5, 20);
        let mut h = habit(2);
        h.mark_complete(today);
        assert_eq!(h.status(today), HabitStatus::Active);
        assert_eq!(h.status(today).to_string(), "active");
        assert_eq!(HabitStatus::OnTrack.to_string(), "on track");
    }

    #[test]
    fn test_streak_zero_when_today_missing() {
        let today = date(2024, 5, 20);
        let mut h = habit(1);
        h.mark_complete(days_back(today, 1));
        h.mark_complete(days_back(today, 2));
        assert_eq!(h.current_streak(today), 0);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let today = date(2024, 5, 20);
        let mut h = habit(1);
        h.mark_complete(today);
        h.mark_complete(days_back(today, 1));
        h.mark_complete(days_back(today, 3));
        h.mark_complete(days_back(today, 4));
        assert_eq!(h.current_streak(today), 2);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = date(2024, 3, 1);
        let mut h = habit(1);
        h.mark_complete(today);
        h.mark_complete(date(2024, 2, 29));
        h.mark_complete(date(2024, 2, 28));
        assert_eq!(h.current_streak(today), 3);
    }

    #[test]
    fn test_longest_streak() {
        let mut h = habit(1);
        assert_eq!(h.longest_streak(), 0);

        for d in [1, 2, 3, 5, 6, 10] {
            h.mark_complete(date(2024, 1, d));
        }
        assert_eq!(h.longest_streak(), 3);
        assert_eq!(h.last_completed(), Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_deserialize_legacy_completions() {
        let json = r#"{
            "id": 1700000000000,
            "name": "Stretch",
            "targetFrequency": 2,
            "completions": ["2024-05-19", "2024-05-20T08:30:00.000Z", "2024-05-20"],
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;

        let h: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(h.id.as_str(), "1700000000000");
        assert_eq!(h.category, DEFAULT_CATEGORY);
        assert_eq!(h.total_completions(), 2);
        assert!(h.is_completed_on(date(2024, 5, 20)));
    }

    #[test]
    fn test_deserialize_rejects_garbage_completion() {
        let json = r#"{
            "id": "a",
            "name": "Stretch",
            "targetFrequency": 2,
            "completions": ["yesterday"],
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;

        assert!(serde_json::from_str::<Habit>(json).is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut h = habit(2);
        h.mark_complete(date(2024, 5, 20));
        let value = serde_json::to_value(&h).unwrap();

        assert_eq!(value["targetFrequency"], 2);
        assert_eq!(value["completions"][0], "2024-05-20");
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["category"], DEFAULT_CATEGORY);
    }
}
