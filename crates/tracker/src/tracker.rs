//! Tracker aggregate - the sole mutation boundary for habits.

use std::collections::HashSet;

use chrono::NaiveDate;
use habitkit_core::{Clock, Habit, HabitId, SystemClock, TrackerDocument, UserProfile};
use habitkit_storage::Storage;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{Result, TrackerError};
use crate::filter::{filter_habits, FilteredHabits, HabitFilter};

/// Reference to a habit in the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitRef {
    /// Zero-based position in insertion order
    Position(usize),
    /// Habit id
    Id(HabitId),
}

impl std::fmt::Display for HabitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HabitRef::Position(p) => write!(f, "#{}", p + 1),
            HabitRef::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<usize> for HabitRef {
    fn from(position: usize) -> Self {
        HabitRef::Position(position)
    }
}

impl From<HabitId> for HabitRef {
    fn from(id: HabitId) -> Self {
        HabitRef::Id(id)
    }
}

/// Summary statistics over the habit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of habits
    pub total: usize,
    /// Habits meeting their weekly target
    pub on_track: usize,
    /// `total - on_track`
    pub not_on_track: usize,
    /// Whole days since the user joined
    pub days_joined: u32,
}

/// Owns the user profile and habits; saves the full state after every
/// mutation.
pub struct Tracker<S: Storage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    user: UserProfile,
    habits: Vec<Habit>,
    last_save_failed: bool,
    failed_saves: usize,
}

impl<S: Storage, C: Clock> Tracker<S, C> {
    /// Open the tracker over `storage`.
    ///
    /// A missing store is initialised with a fresh profile named `user_name`
    /// and no habits. An unreadable or malformed store is logged and the
    /// tracker starts from that fresh state instead.
    pub async fn open(storage: S, clock: C, user_name: impl Into<String>) -> Self {
        let user = UserProfile::new(user_name, clock.now());
        let mut tracker = Self {
            storage,
            clock,
            user,
            habits: Vec::new(),
            last_save_failed: false,
            failed_saves: 0,
        };
        tracker.reload().await;
        tracker
    }

    /// Re-read the store.
    ///
    /// Returns `true` when the in-memory state was replaced. On a load failure
    /// the current state is kept.
    pub async fn reload(&mut self) -> bool {
        match self.storage.load().await {
            Ok(Some(document)) => {
                self.user = document.user;
                self.habits = document.habits;
                self.ensure_unique_ids();
                self.ensure_valid_targets();
                info!(
                    location = %self.storage.location(),
                    habits = self.habits.len(),
                    "Loaded tracker state"
                );
                true
            }
            Ok(None) => {
                info!(location = %self.storage.location(), "No saved state, initialising store");
                self.persist().await;
                false
            }
            Err(e) => {
                error!(
                    location = %self.storage.location(),
                    error = %e,
                    "Failed to load tracker state, keeping in-memory state"
                );
                false
            }
        }
    }

    /// The user profile.
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// All habits in insertion order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Number of habits.
    pub fn len(&self) -> usize {
        self.habits.len()
    }

    /// Whether there are no habits.
    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Today's date according to the tracker clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// A single clock reading as instant and date, for callers that need
    /// both within one operation.
    pub fn now_and_today(&self) -> (habitkit_core::Time, NaiveDate) {
        self.clock.now_and_today()
    }

    /// Where the state is stored, for messages.
    pub fn storage_location(&self) -> String {
        self.storage.location()
    }

    /// Current instant according to the tracker clock.
    pub fn now(&self) -> habitkit_core::Time {
        self.clock.now()
    }

    /// Whether the most recent save failed.
    pub fn last_save_failed(&self) -> bool {
        self.last_save_failed
    }

    /// Number of saves that failed since the tracker was opened.
    pub fn failed_saves(&self) -> usize {
        self.failed_saves
    }

    /// Look up a habit.
    pub fn habit(&self, r: &HabitRef) -> Option<&Habit> {
        self.index_of(r).map(|i| &self.habits[i])
    }

    /// Zero-based position of the habit with `id`.
    pub fn position_of(&self, id: &HabitId) -> Option<usize> {
        self.habits.iter().position(|h| &h.id == id)
    }

    /// Create a habit, append it and save.
    pub async fn add_habit(
        &mut self,
        name: &str,
        target_frequency: u32,
        category: Option<String>,
    ) -> Result<&Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        if target_frequency == 0 {
            return Err(TrackerError::InvalidTarget(target_frequency));
        }

        let habit = Habit::new(name, target_frequency, category, self.clock.now());
        info!(habit_id = %habit.id, name = %habit.name, target = target_frequency, "Added habit");
        self.habits.push(habit);
        self.persist().await;

        let last = self.habits.len() - 1;
        Ok(&self.habits[last])
    }

    /// Mark a habit complete for today and save.
    ///
    /// Returns `false` when today was already recorded.
    pub async fn complete_habit(&mut self, r: &HabitRef) -> Result<bool> {
        let today = self.clock.today();
        self.complete_habit_on(r, today).await
    }

    /// Mark a habit complete for `date` and save.
    pub async fn complete_habit_on(&mut self, r: &HabitRef, date: NaiveDate) -> Result<bool> {
        let index = self.index_of(r).ok_or_else(|| TrackerError::NotFound(r.clone()))?;
        let habit = &mut self.habits[index];
        let recorded = habit.mark_complete(date);
        if recorded {
            info!(habit_id = %habit.id, %date, "Recorded completion");
        } else {
            debug!(habit_id = %habit.id, %date, "Completion already recorded");
        }
        self.persist().await;
        Ok(recorded)
    }

    /// Remove a habit and save. Returns the removed habit.
    pub async fn delete_habit(&mut self, r: &HabitRef) -> Result<Habit> {
        let index = self.index_of(r).ok_or_else(|| TrackerError::NotFound(r.clone()))?;
        let removed = self.habits.remove(index);
        info!(habit_id = %removed.id, name = %removed.name, "Deleted habit");
        self.persist().await;
        Ok(removed)
    }

    /// Counts over the collection as of today.
    pub fn summary_stats(&self) -> SummaryStats {
        let (now, today) = self.clock.now_and_today();
        self.summary_stats_on(now, today)
    }

    /// Counts over the collection as of `today`, with `now` for the join age.
    pub fn summary_stats_on(&self, now: habitkit_core::Time, today: NaiveDate) -> SummaryStats {
        let total = self.habits.len();
        let on_track = self
            .habits
            .iter()
            .filter(|h| h.is_on_track_this_week(today))
            .count();

        SummaryStats {
            total,
            on_track,
            not_on_track: total - on_track,
            days_joined: self.user.days_joined(now),
        }
    }

    /// Habits selected by `filter` as of today.
    pub fn filtered_habits(&self, filter: HabitFilter) -> FilteredHabits<'_> {
        self.filtered_habits_on(filter, self.clock.today())
    }

    /// Habits selected by `filter` as of `today`.
    pub fn filtered_habits_on(
        &self,
        filter: HabitFilter,
        today: NaiveDate,
    ) -> FilteredHabits<'_> {
        filter_habits(&self.habits, filter, today)
    }

    /// Drop every habit and restart the profile's join date, keeping its name.
    pub async fn clear_all(&mut self) {
        let removed = self.habits.len();
        self.habits.clear();
        self.user.created_at = self.clock.now();
        info!(removed, "Cleared all habits");
        self.persist().await;
    }

    /// Snapshot of the state as a document.
    pub fn to_document(&self) -> TrackerDocument {
        TrackerDocument {
            user: self.user.clone(),
            habits: self.habits.clone(),
        }
    }

    /// Save the full state. Failures are logged and recorded in
    /// [`Tracker::last_save_failed`]; in-memory state is never rolled back.
    pub async fn persist(&mut self) {
        let document = self.to_document();
        match self.storage.save(&document).await {
            Ok(()) => self.last_save_failed = false,
            Err(e) => {
                self.last_save_failed = true;
                self.failed_saves += 1;
                error!(
                    location = %self.storage.location(),
                    error = %e,
                    failed_saves = self.failed_saves,
                    "Failed to save tracker state; changes are kept in memory only"
                );
            }
        }
    }

    fn index_of(&self, r: &HabitRef) -> Option<usize> {
        match r {
            HabitRef::Position(p) if *p < self.habits.len() => Some(*p),
            HabitRef::Position(_) => None,
            HabitRef::Id(id) => self.position_of(id),
        }
    }

    fn ensure_valid_targets(&mut self) {
        for habit in &mut self.habits {
            if habit.target_frequency == 0 {
                warn!(habit_id = %habit.id, name = %habit.name, "Weekly target of 0 raised to 1");
                habit.target_frequency = 1;
            }
        }
    }

    fn ensure_unique_ids(&mut self) {
        let mut seen = HashSet::new();
        for habit in &mut self.habits {
            if !seen.insert(habit.id.clone()) {
                let fresh = HabitId::new();
                warn!(old = %habit.id, new = %fresh, name = %habit.name, "Duplicate habit id reassigned");
                habit.id = fresh.clone();
                seen.insert(fresh);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Duration};
    use habitkit_core::FixedClock;
    use habitkit_storage::MemoryStorage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn open_tracker() -> (Tracker<MemoryStorage, FixedClock>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let tracker = Tracker::open(storage.clone(), FixedClock::on(today()), "Ada").await;
        (tracker, storage)
    }

    #[tokio::test]
    async fn test_open_initialises_missing_store() {
        let (tracker, storage) = open_tracker().await;

        assert!(tracker.is_empty());
        assert_eq!(tracker.user().name, "Ada");
        let saved = storage.document().unwrap();
        assert!(saved.habits.is_empty());
        assert_eq!(saved.user.name, "Ada");
    }

    #[tokio::test]
    async fn test_open_loads_existing_document() {
        let (mut tracker, storage) = open_tracker().await;
        tracker.add_habit("Read", 3, Some("Mind".to_string())).await.unwrap();
        tracker.complete_habit(&HabitRef::Position(0)).await.unwrap();

        let reopened = Tracker::open(storage.clone(), FixedClock::on(today()), "Someone else").await;

        assert_eq!(reopened.to_document(), tracker.to_document());
        assert_eq!(reopened.user().name, "Ada");
    }

    #[tokio::test]
    async fn test_add_habit_persists() {
        let (mut tracker, storage) = open_tracker().await;

        let habit = tracker.add_habit("  Walk  ", 5, None).await.unwrap();
        assert_eq!(habit.name, "Walk");
        assert_eq!(habit.category, "General");

        let saved = storage.document().unwrap();
        assert_eq!(saved.habits.len(), 1);
        assert_eq!(saved.habits[0].name, "Walk");
    }

    #[tokio::test]
    async fn test_add_habit_validation() {
        let (mut tracker, storage) = open_tracker().await;
        let saves = storage.save_count();

        assert_eq!(tracker.add_habit("   ", 1, None).await.unwrap_err(), TrackerError::EmptyName);
        assert_eq!(
            tracker.add_habit("Read", 0, None).await.unwrap_err(),
            TrackerError::InvalidTarget(0)
        );
        assert!(tracker.is_empty());
        assert_eq!(storage.save_count(), saves);
    }

    #[tokio::test]
    async fn test_complete_habit_idempotent() {
        let (mut tracker, _storage) = open_tracker().await;
        tracker.add_habit("Read", 1, None).await.unwrap();

        assert!(tracker.complete_habit(&HabitRef::Position(0)).await.unwrap());
        assert!(!tracker.complete_habit(&HabitRef::Position(0)).await.unwrap());
        assert_eq!(tracker.habits()[0].total_completions(), 1);
    }

    #[tokio::test]
    async fn test_complete_by_id_and_missing() {
        let (mut tracker, _storage) = open_tracker().await;
        let id = tracker.add_habit("Read", 1, None).await.unwrap().id.clone();

        assert!(tracker.complete_habit(&HabitRef::Id(id)).await.unwrap());

        let missing = HabitRef::Id(HabitId::from("nope"));
        assert_eq!(
            tracker.complete_habit(&missing).await.unwrap_err(),
            TrackerError::NotFound(missing.clone())
        );
    }

    #[tokio::test]
    async fn test_delete_out_of_range_leaves_collection() {
        let (mut tracker, _storage) = open_tracker().await;
        tracker.add_habit("Read", 1, None).await.unwrap();
        tracker.add_habit("Walk", 1, None).await.unwrap();

        let err = tracker.delete_habit(&HabitRef::Position(5)).await.unwrap_err();
        assert_eq!(err, TrackerError::NotFound(HabitRef::Position(5)));
        assert_eq!(tracker.len(), 2);

        let removed = tracker.delete_habit(&HabitRef::Position(0)).await.unwrap();
        assert_eq!(removed.name, "Read");
        assert_eq!(tracker.habits()[0].name, "Walk");
    }

    #[tokio::test]
    async fn test_summary_stats() {
        let storage = MemoryStorage::new();
        let clock = FixedClock::on(today());
        let mut tracker = Tracker::open(storage, clock, "Ada").await;
        tracker.add_habit("Read", 1, None).await.unwrap();
        tracker.add_habit("Walk", 2, None).await.unwrap();
        tracker.add_habit("Swim", 1, None).await.unwrap();
        tracker.complete_habit(&HabitRef::Position(0)).await.unwrap();
        tracker.complete_habit(&HabitRef::Position(1)).await.unwrap();

        let stats = tracker.summary_stats();
        assert_eq!(
            stats,
            SummaryStats { total: 3, on_track: 1, not_on_track: 2, days_joined: 0 }
        );
    }

    #[tokio::test]
    async fn test_days_joined_from_loaded_profile() {
        let now = FixedClock::on(today()).now();
        let user = UserProfile::new("Ada", now - Duration::days(10));
        let storage = MemoryStorage::with_document(TrackerDocument::empty(user));

        let tracker = Tracker::open(storage, FixedClock::on(today()), "Ada").await;
        assert_eq!(tracker.summary_stats().days_joined, 10);
    }

    #[tokio::test]
    async fn test_filtered_habits_scenarios() {
        let (mut tracker, _storage) = open_tracker().await;
        assert_eq!(tracker.filtered_habits(HabitFilter::Completed), FilteredHabits::NothingToShow);
        assert_eq!(tracker.filtered_habits(HabitFilter::Active), FilteredHabits::Habits(vec![]));

        tracker.add_habit("Read", 3, None).await.unwrap();
        tracker.complete_habit(&HabitRef::Position(0)).await.unwrap();
        assert!(matches!(
            tracker.filtered_habits(HabitFilter::Completed),
            FilteredHabits::PartialProgress(ref h) if h.len() == 1
        ));

        for n in 1..3 {
            let day = today().checked_sub_days(Days::new(n)).unwrap();
            tracker.complete_habit_on(&HabitRef::Position(0), day).await.unwrap();
        }
        assert!(matches!(
            tracker.filtered_habits(HabitFilter::Completed),
            FilteredHabits::Habits(ref h) if h.len() == 1
        ));
        assert_eq!(tracker.habits()[0].current_streak(today()), 3);
    }

    #[tokio::test]
    async fn test_clear_all_keeps_name_resets_join_date() {
        let now = FixedClock::on(today()).now();
        let user = UserProfile::new("Ada", now - Duration::days(30));
        let storage = MemoryStorage::with_document(TrackerDocument::empty(user));
        let mut tracker = Tracker::open(storage.clone(), FixedClock::on(today()), "Other").await;
        tracker.add_habit("Read", 1, None).await.unwrap();

        tracker.clear_all().await;

        assert!(tracker.is_empty());
        assert_eq!(tracker.user().name, "Ada");
        assert_eq!(tracker.user().created_at, now);
        assert_eq!(storage.document().unwrap().habits.len(), 0);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_mutation() {
        let (mut tracker, storage) = open_tracker().await;
        storage.set_fail_saves(true);

        tracker.add_habit("Read", 1, None).await.unwrap();

        assert!(tracker.last_save_failed());
        assert_eq!(tracker.failed_saves(), 1);
        assert_eq!(tracker.len(), 1);
        assert!(storage.document().unwrap().habits.is_empty());

        storage.set_fail_saves(false);
        tracker.complete_habit(&HabitRef::Position(0)).await.unwrap();
        assert!(!tracker.last_save_failed());
        assert_eq!(tracker.failed_saves(), 1);
        assert_eq!(storage.document().unwrap().habits.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_reassigned_on_load() {
        let now = FixedClock::on(today()).now();
        let mut doc = TrackerDocument::empty(UserProfile::new("Ada", now));
        let first = Habit::new("Read", 1, None, now);
        let mut second = Habit::new("Walk", 1, None, now);
        second.id = first.id.clone();
        doc.habits = vec![first, second];

        let tracker = Tracker::open(MemoryStorage::with_document(doc), FixedClock::on(today()), "Ada").await;

        assert_ne!(tracker.habits()[0].id, tracker.habits()[1].id);
    }

    #[tokio::test]
    async fn test_zero_target_raised_on_load() {
        let now = FixedClock::on(today()).now();
        let mut doc = TrackerDocument::empty(UserProfile::new("Ada", now));
        let mut habit = Habit::new("Read", 1, None, now);
        habit.target_frequency = 0;
        doc.habits.push(habit);

        let tracker = Tracker::open(MemoryStorage::with_document(doc), FixedClock::on(today()), "Ada").await;

        let habit = &tracker.habits()[0];
        assert_eq!(habit.target_frequency, 1);
        assert!(!habit.is_on_track_this_week(today()));
        assert_eq!(habit.progress_percentage(today()), 0);
        assert_eq!(tracker.summary_stats().on_track, 0);
    }

    #[tokio::test]
    async fn test_stats_and_filter_on_explicit_date() {
        let (mut tracker, _storage) = open_tracker().await;
        tracker.add_habit("Read", 1, None).await.unwrap();
        tracker.complete_habit(&HabitRef::Position(0)).await.unwrap();

        let next_week = today().checked_add_days(Days::new(7)).unwrap();
        let (now, _) = tracker.now_and_today();
        assert_eq!(tracker.summary_stats_on(now, today()).on_track, 1);
        assert_eq!(tracker.summary_stats_on(now, next_week).on_track, 0);
        assert_eq!(
            tracker.filtered_habits_on(HabitFilter::Completed, next_week),
            FilteredHabits::NothingToShow
        );
    }

    #[test]
    fn test_habit_ref_display() {
        assert_eq!(HabitRef::Position(0).to_string(), "#1");
        assert_eq!(HabitRef::Id(HabitId::from("abc")).to_string(), "abc");
    }
}
