//! Reminder selection.

use chrono::NaiveDate;
use habitkit_core::Habit;

/// Pick the habit to remind about on the `tick`-th reminder.
///
/// Rotates through habits that are not on track this week; once every habit
/// is on track it rotates through all of them. Read-only.
pub fn next_reminder(habits: &[Habit], today: NaiveDate, tick: usize) -> Option<&Habit> {
    let pending: Vec<&Habit> = habits
        .iter()
        .filter(|h| !h.is_on_track_this_week(today))
        .collect();

    if pending.is_empty() {
        if habits.is_empty() {
            return None;
        }
        return habits.get(tick % habits.len());
    }
    pending.get(tick % pending.len()).copied()
}
