//! Demonstration data.

use chrono::Days;
use habitkit_core::Clock;
use habitkit_storage::Storage;
use habitkit_tracker::{HabitRef, Tracker};
use tracing::warn;

/// Name, weekly target, category and days-ago offsets that were completed.
const SAMPLES: &[(&str, u32, &str, &[u64])] = &[
    ("Drink water", 7, "Health", &[0, 1, 2, 3, 4, 5, 6]),
    ("Read 20 pages", 4, "Learning", &[0, 1, 3]),
    ("Exercise", 3, "Fitness", &[1, 2, 4, 8, 9]),
    ("Meditate", 5, "Mindfulness", &[]),
];

/// Add the sample habits and backfill their history. Returns how many were
/// added.
pub async fn seed<S: Storage, C: Clock>(tracker: &mut Tracker<S, C>) -> usize {
    let today = tracker.today();
    let mut added = 0;

    for (name, target, category, days_ago) in SAMPLES {
        let id = match tracker.add_habit(name, *target, Some(category.to_string())).await {
            Ok(habit) => habit.id.clone(),
            Err(e) => {
                warn!(name, error = %e, "Skipping demo habit");
                continue;
            }
        };
        added += 1;

        let habit = HabitRef::Id(id);
        for &n in *days_ago {
            let Some(date) = today.checked_sub_days(Days::new(n)) else {
                continue;
            };
            if let Err(e) = tracker.complete_habit_on(&habit, date).await {
                warn!(name, error = %e, "Could not backfill demo completion");
            }
        }
    }
    added
}
