//! Tracker actions shared by the interactive shell and one-shot subcommands.
//!
//! Each action writes its user-facing output to `out` and returns whether it
//! succeeded. Validation and reference errors are reported, not propagated;
//! only output failures surface as errors.

use std::io::Write;

use anyhow::Result;
use habitkit_core::Clock;
use habitkit_storage::Storage;
use habitkit_tracker::{FilteredHabits, HabitFilter, HabitRef, Tracker, TrackerError};

use crate::render;

/// Turn a one-based number typed by the user into a habit reference.
pub fn parse_position(input: &str) -> Option<HabitRef> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Some(HabitRef::Position(n - 1)),
        _ => None,
    }
}

/// Add a habit.
pub async fn add<S: Storage, C: Clock, W: Write>(
    tracker: &mut Tracker<S, C>,
    out: &mut W,
    name: &str,
    target: u32,
    category: Option<String>,
) -> Result<bool> {
    let added = match tracker.add_habit(name, target, category).await {
        Ok(habit) => {
            writeln!(
                out,
                "Added \"{}\" ({}), target {} per week.",
                habit.name, habit.category, habit.target_frequency
            )?;
            true
        }
        Err(e) => {
            writeln!(out, "Could not add habit: {e}.")?;
            false
        }
    };
    warn_if_unsaved(tracker, out)?;
    Ok(added)
}

/// List habits matching `filter`.
pub fn list<S: Storage, C: Clock, W: Write>(
    tracker: &Tracker<S, C>,
    out: &mut W,
    filter: HabitFilter,
) -> Result<bool> {
    let today = tracker.today();
    let result = tracker.filtered_habits_on(filter, today);

    let heading = match (&result, filter) {
        (FilteredHabits::PartialProgress(_), _) => {
            "No habits are on track yet. In progress this week:".to_string()
        }
        (FilteredHabits::NothingToShow, _) => {
            writeln!(out, "Nothing to show: no habit has any completion this week.")?;
            return Ok(true);
        }
        (FilteredHabits::Habits(h), HabitFilter::All) if h.is_empty() => {
            writeln!(out, "No habits yet. Add one to get started.")?;
            return Ok(true);
        }
        (FilteredHabits::Habits(h), HabitFilter::Active) if h.is_empty() => {
            writeln!(out, "No active habits: everything is on track this week.")?;
            return Ok(true);
        }
        (FilteredHabits::Habits(_), HabitFilter::All) => "All habits:".to_string(),
        (FilteredHabits::Habits(_), HabitFilter::Active) => "Active habits:".to_string(),
        (FilteredHabits::Habits(_), HabitFilter::Completed) => {
            "On track this week:".to_string()
        }
    };

    writeln!(out, "{heading}")?;
    for habit in result.habits() {
        let number = tracker.position_of(&habit.id).map(|p| p + 1).unwrap_or(0);
        writeln!(out, "{}", render::habit_line(number, habit, today))?;
    }
    Ok(true)
}

/// Mark a habit complete for today.
pub async fn complete<S: Storage, C: Clock, W: Write>(
    tracker: &mut Tracker<S, C>,
    out: &mut W,
    habit: &HabitRef,
) -> Result<bool> {
    let today = tracker.today();
    let ok = match tracker.complete_habit_on(habit, today).await {
        Ok(recorded) => {
            if let Some(h) = tracker.habit(habit) {
                if recorded {
                    writeln!(
                        out,
                        "Marked \"{}\" complete for today. {}/{} this week, streak {}.",
                        h.name,
                        h.weekly_count(today),
                        h.target_frequency,
                        h.current_streak(today)
                    )?;
                } else {
                    writeln!(out, "\"{}\" was already completed today.", h.name)?;
                }
            }
            true
        }
        Err(e) => {
            report(out, &e)?;
            false
        }
    };
    warn_if_unsaved(tracker, out)?;
    Ok(ok)
}

/// Delete a habit.
pub async fn delete<S: Storage, C: Clock, W: Write>(
    tracker: &mut Tracker<S, C>,
    out: &mut W,
    habit: &HabitRef,
) -> Result<bool> {
    let ok = match tracker.delete_habit(habit).await {
        Ok(removed) => {
            writeln!(out, "Deleted \"{}\".", removed.name)?;
            true
        }
        Err(e) => {
            report(out, &e)?;
            false
        }
    };
    warn_if_unsaved(tracker, out)?;
    Ok(ok)
}

/// Print summary statistics.
pub fn stats<S: Storage, C: Clock, W: Write>(tracker: &Tracker<S, C>, out: &mut W) -> Result<bool> {
    let (now, today) = tracker.now_and_today();
    let stats = tracker.summary_stats_on(now, today);
    write!(out, "{}", render::stats_report(&stats, tracker.habits(), today))?;
    Ok(true)
}

/// Print the user profile.
pub fn profile<S: Storage, C: Clock, W: Write>(tracker: &Tracker<S, C>, out: &mut W) -> Result<bool> {
    write!(out, "{}", render::profile_report(tracker.user(), tracker.now()))?;
    Ok(true)
}

/// Seed sample habits with some history, then show stats.
pub async fn demo<S: Storage, C: Clock, W: Write>(
    tracker: &mut Tracker<S, C>,
    out: &mut W,
) -> Result<bool> {
    let added = crate::demo::seed(tracker).await;
    writeln!(out, "Demo: added {added} sample habits with recent history.")?;
    warn_if_unsaved(tracker, out)?;
    list(tracker, out, HabitFilter::All)?;
    writeln!(out)?;
    stats(tracker, out)
}

/// Remove every habit and restart the profile.
pub async fn reset<S: Storage, C: Clock, W: Write>(
    tracker: &mut Tracker<S, C>,
    out: &mut W,
) -> Result<bool> {
    tracker.clear_all().await;
    writeln!(out, "All habits cleared.")?;
    warn_if_unsaved(tracker, out)?;
    Ok(true)
}

fn report<W: Write>(out: &mut W, error: &TrackerError) -> Result<()> {
    match error {
        TrackerError::NotFound(r) => writeln!(out, "No habit {r}. Pick a number from the list.")?,
        other => writeln!(out, "Error: {other}.")?,
    }
    Ok(())
}

fn warn_if_unsaved<S: Storage, C: Clock, W: Write>(tracker: &Tracker<S, C>, out: &mut W) -> Result<()> {
    if tracker.last_save_failed() {
        writeln!(
            out,
            "Warning: could not save to {}; changes are kept for this session only.",
            tracker.storage_location()
        )?;
    }
    Ok(())
}
