//! Text rendering for habits, stats and the profile.

use chrono::NaiveDate;
use habitkit_core::{Habit, HabitStatus, Time, UserProfile};
use habitkit_tracker::SummaryStats;

const BAR_WIDTH: usize = 10;

/// `[#####-----]` style bar for a 0..=100 percentage.
pub fn progress_bar(percentage: u8) -> String {
    let filled = usize::from(percentage.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One listing line for the habit at one-based `number`.
pub fn habit_line(number: usize, habit: &Habit, today: NaiveDate) -> String {
    let pct = habit.progress_percentage(today);
    let marker = match habit.status(today) {
        HabitStatus::OnTrack => "*",
        HabitStatus::Active => " ",
    };
    format!(
        "{number:>3}.{marker} {name} ({category}) {done}/{target} this week {bar} {pct}% | streak {streak} | {status}",
        name = habit.name,
        category = habit.category,
        done = habit.weekly_count(today),
        target = habit.target_frequency,
        bar = progress_bar(pct),
        streak = habit.current_streak(today),
        status = habit.status(today),
    )
}

/// Summary block followed by per-habit detail.
pub fn stats_report(stats: &SummaryStats, habits: &[Habit], today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("=== Stats ===\n");
    out.push_str(&format!("Total habits:   {}\n", stats.total));
    out.push_str(&format!("On track:       {}\n", stats.on_track));
    out.push_str(&format!("Not on track:   {}\n", stats.not_on_track));
    out.push_str(&format!("Days joined:    {}\n", stats.days_joined));

    if !habits.is_empty() {
        out.push('\n');
        for habit in habits {
            let last = habit
                .last_completed()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string());
            out.push_str(&format!(
                "{}: {}% this week, streak {} (best {}), {} total, last {}\n",
                habit.name,
                habit.progress_percentage(today),
                habit.current_streak(today),
                habit.longest_streak(),
                habit.total_completions(),
                last,
            ));
        }
    }
    out
}

/// Profile block.
pub fn profile_report(user: &UserProfile, now: Time) -> String {
    format!(
        "=== Profile ===\nName:        {}\nJoined:      {}\nDays joined: {}\n",
        user.name,
        user.created_at.format("%Y-%m-%d"),
        user.days_joined(now),
    )
}
