//! Periodic habit reminder.
//!
//! A background task that wakes on a fixed interval, picks a habit and
//! prints a nudge. It only reads tracker state.

use std::sync::Arc;
use std::time::Duration;

use habitkit_core::Clock;
use habitkit_storage::Storage;
use habitkit_tracker::{next_reminder, Tracker};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a running reminder task.
pub struct ReminderTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderTask {
    /// Spawn the reminder loop. The first reminder fires after one `every`.
    ///
    /// `emit` receives each reminder line.
    pub fn start<S, C, F>(tracker: Arc<RwLock<Tracker<S, C>>>, every: Duration, emit: F) -> Self
    where
        S: Storage + 'static,
        C: Clock + 'static,
        F: Fn(String) + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut tick = 0usize;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                let line = {
                    let tracker = tracker.read().await;
                    let today = tracker.today();
                    next_reminder(tracker.habits(), today, tick).map(|habit| {
                        format!(
                            "[reminder] Don't forget \"{}\": {}/{} this week.",
                            habit.name,
                            habit.weekly_count(today),
                            habit.target_frequency
                        )
                    })
                };
                tick = tick.wrapping_add(1);

                match line {
                    Some(line) => emit(line),
                    None => debug!("No habits to remind about"),
                }
            }
            debug!("Reminder task stopped");
        });

        info!(every_secs = every.as_secs(), "Reminder task started");
        Self { stop, handle }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Reminder task ended abnormally");
        }
    }
}
