//! Runtime configuration assembled from command-line options.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the tracker document inside the storage directory.
pub const DOCUMENT_FILE: &str = "tracker.json";

/// Fallback display name when none is given and `$USER` is unset.
pub const DEFAULT_USER: &str = "Friend";

/// Settings for a habitkit session.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Directory holding the tracker document
    pub storage_dir: PathBuf,
    /// Name for a newly created profile
    pub user_name: String,
    /// Reminder period; `None` disables reminders
    pub remind_every: Option<Duration>,
}

impl ShellConfig {
    /// Build from raw option values.
    pub fn new(storage_dir: PathBuf, user_name: Option<String>, remind_every_secs: u64) -> Self {
        let user_name = user_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(default_user_name)
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Self {
            storage_dir,
            user_name,
            remind_every: (remind_every_secs > 0).then(|| Duration::from_secs(remind_every_secs)),
        }
    }

    /// Full path of the tracker document.
    pub fn document_path(&self) -> PathBuf {
        document_path(&self.storage_dir)
    }
}

fn document_path(dir: &Path) -> PathBuf {
    dir.join(DOCUMENT_FILE)
}

fn default_user_name() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|n| n.trim().to_string())
        .find(|n| !n.is_empty())
}
