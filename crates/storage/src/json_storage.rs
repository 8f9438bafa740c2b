//! JSON file storage implementation.
//!
//! Stores the whole tracker document as a single pretty-printed JSON file.
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a crash mid-write leaves the previous document in place.

use std::path::{Path, PathBuf};

use habitkit_core::TrackerDocument;
use tokio::fs;
use tracing::debug;

use super::{Result, Storage};

/// File-based JSON storage backend.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Create storage backed by the file at `path`. Nothing is touched on
    /// disk until the first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tracker.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load(&self) -> Result<Option<TrackerDocument>> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document: TrackerDocument = serde_json::from_str(&json)?;
        debug!(
            path = %self.path.display(),
            habits = document.habits.len(),
            "Loaded tracker document"
        );
        Ok(Some(document))
    }

    async fn save(&mut self, document: &TrackerDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(
            path = %self.path.display(),
            habits = document.habits.len(),
            "Saved tracker document"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
