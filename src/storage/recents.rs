//! The recency-list document.
//!
//! A single JSON array under one well-known file, most-recent-first,
//! last-writer-wins with no merge. Both back ends share it: cloud saves
//! still record their summaries locally.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::PresetResult;
use crate::preset::summary::{push_recent, PresetSummary};

/// Well-known file name of the recency list.
pub const RECENT_PRESETS_FILE: &str = "recent-presets.json";

/// Reader/writer for the recency list.
#[derive(Debug, Clone)]
pub struct RecentStore {
    path: PathBuf,
    cap: usize,
}

impl RecentStore {
    pub fn new(data_dir: &Path, cap: usize) -> Self {
        Self {
            path: data_dir.join(RECENT_PRESETS_FILE),
            cap,
        }
    }

    /// Load the list. An absent or unreadable document is a normal empty
    /// list; entries without a usable id are dropped.
    pub async fn load(&self) -> Vec<PresetSummary> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(entries) => entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
            Err(e) => {
                log::warn!("Discarding malformed recency list: {e}");
                Vec::new()
            }
        }
    }

    /// Overwrite the list (last-writer-wins).
    pub async fn save(&self, list: &[PresetSummary]) -> PresetResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string(list)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }

    /// Move (or insert) a summary at the front and persist.
    pub async fn push(&self, summary: PresetSummary) -> PresetResult<()> {
        let mut list = self.load().await;
        push_recent(&mut list, summary, self.cap);
        self.save(&list).await
    }
}
