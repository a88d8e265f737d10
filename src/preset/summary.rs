//! Recency-list summaries.

use serde::{Deserialize, Serialize};

/// Which back end a preset lives in. Doubles as the persistence router's
/// mode flag; the wire form is the same `"local" | "cloud"` tag either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Local,
    Cloud,
}

impl StorageMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

/// A lightweight pointer to a saved preset, used for recency lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub preset_id: String,
    pub preset_name: String,
    pub source: StorageMode,
}

/// Push a summary onto a most-recent-first list: an existing entry with the
/// same id is evicted, the new entry goes to the front, and the list is
/// truncated to `cap`.
pub fn push_recent(list: &mut Vec<PresetSummary>, summary: PresetSummary, cap: usize) {
    list.retain(|p| p.preset_id != summary.preset_id);
    list.insert(0, summary);
    list.truncate(cap);
}
