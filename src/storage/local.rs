//! Local preset storage.
//!
//! One JSON document per preset, keyed by a prefixed identifier inside the
//! data directory. Absence of the file is a normal not-found condition; a
//! file that exists but fails to parse is a data-integrity error and
//! propagates as such — it is never masked as an absence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{PresetError, PresetResult};
use crate::preset::summary::PresetSummary;
use crate::storage::recents::RecentStore;
use crate::storage::PresetStorage;

/// Legacy field retained only for compatibility on read; never written.
pub(crate) const LEGACY_IMAGE_FIELD: &str = "presetImage";

/// Local filesystem back end.
#[derive(Debug, Clone)]
pub struct LocalStore {
    preset_dir: PathBuf,
    recents: RecentStore,
}

impl LocalStore {
    pub fn new(data_dir: &Path, recent_cap: usize) -> Self {
        Self {
            preset_dir: data_dir.join("presets"),
            recents: RecentStore::new(data_dir, recent_cap),
        }
    }

    fn preset_path(&self, id: &str) -> PathBuf {
        self.preset_dir.join(format!("preset-{id}.json"))
    }
}

#[async_trait]
impl PresetStorage for LocalStore {
    async fn get_preset(&self, id: &str) -> PresetResult<Value> {
        let path = self.preset_path(id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PresetError::not_found(id));
            }
            Err(e) => return Err(e.into()),
        };

        let mut raw: Value = serde_json::from_str(&contents)?;
        if let Some(fields) = raw.as_object_mut() {
            // Records saved before ids were embedded carry none; default to
            // the requested id.
            fields
                .entry("presetId")
                .or_insert_with(|| Value::String(id.to_string()));
        }
        Ok(raw)
    }

    async fn save_preset(&self, preset: &Value, id: Option<&str>) -> PresetResult<String> {
        let preset_id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut payload = preset.clone();
        if let Some(fields) = payload.as_object_mut() {
            fields.remove(LEGACY_IMAGE_FIELD);
            fields.insert("presetId".to_string(), Value::String(preset_id.clone()));
        }

        tokio::fs::create_dir_all(&self.preset_dir).await?;
        let contents = serde_json::to_string(&payload)?;
        tokio::fs::write(self.preset_path(&preset_id), contents).await?;

        log::debug!("Saved preset locally: {preset_id}");
        Ok(preset_id)
    }

    async fn list_recent_presets(&self) -> PresetResult<Vec<PresetSummary>> {
        Ok(self.recents.load().await)
    }

    async fn save_to_recent_presets(&self, summary: PresetSummary) -> PresetResult<()> {
        self.recents.push(summary).await
    }
}
