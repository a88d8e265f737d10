//! Remote preset storage.
//!
//! The remote store is an opaque key/value HTTP service: `GET` returns a raw
//! preset document by id, `POST` with an optional id upserts and returns the
//! effective id. Transport-level retry and timeout policy is the remote
//! store's concern, not this client's. Recency summaries stay local even for
//! cloud saves.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PresetError, PresetResult};
use crate::preset::schema::{EQUIPMENT_SLOT_COUNT, INVENTORY_SLOT_COUNT};
use crate::preset::summary::PresetSummary;
use crate::storage::local::LEGACY_IMAGE_FIELD;
use crate::storage::recents::RecentStore;
use crate::storage::PresetStorage;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Remote key/value back end.
#[derive(Debug, Clone)]
pub struct CloudStore {
    client: reqwest::Client,
    base_url: String,
    recents: RecentStore,
}

impl CloudStore {
    pub fn new(base_url: impl Into<String>, recents: RecentStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            recents,
        }
    }

    fn preset_url(&self, id: &str) -> String {
        format!("{}/presets/{id}", self.base_url)
    }

    /// Pre-upload cleanup: the legacy image field is never persisted and
    /// over-length slot arrays are clamped to their fixed sizes.
    fn sanitize_payload(preset: &Value) -> Value {
        let mut payload = preset.clone();
        if let Some(fields) = payload.as_object_mut() {
            fields.remove(LEGACY_IMAGE_FIELD);
            for (key, max) in [
                ("inventorySlots", INVENTORY_SLOT_COUNT),
                ("equipmentSlots", EQUIPMENT_SLOT_COUNT),
            ] {
                if let Some(slots) = fields.get_mut(key).and_then(Value::as_array_mut) {
                    slots.truncate(max);
                }
            }
        }
        payload
    }
}

#[async_trait]
impl PresetStorage for CloudStore {
    async fn get_preset(&self, id: &str) -> PresetResult<Value> {
        let response = self.client.get(self.preset_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PresetError::not_found(id));
        }

        let raw = response.error_for_status()?.json::<Value>().await?;
        Ok(raw)
    }

    async fn save_preset(&self, preset: &Value, id: Option<&str>) -> PresetResult<String> {
        let payload = Self::sanitize_payload(preset);

        let mut request = self
            .client
            .post(format!("{}/presets", self.base_url))
            .json(&payload);
        if let Some(id) = id {
            request = request.query(&[("id", id)]);
        }

        let response = request
            .send()
            .await?
            .error_for_status()?
            .json::<UploadResponse>()
            .await?;

        log::debug!("Saved preset to cloud: {}", response.id);
        Ok(response.id)
    }

    async fn list_recent_presets(&self) -> PresetResult<Vec<PresetSummary>> {
        Ok(self.recents.load().await)
    }

    async fn save_to_recent_presets(&self, summary: PresetSummary) -> PresetResult<()> {
        self.recents.push(summary).await
    }
}
