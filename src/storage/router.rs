//! Mode dispatch and unified lookup.

use std::sync::Arc;

use serde_json::Value;

use crate::config::AppConfig;
use crate::error::PresetResult;
use crate::preset::summary::StorageMode;
use crate::storage::recents::RecentStore;
use crate::storage::{CloudStore, LocalStore, PresetStorage};

/// A raw document fetched through the unified lookup, together with its
/// effective id and the back end it came from.
#[derive(Debug, Clone)]
pub struct LoadedPreset {
    pub raw: Value,
    pub preset_id: String,
    pub source: StorageMode,
}

/// Routes storage operations to the chosen back end.
pub struct StorageRouter {
    local: Arc<dyn PresetStorage>,
    cloud: Arc<dyn PresetStorage>,
}

impl StorageRouter {
    pub fn new(local: Arc<dyn PresetStorage>, cloud: Arc<dyn PresetStorage>) -> Self {
        Self { local, cloud }
    }

    /// Build both default back ends from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let data_dir = config.data_dir();
        let cap = config.recent_limit();
        let local = LocalStore::new(&data_dir, cap);
        let cloud = CloudStore::new(
            config.storage.remote_base_url.clone(),
            RecentStore::new(&data_dir, cap),
        );
        Self::new(Arc::new(local), Arc::new(cloud))
    }

    /// The back end for a storage mode.
    pub fn backend(&self, mode: StorageMode) -> &Arc<dyn PresetStorage> {
        match mode {
            StorageMode::Local => &self.local,
            StorageMode::Cloud => &self.cloud,
        }
    }

    /// Unified lookup: local first, then cloud.
    ///
    /// The fallback fires on a not-found condition ONLY. Any other local
    /// failure (e.g. a malformed stored document) is a data-integrity bug,
    /// not an absence, and propagates without consulting the cloud.
    #[tracing::instrument(skip(self))]
    pub async fn load_preset_by_id(&self, id: &str) -> PresetResult<LoadedPreset> {
        match self.local.get_preset(id).await {
            Ok(raw) => Ok(loaded(raw, id, StorageMode::Local)),
            Err(e) if e.is_not_found() => {
                log::debug!("Preset {id} not found locally, trying cloud");
                let raw = self.cloud.get_preset(id).await?;
                Ok(loaded(raw, id, StorageMode::Cloud))
            }
            Err(e) => Err(e),
        }
    }
}

/// An id embedded in the document wins over the requested one.
fn loaded(raw: Value, requested_id: &str, source: StorageMode) -> LoadedPreset {
    let preset_id = raw
        .get("presetId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| requested_id.to_string());
    LoadedPreset {
        raw,
        preset_id,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::recents::RecentStore;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn router(server: &MockServer, dir: &TempDir) -> StorageRouter {
        StorageRouter::new(
            Arc::new(LocalStore::new(dir.path(), 10)),
            Arc::new(CloudStore::new(
                server.uri(),
                RecentStore::new(dir.path(), 10),
            )),
        )
    }

    #[tokio::test]
    async fn test_local_hit_short_circuits() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = router(&server, &dir).await;

        router
            .backend(StorageMode::Local)
            .save_preset(&json!({ "presetName": "Rax" }), Some("here"))
            .await
            .unwrap();

        let loaded = router.load_preset_by_id("here").await.unwrap();
        assert_eq!(loaded.source, StorageMode::Local);
        assert_eq!(loaded.preset_id, "here");
        // No cloud traffic at all.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_falls_back_to_cloud() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/presets/remote-only"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "presetId": "remote-only",
                "presetName": "Cloud Rax"
            })))
            .mount(&server)
            .await;

        let loaded = router(&server, &dir)
            .await
            .load_preset_by_id("remote-only")
            .await
            .unwrap();
        assert_eq!(loaded.source, StorageMode::Cloud);
        assert_eq!(loaded.raw["presetName"], "Cloud Rax");
    }

    #[tokio::test]
    async fn test_local_corruption_does_not_fall_back() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let presets = dir.path().join("presets");
        tokio::fs::create_dir_all(&presets).await.unwrap();
        tokio::fs::write(presets.join("preset-bad.json"), "{ nope")
            .await
            .unwrap();

        let err = router(&server, &dir)
            .await
            .load_preset_by_id("bad")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::PresetError::Serialization(_)));
        // The cloud was never consulted.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_everywhere_surfaces_not_found() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/presets/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = router(&server, &dir)
            .await
            .load_preset_by_id("ghost")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_embedded_id_wins() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = router(&server, &dir).await;

        let presets = dir.path().join("presets");
        tokio::fs::create_dir_all(&presets).await.unwrap();
        tokio::fs::write(
            presets.join("preset-alias.json"),
            r#"{"presetId": "canonical", "presetName": "Rax"}"#,
        )
        .await
        .unwrap();

        let loaded = router.load_preset_by_id("alias").await.unwrap();
        assert_eq!(loaded.preset_id, "canonical");
    }
}
