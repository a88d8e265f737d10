//! Preset persistence.
//!
//! Two interchangeable back ends (`local`, `cloud`) implement one async
//! storage contract; the router dispatches on a mode flag and provides the
//! unified local-then-cloud lookup. Back ends traffic in RAW documents
//! (`serde_json::Value`): normalization happens above this layer, so legacy
//! documents round-trip untouched until they are re-saved.
//!
//! # Modules
//!
//! - `local` - one JSON document per preset in the data directory
//! - `cloud` - the opaque remote key/value preset service
//! - `recents` - the single well-known recency-list document
//! - `router` - mode dispatch and unified fallback lookup

pub mod cloud;
pub mod local;
pub mod recents;
pub mod router;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PresetResult;
use crate::preset::summary::PresetSummary;

pub use cloud::CloudStore;
pub use local::LocalStore;
pub use recents::RecentStore;
pub use router::{LoadedPreset, StorageRouter};

/// Storage adapter contract. RAW documents only.
#[async_trait]
pub trait PresetStorage: Send + Sync {
    /// Fetch the raw document stored under `id`.
    ///
    /// Fails with [`crate::error::PresetError::NotFound`] when no record
    /// exists for the id under this back end.
    async fn get_preset(&self, id: &str) -> PresetResult<Value>;

    /// Upsert a raw document. Without an id a fresh unique identifier is
    /// generated; with one, the existing record is overwritten. Returns the
    /// effective id.
    async fn save_preset(&self, preset: &Value, id: Option<&str>) -> PresetResult<String>;

    /// The recency list, most-recent-first.
    async fn list_recent_presets(&self) -> PresetResult<Vec<PresetSummary>>;

    /// Dedup/truncate update of the recency list.
    async fn save_to_recent_presets(&self, summary: PresetSummary) -> PresetResult<()>;
}
