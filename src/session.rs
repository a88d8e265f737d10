//! The editor session.
//!
//! One explicit struct owns everything the editor mutates: the live preset,
//! transient UI selection state, the dirty tracker, the storage mode, the
//! recency cache, and the in-flight load/save guards. Every mutation goes
//! through one canonical method per field/slot, and the dirty comparator is
//! re-evaluated after each one. Failed loads, imports, and saves never
//! corrupt the live preset.

use std::sync::Arc;

use serde_json::Value;

use crate::catalog::CatalogService;
use crate::config::AppConfig;
use crate::error::{PresetError, PresetResult};
use crate::preset::compare::DirtyTracker;
use crate::preset::normalize::Normalizer;
use crate::preset::schema::{BreakdownEntry, Preset, SlotRef, SlotType};
use crate::preset::summary::{PresetSummary, StorageMode};
use crate::preset::validate::{validate_at, Boundary};
use crate::storage::StorageRouter;

/// Which slot collection the UI currently targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionTarget {
    #[default]
    Inventory,
    Equipment,
    Relic,
    Familiar,
}

/// Transient UI selection state. Never persisted, never part of the dirty
/// comparison.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub slot_target: SelectionTarget,
    pub slot_index: Option<usize>,
    pub selected_slots: Vec<String>,
    pub slot_key: String,
}

/// Handle for an in-flight load. Finishing a token that has been superseded
/// by a newer `begin_load` is a no-op.
#[derive(Debug)]
pub struct LoadToken {
    id: String,
    seq: u64,
}

/// What happened to a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { source: StorageMode },
    /// The requested id is already the loaded one; nothing to do.
    AlreadyLoaded,
    /// A newer load started before this one completed; the stale result was
    /// discarded.
    Superseded,
}

/// The top-level editing state of one preset.
pub struct EditorSession {
    preset: Preset,
    ui: UiState,
    dirty: DirtyTracker,
    mode: StorageMode,
    router: Arc<StorageRouter>,
    normalizer: Normalizer,
    recent: Vec<PresetSummary>,
    /// Identity of the currently edited preset, if it has been persisted.
    preset_id: Option<String>,
    /// Last id a load completed for; a repeated load of it is skipped.
    last_loaded_id: Option<String>,
    load_seq: u64,
    is_saving: bool,
}

impl EditorSession {
    pub fn new(router: Arc<StorageRouter>, catalog: Arc<CatalogService>) -> Self {
        Self {
            preset: Preset::empty(),
            ui: UiState::default(),
            dirty: DirtyTracker::new(),
            mode: StorageMode::Local,
            router,
            normalizer: Normalizer::new(catalog),
            recent: Vec::new(),
            preset_id: None,
            last_loaded_id: None,
            load_seq: 0,
            is_saving: false,
        }
    }

    /// Build a session with the default back ends and catalog fetcher.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(StorageRouter::from_config(config)),
            Arc::new(CatalogService::new(config.catalog.clone())),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StorageMode) {
        self.mode = mode;
    }

    pub fn is_dirty(&self) -> Option<bool> {
        self.dirty.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn preset_id(&self) -> Option<&str> {
        self.preset_id.as_deref()
    }

    pub fn recent_presets(&self) -> &[PresetSummary] {
        &self.recent
    }

    /// The effective annotation for a slot: later entries shadow earlier
    /// ones for the same key.
    pub fn breakdown_for(&self, slot_type: SlotType, slot_index: usize) -> Option<&BreakdownEntry> {
        self.preset
            .breakdown
            .iter()
            .rev()
            .find(|b| b.slot_type == slot_type && b.slot_index == slot_index)
    }

    /// Re-establish the clean baseline from the current preset.
    pub fn mark_clean(&mut self) {
        self.dirty.mark_clean(&self.preset);
    }

    fn touch(&mut self) {
        self.dirty.observe(&self.preset);
    }

    // ========================================================================
    // Canonical editing actions
    // ========================================================================

    pub fn set_preset_name(&mut self, name: impl Into<String>) {
        self.preset.preset_name = name.into();
        self.touch();
    }

    pub fn set_preset_notes(&mut self, notes: impl Into<String>) {
        self.preset.preset_notes = notes.into();
        self.touch();
    }

    pub fn set_inventory_slot(&mut self, index: usize, slot: SlotRef) {
        set_slot(&mut self.preset.inventory_slots, index, slot, "inventory");
        self.touch();
    }

    pub fn set_equipment_slot(&mut self, index: usize, slot: SlotRef) {
        set_slot(&mut self.preset.equipment_slots, index, slot, "equipment");
        self.touch();
    }

    pub fn swap_inventory_slots(&mut self, source: usize, target: usize) {
        let slots = &mut self.preset.inventory_slots;
        if source < slots.len() && target < slots.len() {
            slots.swap(source, target);
        } else {
            log::warn!("Ignoring out-of-range inventory swap: {source} <-> {target}");
        }
        self.touch();
    }

    pub fn set_primary_relic(&mut self, index: usize, slot: Option<SlotRef>) {
        set_slot(
            &mut self.preset.relics.primary_relics,
            index,
            slot.unwrap_or_default(),
            "primary relic",
        );
        self.touch();
    }

    pub fn set_alternative_relic(&mut self, index: usize, slot: Option<SlotRef>) {
        set_slot(
            &mut self.preset.relics.alternative_relics,
            index,
            slot.unwrap_or_default(),
            "alternative relic",
        );
        self.touch();
    }

    pub fn set_primary_familiar(&mut self, index: usize, slot: Option<SlotRef>) {
        set_slot(
            &mut self.preset.familiars.primary_familiars,
            index,
            slot.unwrap_or_default(),
            "primary familiar",
        );
        self.touch();
    }

    pub fn set_alternative_familiar(&mut self, index: usize, slot: Option<SlotRef>) {
        set_slot(
            &mut self.preset.familiars.alternative_familiars,
            index,
            slot.unwrap_or_default(),
            "alternative familiar",
        );
        self.touch();
    }

    /// Upsert the annotation for its (slot type, slot index) key.
    pub fn set_breakdown_entry(&mut self, entry: BreakdownEntry) {
        if let Some(existing) = self
            .preset
            .breakdown
            .iter_mut()
            .find(|b| b.slot_type == entry.slot_type && b.slot_index == entry.slot_index)
        {
            existing.description = entry.description;
        } else {
            self.preset.breakdown.push(entry);
        }
        self.touch();
    }

    pub fn remove_breakdown_entry(&mut self, slot_type: SlotType, slot_index: usize) {
        self.preset
            .breakdown
            .retain(|b| !(b.slot_type == slot_type && b.slot_index == slot_index));
        self.touch();
    }

    /// Replace the whole preset (import/load application).
    pub fn import(&mut self, preset: Preset) {
        self.preset = preset;
        // Always clear selection when a preset loads.
        self.ui = UiState::default();
        self.touch();
    }

    /// Back to the blank template, as at application start.
    pub fn reset(&mut self) {
        self.preset = Preset::empty();
        self.ui = UiState::default();
        self.dirty.reset();
        self.preset_id = None;
        self.last_loaded_id = None;
    }

    // ========================================================================
    // UI selection actions
    // ========================================================================

    pub fn select_slot(&mut self, target: SelectionTarget, index: usize) {
        self.ui.slot_target = target;
        self.ui.slot_index = Some(index);
        self.touch();
    }

    pub fn toggle_slot_selection(&mut self, key: &str) {
        if let Some(pos) = self.ui.selected_slots.iter().position(|k| k == key) {
            self.ui.selected_slots.remove(pos);
        } else {
            self.ui.selected_slots.push(key.to_string());
        }
        self.touch();
    }

    pub fn clear_selected_slots(&mut self) {
        self.ui.selected_slots.clear();
        self.touch();
    }

    pub fn set_slot_key(&mut self, key: impl Into<String>) {
        self.ui.slot_key = key.into();
        self.touch();
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Start a load. Returns `None` when the id is already loaded. Any token
    /// issued earlier becomes stale.
    pub fn begin_load(&mut self, id: &str) -> Option<LoadToken> {
        if self.last_loaded_id.as_deref() == Some(id) {
            return None;
        }
        self.load_seq += 1;
        Some(LoadToken {
            id: id.to_string(),
            seq: self.load_seq,
        })
    }

    /// Apply a completed load, unless a newer one started in the meantime.
    pub fn finish_load(
        &mut self,
        token: &LoadToken,
        source: StorageMode,
        effective_id: String,
        preset: Preset,
    ) -> LoadOutcome {
        if token.seq != self.load_seq {
            log::debug!("Discarding stale load of {}", token.id);
            return LoadOutcome::Superseded;
        }

        self.preset = preset;
        self.ui = UiState::default();
        self.dirty.mark_clean(&self.preset);
        self.mode = source;
        self.preset_id = Some(effective_id);
        self.last_loaded_id = Some(token.id.clone());
        LoadOutcome::Loaded { source }
    }

    /// Load a preset through the unified local-then-cloud lookup, normalize
    /// it, and make it the live preset. The storage mode follows the back
    /// end the preset came from.
    pub async fn load_preset(&mut self, id: &str) -> PresetResult<LoadOutcome> {
        let Some(token) = self.begin_load(id) else {
            return Ok(LoadOutcome::AlreadyLoaded);
        };

        let loaded = self.router.load_preset_by_id(id).await?;
        let preset = self.normalizer.normalize(&loaded.raw).await?;

        let outcome = self.finish_load(&token, loaded.source, loaded.preset_id.clone(), preset);
        if let LoadOutcome::Loaded { source } = outcome {
            self.record_recent(loaded.preset_id, source).await;
        }
        Ok(outcome)
    }

    /// Load a preset from the back end a recency entry points at.
    pub async fn load_recent(&mut self, summary: &PresetSummary) -> PresetResult<LoadOutcome> {
        self.load_seq += 1;
        let token = LoadToken {
            id: summary.preset_id.clone(),
            seq: self.load_seq,
        };

        let raw = self
            .router
            .backend(summary.source)
            .get_preset(&summary.preset_id)
            .await?;
        let preset = self.normalizer.normalize(&raw).await?;

        let outcome = self.finish_load(&token, summary.source, summary.preset_id.clone(), preset);
        if let LoadOutcome::Loaded { source } = outcome {
            self.record_recent(summary.preset_id.clone(), source).await;
        }
        Ok(outcome)
    }

    /// Import a raw JSON document. The live preset is replaced only when the
    /// whole parse/normalize pipeline succeeds.
    pub async fn import_json(&mut self, text: &str) -> PresetResult<()> {
        let raw: Value = serde_json::from_str(text)?;
        let preset = self.normalizer.normalize(&raw).await?;

        self.import(preset);
        self.dirty.mark_clean(&self.preset);
        self.mode = StorageMode::Local;
        self.preset_id = None;
        self.last_loaded_id = None;
        Ok(())
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Save the current preset under its existing identity, through the
    /// current storage mode.
    pub async fn save(&mut self) -> PresetResult<String> {
        if self.is_saving {
            return Err(PresetError::SaveInProgress);
        }
        let Some(id) = self.preset_id.clone() else {
            return Err(PresetError::validation(
                "preset has no identity yet; use save_as",
            ));
        };

        let payload = self.persistable()?;

        self.is_saving = true;
        let result = self
            .router
            .backend(self.mode)
            .save_preset(&payload, Some(&id))
            .await;
        self.is_saving = false;
        let saved_id = result?;

        self.record_recent(saved_id.clone(), self.mode).await;
        self.dirty.mark_clean(&self.preset);
        Ok(saved_id)
    }

    /// Save a copy under a new name and a fresh identity. Always lands in
    /// the local back end.
    pub async fn save_as(&mut self, name: &str) -> PresetResult<String> {
        if self.is_saving {
            return Err(PresetError::SaveInProgress);
        }

        self.set_preset_name(name.trim());
        let payload = self.persistable()?;

        self.is_saving = true;
        let result = self
            .router
            .backend(StorageMode::Local)
            .save_preset(&payload, None)
            .await;
        self.is_saving = false;
        let new_id = result?;

        self.mode = StorageMode::Local;
        self.preset_id = Some(new_id.clone());
        self.record_recent(new_id.clone(), StorageMode::Local).await;
        self.dirty.mark_clean(&self.preset);
        Ok(new_id)
    }

    /// Create and save a blank preset under the given name, replacing the
    /// session state with it. Always lands in the local back end.
    pub async fn save_fresh(&mut self, name: &str) -> PresetResult<String> {
        if self.is_saving {
            return Err(PresetError::SaveInProgress);
        }

        let mut fresh = Preset::empty();
        fresh.preset_name = name.trim().to_string();
        let payload = serde_json::to_value(&fresh)?;
        validate_at(&payload, Boundary::Persistence)?;

        self.is_saving = true;
        let result = self
            .router
            .backend(StorageMode::Local)
            .save_preset(&payload, None)
            .await;
        self.is_saving = false;
        let new_id = result?;

        self.preset = fresh;
        self.ui = UiState::default();
        self.mode = StorageMode::Local;
        self.preset_id = Some(new_id.clone());
        self.record_recent(new_id.clone(), StorageMode::Local).await;
        self.dirty.mark_clean(&self.preset);
        Ok(new_id)
    }

    /// Reload the recency cache from storage.
    pub async fn refresh_recent_presets(&mut self) -> PresetResult<()> {
        self.recent = self
            .router
            .backend(StorageMode::Local)
            .list_recent_presets()
            .await?;
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Serialize the live preset and run persistence-boundary validation.
    /// Called before any write so a constraint violation leaves storage
    /// untouched.
    fn persistable(&self) -> PresetResult<Value> {
        let value = serde_json::to_value(&self.preset)?;
        validate_at(&value, Boundary::Persistence)?;
        Ok(value)
    }

    /// Record a save/load in the recency list. Best-effort: a recency write
    /// failure is logged, not surfaced, since the primary operation already
    /// succeeded.
    async fn record_recent(&mut self, preset_id: String, source: StorageMode) {
        let summary = PresetSummary {
            preset_id,
            preset_name: self.preset.preset_name.clone(),
            source,
        };
        let backend = self.router.backend(source);
        if let Err(e) = backend.save_to_recent_presets(summary).await {
            log::warn!("Failed to update recency list: {e}");
        }
        if let Err(e) = self.refresh_recent_presets().await {
            log::warn!("Failed to refresh recency list: {e}");
        }
    }
}

/// Checked slot assignment; an out-of-range index is logged and ignored
/// rather than growing the array past its fixed shape.
fn set_slot(slots: &mut [SlotRef], index: usize, slot: SlotRef, what: &str) {
    match slots.get_mut(index) {
        Some(entry) => *entry = SlotRef::new(slot.id),
        None => log::warn!("Ignoring out-of-range {what} assignment at index {index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::RawCatalogDocument;
    use crate::catalog::CatalogFetcher;
    use crate::config::CatalogConfig;
    use crate::storage::recents::RecentStore;
    use crate::storage::{CloudStore, LocalStore, PresetStorage};
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    struct StaticFetcher;

    #[async_trait]
    impl CatalogFetcher for StaticFetcher {
        async fn fetch(&self) -> PresetResult<RawCatalogDocument> {
            serde_json::from_value(json!({
                "categories": [
                    {"name": "Potions", "emojis": [
                        {"id": "sara_brew", "name": "Saradomin brew", "preset_type": "item",
                         "id_aliases": ["Saradomin Brew"]},
                        {"id": "super_restore", "name": "Super restore", "preset_type": "item"}
                    ]}
                ]
            }))
            .map_err(PresetError::from)
        }
    }

    fn session(dir: &TempDir) -> EditorSession {
        // Cloud points at a closed port; local-only tests never reach it.
        let router = StorageRouter::new(
            Arc::new(LocalStore::new(dir.path(), 10)),
            Arc::new(CloudStore::new(
                "http://127.0.0.1:9",
                RecentStore::new(dir.path(), 10),
            )),
        );
        EditorSession::new(
            Arc::new(router),
            Arc::new(CatalogService::with_fetcher(
                Arc::new(StaticFetcher),
                CatalogConfig::default(),
            )),
        )
    }

    #[test]
    fn test_dirty_transitions_through_actions() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        // No baseline yet.
        assert_eq!(session.is_dirty(), None);

        session.mark_clean();
        assert_eq!(session.is_dirty(), Some(false));

        session.set_preset_name("Vorago hm");
        assert_eq!(session.is_dirty(), Some(true));

        session.set_preset_name("");
        assert_eq!(session.is_dirty(), Some(false));

        session.set_inventory_slot(2, SlotRef::new("sara_brew"));
        assert_eq!(session.is_dirty(), Some(true));
    }

    #[test]
    fn test_ui_only_mutations_stay_clean() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.mark_clean();

        session.select_slot(SelectionTarget::Equipment, 4);
        session.toggle_slot_selection("inv-3");
        session.set_slot_key("inv-3");
        assert_eq!(session.is_dirty(), Some(false));

        session.clear_selected_slots();
        assert_eq!(session.is_dirty(), Some(false));
    }

    #[test]
    fn test_breakdown_upsert_and_remove() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        session.set_breakdown_entry(BreakdownEntry {
            slot_type: SlotType::Inventory,
            slot_index: 3,
            description: "first".to_string(),
        });
        session.set_breakdown_entry(BreakdownEntry {
            slot_type: SlotType::Inventory,
            slot_index: 3,
            description: "second".to_string(),
        });

        // Upsert keeps one entry per key.
        assert_eq!(session.preset().breakdown.len(), 1);
        assert_eq!(
            session
                .breakdown_for(SlotType::Inventory, 3)
                .unwrap()
                .description,
            "second"
        );

        session.remove_breakdown_entry(SlotType::Inventory, 3);
        assert!(session.breakdown_for(SlotType::Inventory, 3).is_none());
    }

    #[test]
    fn test_swap_inventory_slots() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_inventory_slot(0, SlotRef::new("sara_brew"));
        session.set_inventory_slot(1, SlotRef::new("super_restore"));

        session.swap_inventory_slots(0, 1);
        assert_eq!(session.preset().inventory_slots[0].id, "super_restore");
        assert_eq!(session.preset().inventory_slots[1].id, "sara_brew");

        // Out of range is ignored.
        session.swap_inventory_slots(0, 99);
        assert_eq!(session.preset().inventory_slots[0].id, "super_restore");
    }

    #[test]
    fn test_out_of_range_assignment_preserves_shape() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_inventory_slot(99, SlotRef::new("sara_brew"));
        assert_eq!(session.preset().inventory_slots.len(), 28);
    }

    #[tokio::test]
    async fn test_save_requires_identity() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_preset_name("named");
        let err = session.save().await.unwrap_err();
        assert!(matches!(err, PresetError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_save_as_rejects_blank_name_before_write() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let err = session.save_as("   ").await.unwrap_err();
        assert!(matches!(err, PresetError::ValidationFailed(_)));
        // Nothing was written.
        assert!(!dir.path().join("presets").exists());
    }

    #[tokio::test]
    async fn test_save_as_then_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        session.set_inventory_slot(0, SlotRef::new("sara_brew"));
        let id = session.save_as("Kerapac trio").await.unwrap();

        assert_eq!(session.preset_id(), Some(id.as_str()));
        assert_eq!(session.mode(), StorageMode::Local);
        assert_eq!(session.is_dirty(), Some(false));
        assert_eq!(session.recent_presets()[0].preset_name, "Kerapac trio");

        // Mutate and save under the existing identity.
        session.set_preset_notes("bring shields");
        assert_eq!(session.is_dirty(), Some(true));
        let saved = session.save().await.unwrap();
        assert_eq!(saved, id);
        assert_eq!(session.is_dirty(), Some(false));
    }

    #[tokio::test]
    async fn test_save_fresh_replaces_state() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_preset_notes("scratch work");

        let id = session.save_fresh("Clean slate").await.unwrap();
        assert_eq!(session.preset().preset_notes, "");
        assert_eq!(session.preset().preset_name, "Clean slate");
        assert_eq!(session.preset_id(), Some(id.as_str()));
        assert_eq!(session.is_dirty(), Some(false));
    }

    #[tokio::test]
    async fn test_load_normalizes_and_marks_clean() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        // A legacy raw document, stored directly.
        let local = LocalStore::new(dir.path(), 10);
        local
            .save_preset(
                &json!({
                    "presetName": "Legacy",
                    "inventorySlots": [{ "label": "Saradomin Brew", "breakdownNotes": "sip" }]
                }),
                Some("legacy-1"),
            )
            .await
            .unwrap();

        let outcome = session.load_preset("legacy-1").await.unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                source: StorageMode::Local
            }
        );
        assert_eq!(session.preset().inventory_slots[0].id, "sara_brew");
        assert_eq!(session.preset().breakdown.len(), 1);
        assert_eq!(session.is_dirty(), Some(false));
        assert_eq!(session.preset_id(), Some("legacy-1"));
        assert_eq!(session.recent_presets()[0].preset_id, "legacy-1");

        // Loading the same id again is a no-op.
        let again = session.load_preset("legacy-1").await.unwrap();
        assert_eq!(again, LoadOutcome::AlreadyLoaded);
    }

    #[tokio::test]
    async fn test_load_recent_uses_designated_backend() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let local = LocalStore::new(dir.path(), 10);
        local
            .save_preset(&json!({ "presetName": "From recents" }), Some("r1"))
            .await
            .unwrap();

        let summary = PresetSummary {
            preset_id: "r1".to_string(),
            preset_name: "From recents".to_string(),
            source: StorageMode::Local,
        };
        let outcome = session.load_recent(&summary).await.unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                source: StorageMode::Local
            }
        );
        assert_eq!(session.preset().preset_name, "From recents");

        // A subsequent load of the same id is skipped.
        assert_eq!(
            session.load_preset("r1").await.unwrap(),
            LoadOutcome::AlreadyLoaded
        );
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_preset_name("untouched");

        let token_a = session.begin_load("a").unwrap();
        let token_b = session.begin_load("b").unwrap();

        let stale = session.finish_load(
            &token_a,
            StorageMode::Local,
            "a".to_string(),
            Preset::empty(),
        );
        assert_eq!(stale, LoadOutcome::Superseded);
        // The stale completion changed nothing.
        assert_eq!(session.preset().preset_name, "untouched");

        let fresh = session.finish_load(
            &token_b,
            StorageMode::Local,
            "b".to_string(),
            Preset::empty(),
        );
        assert_eq!(
            fresh,
            LoadOutcome::Loaded {
                source: StorageMode::Local
            }
        );
        assert_eq!(session.preset_id(), Some("b"));
    }

    #[tokio::test]
    async fn test_import_json_success_and_failure() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        session
            .import_json(r#"{ "presetName": "Imported", "inventorySlots": ["sara_brew"] }"#)
            .await
            .unwrap();
        assert_eq!(session.preset().preset_name, "Imported");
        assert_eq!(session.is_dirty(), Some(false));
        assert_eq!(session.preset_id(), None);

        // A parse failure leaves the prior state intact.
        let err = session.import_json("{ nope").await.unwrap_err();
        assert!(matches!(err, PresetError::Serialization(_)));
        assert_eq!(session.preset().preset_name, "Imported");
    }

    #[tokio::test]
    async fn test_reset_returns_to_start_state() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.save_as("Something").await.unwrap();

        session.reset();
        assert_eq!(session.preset().preset_name, "");
        assert_eq!(session.is_dirty(), None);
        assert_eq!(session.preset_id(), None);
    }

    #[tokio::test]
    async fn test_load_failure_preserves_live_preset() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.set_preset_name("work in progress");

        // Not found locally; the cloud fallback cannot connect either.
        assert!(session.load_preset("missing").await.is_err());
        assert_eq!(session.preset().preset_name, "work in progress");
    }
}
