//! preset-forge - Loadout preset editor core.
//!
//! Catalog-backed identity resolution, preset normalization and migration,
//! dirty-state tracking, and local/cloud persistence for character loadout
//! presets.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod preset;
pub mod session;
pub mod storage;

pub use catalog::{CatalogService, EntityCatalog, IdResolver};
pub use config::AppConfig;
pub use error::{PresetError, PresetResult};
pub use preset::{
    BreakdownEntry, DirtyTracker, Normalizer, Preset, PresetSummary, SlotRef, SlotType,
    StorageMode,
};
pub use session::{EditorSession, LoadOutcome};
pub use storage::{LoadedPreset, PresetStorage, StorageRouter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
