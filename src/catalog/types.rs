//! Catalog data models.
//!
//! The wire shapes (`Raw*`) mirror the external catalog document exactly;
//! [`EntityEntry`] is the loaded, canonical form with its identifier already
//! resolved through the alias table.

use serde::{Deserialize, Serialize};

/// The category-organized catalog document as fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogDocument {
    #[serde(default)]
    pub categories: Vec<RawCatalogCategory>,
}

/// One category grouping in the catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogCategory {
    #[serde(default)]
    pub name: String,
    /// Historical field name in the upstream document.
    #[serde(default)]
    pub emojis: Vec<RawEntityEntry>,
}

/// One catalog entry as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntityEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Bare image filename; the URL is derived at lookup time.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub preset_type: Option<String>,
    #[serde(default)]
    pub preset_slot: Option<i64>,
    #[serde(default)]
    pub emoji_id: Option<String>,
    #[serde(default)]
    pub emoji_server: Option<String>,
    #[serde(default)]
    pub id_aliases: Vec<String>,
}

/// Category tag of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Item,
    Relic,
    Familiar,
    Ability,
    Misc,
}

impl EntityCategory {
    /// Parse a category tag; anything unrecognized lands in `Misc`.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag.map(|t| t.to_ascii_lowercase()).as_deref() {
            Some("item") => Self::Item,
            Some("relic") => Self::Relic,
            Some("familiar") => Self::Familiar,
            Some("ability") => Self::Ability,
            _ => Self::Misc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Relic => "relic",
            Self::Familiar => "familiar",
            Self::Ability => "ability",
            Self::Misc => "misc",
        }
    }
}

/// A loaded catalog entry, addressable by its canonical id.
///
/// Immutable once loaded. Presets store only the id, never a denormalized
/// copy of name/image, so catalog updates are reflected without re-saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEntry {
    pub id: String,
    pub name: String,
    /// Bare filename relative to the configured asset base.
    pub image: Option<String>,
    pub category: EntityCategory,
    pub slot_class: Option<i64>,
    pub emoji_id: Option<String>,
    pub emoji_server: Option<String>,
    pub id_aliases: Vec<String>,
}
