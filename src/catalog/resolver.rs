//! Identifier resolution.
//!
//! Maps a raw, possibly-legacy slot identifier (canonical id, label, or
//! alias) to a canonical entity id. Resolution is case-insensitive and total:
//! unknown identifiers pass through lower-cased rather than being dropped, so
//! a reference to a since-removed entity survives verbatim.

use std::collections::{HashMap, HashSet};

use crate::catalog::types::RawEntityEntry;

/// Case-insensitive id/alias lookup table.
#[derive(Debug, Clone, Default)]
pub struct IdResolver {
    ids: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl IdResolver {
    /// Build a resolver from raw catalog entries.
    ///
    /// Aliases are indexed in ingestion order; a duplicated alias resolves to
    /// the last entry that registered it.
    pub fn from_raw_entries(entries: &[RawEntityEntry]) -> Self {
        let mut ids = HashSet::new();
        let mut aliases = HashMap::new();

        for entry in entries {
            if entry.id.is_empty() {
                continue;
            }
            let id = entry.id.to_lowercase();
            for alias in &entry.id_aliases {
                aliases.insert(alias.to_lowercase(), id.clone());
            }
            ids.insert(id);
        }

        Self { ids, aliases }
    }

    /// Resolve an identifier to its canonical id.
    ///
    /// Empty input means "unassigned" and returns the empty string. A known
    /// id is returned lower-cased; a known alias returns its target id; an
    /// unknown identifier is returned lower-cased unchanged.
    pub fn resolve(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        let key = input.to_lowercase();

        if self.ids.contains(&key) {
            return key;
        }
        if let Some(target) = self.aliases.get(&key) {
            return target.clone();
        }

        key
    }

    /// Direct alias-table lookup, bypassing the id check.
    ///
    /// Used during catalog ingestion, where an entry may declare itself via
    /// an alias rather than its canonical id.
    pub fn alias_target(&self, input: &str) -> Option<String> {
        self.aliases.get(&input.to_lowercase()).cloned()
    }

    /// Whether this identifier resolves to a catalog entry (not pass-through).
    pub fn is_known(&self, input: &str) -> bool {
        let key = input.to_lowercase();
        self.ids.contains(&key) || self.aliases.contains_key(&key)
    }
}
