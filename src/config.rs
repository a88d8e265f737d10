use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default entity catalog document URL.
const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/pvme/pvme-settings/refs/heads/master/emojis/emojis_v2.json";

/// Default base for first-party entity images (bare filenames are appended).
const DEFAULT_ASSET_BASE_URL: &str = "https://img.pvme.io/images/";

/// Default emoji CDN base used when an entry only carries an emoji id.
const DEFAULT_EMOJI_CDN_URL: &str = "https://cdn.discordapp.com/emojis/";

/// Default base URL of the remote preset store.
const DEFAULT_REMOTE_BASE_URL: &str = "https://api.pvme.io";

/// Bounds for the recency-list cap.
const RECENT_LIMIT_MIN: usize = 10;
const RECENT_LIMIT_MAX: usize = 20;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
}

/// Entity catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL of the category-organized catalog document.
    pub url: String,
    /// Base URL prefixed onto bare image filenames at lookup time.
    pub asset_base_url: String,
    /// Base URL for the emoji CDN fallback.
    pub emoji_cdn_url: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
    /// Base URL of the remote preset store.
    pub remote_base_url: String,
    /// Recency-list cap. Clamped to 10..=20 on use.
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            emoji_cdn_url: DEFAULT_EMOJI_CDN_URL.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            recent_limit: RECENT_LIMIT_MIN,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/preset-forge/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("preset-forge"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Recency-list cap, clamped to the supported range.
    pub fn recent_limit(&self) -> usize {
        self.storage
            .recent_limit
            .clamp(RECENT_LIMIT_MIN, RECENT_LIMIT_MAX)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("preset-forge").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.catalog.url.ends_with("emojis_v2.json"));
        assert_eq!(config.catalog.asset_base_url, DEFAULT_ASSET_BASE_URL);
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.recent_limit(), 10);
    }

    #[test]
    fn test_recent_limit_clamped() {
        let mut config = AppConfig::default();
        config.storage.recent_limit = 3;
        assert_eq!(config.recent_limit(), 10);
        config.storage.recent_limit = 50;
        assert_eq!(config.recent_limit(), 20);
        config.storage.recent_limit = 15;
        assert_eq!(config.recent_limit(), 15);
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/custom"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.catalog.url, config.catalog.url);
        assert_eq!(
            deserialized.storage.remote_base_url,
            config.storage.remote_base_url
        );
    }
}
