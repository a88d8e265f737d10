//! Entity catalog loading and indexing.
//!
//! [`CatalogService`] is an explicitly constructed, injectable service: built
//! once at application start and passed by reference to the normalizer and
//! anything else that resolves identifiers. The first successful load is
//! cached for the lifetime of the service; a failed load is not cached and
//! the next call retries. Concurrent callers coalesce onto one in-flight
//! fetch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::catalog::resolver::IdResolver;
use crate::catalog::types::{EntityCategory, EntityEntry, RawCatalogDocument, RawEntityEntry};
use crate::config::CatalogConfig;
use crate::error::{PresetError, PresetResult};

// ============================================================================
// Fetcher
// ============================================================================

/// Transport seam for the catalog document.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self) -> PresetResult<RawCatalogDocument>;
}

/// Default fetcher: HTTP GET of the configured catalog URL.
#[derive(Debug, Clone)]
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self) -> PresetResult<RawCatalogDocument> {
        let doc = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<RawCatalogDocument>()
            .await?;
        Ok(doc)
    }
}

// ============================================================================
// Loaded catalog
// ============================================================================

/// The loaded, indexed entity catalog.
#[derive(Debug, Clone)]
pub struct EntityCatalog {
    by_id: HashMap<String, EntityEntry>,
    by_category: HashMap<EntityCategory, Vec<String>>,
    resolver: IdResolver,
    asset_base_url: String,
    emoji_cdn_url: String,
}

impl EntityCatalog {
    /// Flatten and index a raw catalog document.
    ///
    /// The alias table is built from the raw entries first, then each entry's
    /// own identifier is resolved through it, so an entry may declare itself
    /// via an alias rather than a canonical id.
    pub fn from_raw(doc: RawCatalogDocument, config: &CatalogConfig) -> Self {
        let all: Vec<RawEntityEntry> = doc
            .categories
            .into_iter()
            .flat_map(|cat| cat.emojis)
            .collect();

        let resolver = IdResolver::from_raw_entries(&all);

        let mut by_id: HashMap<String, EntityEntry> = HashMap::new();
        let mut by_category: HashMap<EntityCategory, Vec<String>> = HashMap::new();

        for raw in all {
            let key = raw.id.to_lowercase();
            if key.is_empty() {
                log::debug!("Skipping catalog entry without an id: {:?}", raw.name);
                continue;
            }
            // An entry may declare itself via an alias; the alias table is
            // already complete here, so its target becomes the canonical id.
            // Duplicated ids overwrite in ingestion order (last wins).
            let id = resolver.alias_target(&key).unwrap_or(key);

            let category = EntityCategory::parse(raw.preset_type.as_deref());
            let entry = EntityEntry {
                id: id.clone(),
                name: raw.name,
                image: raw.image,
                category,
                slot_class: raw.preset_slot,
                emoji_id: raw.emoji_id,
                emoji_server: raw.emoji_server,
                id_aliases: raw.id_aliases,
            };

            if by_id.insert(id.clone(), entry).is_none() {
                by_category.entry(category).or_default().push(id);
            }
        }

        Self {
            by_id,
            by_category,
            resolver,
            asset_base_url: config.asset_base_url.clone(),
            emoji_cdn_url: config.emoji_cdn_url.clone(),
        }
    }

    /// Look up an entry by canonical id (case-insensitive).
    pub fn get(&self, id: &str) -> Option<&EntityEntry> {
        self.by_id.get(&id.to_lowercase())
    }

    /// Resolve an alias-or-id to a canonical id. See [`IdResolver::resolve`].
    pub fn resolve(&self, input: &str) -> String {
        self.resolver.resolve(input)
    }

    pub fn resolver(&self) -> &IdResolver {
        &self.resolver
    }

    /// All entries under a category, in ingestion order.
    pub fn entries_in(&self, category: EntityCategory) -> Vec<&EntityEntry> {
        self.by_category
            .get(&category)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Preferred image URL for an entry, derived at lookup time.
    ///
    /// A bare filename is prefixed with the configured asset base; an
    /// absolute URL passes through; entries with only an emoji id fall back
    /// to the emoji CDN.
    pub fn image_url(&self, id: &str) -> Option<String> {
        let entry = self.get(id)?;

        if let Some(image) = &entry.image {
            if image.starts_with("http") {
                return Some(image.clone());
            }
            return Some(format!("{}{}", self.asset_base_url, image));
        }

        entry
            .emoji_id
            .as_ref()
            .map(|emoji_id| format!("{}{}.png", self.emoji_cdn_url, emoji_id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ============================================================================
// Service
// ============================================================================

/// Memoizing loader for the entity catalog.
pub struct CatalogService {
    fetcher: Arc<dyn CatalogFetcher>,
    config: CatalogConfig,
    cell: OnceCell<Arc<EntityCatalog>>,
}

impl CatalogService {
    /// Create a service backed by the default HTTP fetcher.
    pub fn new(config: CatalogConfig) -> Self {
        let fetcher = Arc::new(HttpCatalogFetcher::new(config.url.clone()));
        Self::with_fetcher(fetcher, config)
    }

    /// Create a service with a custom fetcher (used by tests and embedders).
    pub fn with_fetcher(fetcher: Arc<dyn CatalogFetcher>, config: CatalogConfig) -> Self {
        Self {
            fetcher,
            config,
            cell: OnceCell::new(),
        }
    }

    /// Load the catalog, fetching at most once.
    ///
    /// Subsequent and concurrent calls return the cached result without
    /// re-fetching. A transport failure leaves the cache empty so the next
    /// call retries.
    #[instrument(skip(self))]
    pub async fn load(&self) -> PresetResult<Arc<EntityCatalog>> {
        let catalog = self
            .cell
            .get_or_try_init(|| async {
                let doc = self.fetcher.fetch().await?;
                let catalog = EntityCatalog::from_raw(doc, &self.config);
                log::info!("Entity catalog loaded: {} entries", catalog.len());
                Ok::<_, PresetError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// The cached catalog, if a load has already succeeded.
    pub fn cached(&self) -> Option<Arc<EntityCatalog>> {
        self.cell.get().cloned()
    }
}
