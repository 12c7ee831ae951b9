use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reelshelf_model::{
    CatalogEntry, CatalogId, EpisodeKey, EpisodeNumber, EpisodeRecord,
    MediaRef, ModelError, NewCatalogEntry, SeasonNumber,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{ContentStore, StoreError, StoreResult};

/// Plain catalog contents shared by the in-process stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: HashMap<CatalogId, CatalogEntry>,
}

impl Catalog {
    pub fn get(&self, catalog_id: &CatalogId) -> Option<&CatalogEntry> {
        self.entries.get(catalog_id)
    }

    pub fn put(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn exists(
        &self,
        catalog_id: &CatalogId,
        key: EpisodeKey,
    ) -> StoreResult<bool> {
        let entry = self
            .entries
            .get(catalog_id)
            .ok_or_else(|| StoreError::NotFound(catalog_id.clone()))?;
        let seasons = entry
            .seasons()
            .ok_or_else(|| StoreError::NotASeries(catalog_id.clone()))?;
        Ok(seasons.contains(key))
    }

    pub fn insert_episode(
        &mut self,
        catalog_id: &CatalogId,
        key: EpisodeKey,
        record: EpisodeRecord,
    ) -> StoreResult<()> {
        let entry = self
            .entries
            .get_mut(catalog_id)
            .ok_or_else(|| StoreError::NotFound(catalog_id.clone()))?;
        let seasons = entry
            .seasons_mut()
            .ok_or_else(|| StoreError::NotASeries(catalog_id.clone()))?;
        seasons
            .insert_new(key, record)
            .map_err(|_| StoreError::EpisodeExists {
                catalog_id: catalog_id.clone(),
                season: key.season,
                episode: key.episode,
            })
    }

    /// Series sorted by title.
    pub fn series(&self) -> Vec<CatalogEntry> {
        let mut series: Vec<CatalogEntry> = self
            .entries
            .values()
            .filter(|entry| entry.is_series())
            .cloned()
            .collect();
        series.sort_by(|a, b| a.title.cmp(&b.title));
        series
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-local catalog store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Self {
        let mut catalog = Catalog::default();
        for entry in entries {
            catalog.put(entry);
        }
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Store a prepared entry, replacing any entry with the same id.
    pub async fn put_entry(&self, entry: CatalogEntry) {
        self.catalog.write().await.put(entry);
    }

    pub async fn create_series(
        &self,
        fields: NewCatalogEntry,
    ) -> Result<CatalogEntry, ModelError> {
        let entry = fields.into_series(CatalogId::generate())?;
        self.put_entry(entry.clone()).await;
        Ok(entry)
    }

    pub async fn create_movie(
        &self,
        fields: NewCatalogEntry,
        video: MediaRef,
    ) -> Result<CatalogEntry, ModelError> {
        let entry = fields.into_movie(CatalogId::generate(), Some(video))?;
        self.put_entry(entry.clone()).await;
        Ok(entry)
    }

    pub async fn list_series(&self) -> Vec<CatalogEntry> {
        self.catalog.read().await.series()
    }

    /// Total catalog entries (movies and series).
    pub async fn entry_count(&self) -> usize {
        self.catalog.read().await.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn exists(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
    ) -> StoreResult<bool> {
        self.catalog
            .read()
            .await
            .exists(catalog_id, EpisodeKey::new(season, episode))
    }

    async fn insert_episode(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
        record: EpisodeRecord,
    ) -> StoreResult<()> {
        self.catalog.write().await.insert_episode(
            catalog_id,
            EpisodeKey::new(season, episode),
            record,
        )
    }

    async fn get_catalog_entry(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<CatalogEntry>> {
        Ok(self.catalog.read().await.get(catalog_id).cloned())
    }
}
