//! Catalog persistence port consumed by the ingestion pipeline.
//!
//! The pipeline only needs an existence check, a single-episode insert and
//! catalog lookups. Each call must be atomic on its own; serializing the
//! check-then-insert pair is the pipeline's job, not the store's.

use async_trait::async_trait;
use reelshelf_model::{
    CatalogEntry, CatalogId, EpisodeNumber, EpisodeRecord, SeasonMap,
    SeasonNumber,
};
use thiserror::Error;

#[cfg(feature = "json-store")]
pub mod json_file;
pub mod memory;

#[cfg(feature = "json-store")]
pub use json_file::JsonFileContentStore;
pub use memory::InMemoryContentStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("catalog entry {0} not found")]
    NotFound(CatalogId),

    #[error("catalog entry {0} is not a series")]
    NotASeries(CatalogId),

    #[error("{catalog_id} already holds season {season} episode {episode}")]
    EpisodeExists {
        catalog_id: CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether `(season, episode)` is already stored for the series.
    async fn exists(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
    ) -> StoreResult<bool>;

    /// Store one episode. Fails with [`StoreError::EpisodeExists`] rather
    /// than replacing an occupied slot.
    async fn insert_episode(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
        record: EpisodeRecord,
    ) -> StoreResult<()>;

    async fn get_catalog_entry(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<CatalogEntry>>;

    /// Season map of a series; `None` when the entry does not exist.
    async fn season_map(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<SeasonMap>> {
        let entry = self.get_catalog_entry(catalog_id).await?;
        match entry {
            None => Ok(None),
            Some(entry) => entry
                .seasons()
                .cloned()
                .map(Some)
                .ok_or_else(|| StoreError::NotASeries(catalog_id.clone())),
        }
    }
}
