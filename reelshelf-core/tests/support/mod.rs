#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reelshelf_core::ingest::{IngestSettings, IngestionService};
use reelshelf_core::store::{
    ContentStore, InMemoryContentStore, StoreError, StoreResult,
};
use reelshelf_model::{
    CatalogEntry, CatalogId, EpisodeNumber, EpisodeRecord, NewCatalogEntry,
    SeasonNumber,
};

pub fn series_fields(title: &str) -> NewCatalogEntry {
    NewCatalogEntry {
        title: title.to_string(),
        title_alt: format!("{title} (alt)"),
        year: 2012,
        external_rating: 7.8,
    }
}

/// Series entry with a fixed id, for captions written out by hand.
pub fn series_entry(id: &str, title: &str) -> CatalogEntry {
    series_fields(title)
        .into_series(CatalogId::new(id).expect("valid id"))
        .expect("valid series")
}

pub async fn memory_store_with(ids: &[&str]) -> InMemoryContentStore {
    InMemoryContentStore::with_entries(
        ids.iter().map(|id| series_entry(id, &format!("Series {id}"))),
    )
}

pub fn caption(id: &str, season: u16, episode: u16) -> String {
    format!("id:{id} season:{season} episode:{episode}")
}

pub fn catalog_id(id: &str) -> CatalogId {
    CatalogId::new(id).expect("valid id")
}

pub fn season(n: u16) -> SeasonNumber {
    SeasonNumber::new(n).expect("positive season")
}

pub fn episode(n: u16) -> EpisodeNumber {
    EpisodeNumber::new(n).expect("positive episode")
}

pub fn service<S: ContentStore>(store: S) -> Arc<IngestionService<S>> {
    Arc::new(IngestionService::new(
        Arc::new(store),
        IngestSettings::default(),
    ))
}

/// Store whose existence check takes `delay`, simulating a slow backend
/// while the season guard is held.
pub struct SlowStore {
    pub inner: InMemoryContentStore,
    pub delay: Duration,
}

#[async_trait]
impl ContentStore for SlowStore {
    async fn exists(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
    ) -> StoreResult<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.exists(catalog_id, season, episode).await
    }

    async fn insert_episode(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
        record: EpisodeRecord,
    ) -> StoreResult<()> {
        self.inner
            .insert_episode(catalog_id, season, episode, record)
            .await
    }

    async fn get_catalog_entry(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<CatalogEntry>> {
        self.inner.get_catalog_entry(catalog_id).await
    }
}

/// Store that fails the first `failures` inserts with a backend error.
pub struct FlakyStore {
    pub inner: InMemoryContentStore,
    pub failures: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: InMemoryContentStore, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn exists(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
    ) -> StoreResult<bool> {
        self.inner.exists(catalog_id, season, episode).await
    }

    async fn insert_episode(
        &self,
        catalog_id: &CatalogId,
        season: SeasonNumber,
        episode: EpisodeNumber,
        record: EpisodeRecord,
    ) -> StoreResult<()> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("disk quota exceeded".into()));
        }
        self.inner
            .insert_episode(catalog_id, season, episode, record)
            .await
    }

    async fn get_catalog_entry(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<CatalogEntry>> {
        self.inner.get_catalog_entry(catalog_id).await
    }
}
