use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reelshelf_model::{
    CatalogEntry, CatalogId, EpisodeKey, EpisodeNumber, EpisodeRecord,
    NewCatalogEntry, SeasonNumber,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::memory::Catalog;
use super::{ContentStore, StoreError, StoreResult};
use crate::error::{IngestError, Result};

/// Catalog persisted as a single JSON snapshot.
///
/// Every mutation is applied to a copy, written to a sibling temp file and
/// renamed over the snapshot before it becomes visible, so a failed write
/// leaves both the file and the in-memory view unchanged.
#[derive(Debug)]
pub struct JsonFileContentStore {
    path: PathBuf,
    catalog: RwLock<Catalog>,
}

impl JsonFileContentStore {
    /// Open the snapshot at `path`, starting empty when it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let catalog = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Catalog>(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no catalog snapshot yet");
                Catalog::default()
            }
            Err(err) => return Err(IngestError::Io(err)),
        };
        info!(
            path = %path.display(),
            entries = catalog.len(),
            "catalog snapshot loaded"
        );
        Ok(Self {
            path,
            catalog: RwLock::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn create_series(
        &self,
        fields: NewCatalogEntry,
    ) -> Result<CatalogEntry> {
        let entry = fields.into_series(CatalogId::generate())?;
        let mut guard = self.catalog.write().await;
        let mut next = guard.clone();
        next.put(entry.clone());
        persist(&self.path, &next).await?;
        *guard = next;
        Ok(entry)
    }

    pub async fn list_series(&self) -> Vec<CatalogEntry> {
        self.catalog.read().await.series()
    }
}

async fn persist(path: &Path, catalog: &Catalog) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(catalog)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ContentStore for JsonFileContentStore {
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
        let mut guard = self.catalog.write().await;
        let mut next = guard.clone();
        next.insert_episode(
            catalog_id,
            EpisodeKey::new(season, episode),
            record,
        )?;
        persist(&self.path, &next)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        *guard = next;
        Ok(())
    }

    async fn get_catalog_entry(
        &self,
        catalog_id: &CatalogId,
    ) -> StoreResult<Option<CatalogEntry>> {
        Ok(self.catalog.read().await.get(catalog_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelshelf_model::MediaRef;
    use tempfile::tempdir;

    fn fields() -> NewCatalogEntry {
        NewCatalogEntry {
            title: "Show".to_string(),
            title_alt: "Show".to_string(),
            year: 1999,
            external_rating: 6.4,
        }
    }

    #[tokio::test]
    async fn episodes_survive_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog").join("catalog.json");

        let store = JsonFileContentStore::open(&path).await.expect("open");
        let series = store.create_series(fields()).await.expect("series");
        let season = SeasonNumber::new(2).unwrap();
        let episode = EpisodeNumber::new(7).unwrap();
        store
            .insert_episode(
                &series.id,
                season,
                episode,
                MediaRef::video("file-7").into_record(Utc::now()),
            )
            .await
            .expect("insert");
        drop(store);

        let reopened = JsonFileContentStore::open(&path).await.expect("reopen");
        assert!(reopened.exists(&series.id, season, episode).await.unwrap());
        assert_eq!(reopened.list_series().await.len(), 1);
        let seasons = reopened.season_map(&series.id).await.unwrap().unwrap();
        let stored = seasons.get(EpisodeKey::new(season, episode)).unwrap();
        assert_eq!(stored.video_ref, "file-7");
    }

    #[tokio::test]
    async fn rejected_insert_leaves_snapshot_untouched() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        let store = JsonFileContentStore::open(&path).await.expect("open");
        let missing = CatalogId::new("missing").unwrap();

        let err = store
            .insert_episode(
                &missing,
                SeasonNumber::new(1).unwrap(),
                EpisodeNumber::new(1).unwrap(),
                MediaRef::video("x").into_record(Utc::now()),
            )
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(missing));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let err = JsonFileContentStore::open(&path).await.unwrap_err();
        assert!(matches!(err, IngestError::Serialization(_)));
    }
}
