use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use reelshelf_model::{CatalogId, SeasonNumber};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Lock scope: one season of one series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeasonLockKey {
    pub catalog_id: CatalogId,
    pub season: SeasonNumber,
}

impl SeasonLockKey {
    pub fn new(catalog_id: CatalogId, season: SeasonNumber) -> Self {
        Self { catalog_id, season }
    }
}

impl fmt::Display for SeasonLockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.catalog_id, self.season)
    }
}

/// Held while checking and inserting episodes of one season.
///
/// Dropping the guard releases the season, on every exit path.
#[derive(Debug)]
pub struct SeasonGuard {
    key: SeasonLockKey,
    _guard: OwnedMutexGuard<()>,
}

impl SeasonGuard {
    pub fn key(&self) -> &SeasonLockKey {
        &self.key
    }
}

/// Per-season mutual exclusion for the ingestion pipeline.
///
/// Entries are created lazily on first use and kept afterwards; the key space
/// is bounded by the number of series/season pairs ever ingested. Creating an
/// entry only holds the map shard briefly, so lookups for unrelated seasons
/// never wait on a held season lock.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<SeasonLockKey, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: SeasonLockKey) -> SeasonGuard {
        let lock = self.handle(&key);
        let guard = lock.lock_owned().await;
        trace!(lock = %key, "season lock acquired");
        SeasonGuard { key, _guard: guard }
    }

    /// Take the lock only if nobody holds it right now.
    pub fn try_acquire(&self, key: SeasonLockKey) -> Option<SeasonGuard> {
        let lock = self.handle(&key);
        let guard = lock.try_lock_owned().ok()?;
        Some(SeasonGuard { key, _guard: guard })
    }

    /// Number of season keys seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drop entries nobody holds or waits on. Returns how many were evicted.
    pub fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        // The map keeps one reference; any guard or waiter holds another.
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }

    fn handle(&self, key: &SeasonLockKey) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(key) {
            return Arc::clone(existing.value());
        }
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
