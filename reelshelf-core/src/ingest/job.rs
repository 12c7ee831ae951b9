use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reelshelf_model::{CatalogId, EpisodeKey, EpisodeRange, SeasonNumber};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for ingestion jobs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a job accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JobMode {
    /// Fixed season and declared episode range; completes on its own.
    Bounded {
        season: SeasonNumber,
        range: EpisodeRange,
    },
    /// Any season/episode pair until the operator finishes the job.
    Open,
}

impl JobMode {
    pub fn is_open(&self) -> bool {
        matches!(self, JobMode::Open)
    }
}

/// Lifecycle of a job once its target (and range) are settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Collecting,
    Complete,
    Discarded,
}

/// How an item received in this session was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receipt {
    /// Newly written to the store by this job.
    Inserted,
    /// Valid, but the store already held it.
    AlreadyStored,
}

#[derive(Debug)]
struct JobProgress {
    phase: JobPhase,
    received: BTreeMap<EpisodeKey, Receipt>,
    inserted: usize,
}

/// Point-in-time copy of a job's bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub catalog_id: CatalogId,
    pub title: String,
    pub mode: JobMode,
    pub phase: JobPhase,
    pub received: BTreeMap<EpisodeKey, Receipt>,
    pub inserted: usize,
}

impl JobSnapshot {
    pub fn processed(&self) -> usize {
        self.received.len()
    }

    pub fn already_stored(&self) -> usize {
        self.processed() - self.inserted
    }

    pub fn expected_count(&self) -> Option<usize> {
        match self.mode {
            JobMode::Bounded { range, .. } => Some(range.len()),
            JobMode::Open => None,
        }
    }

    pub fn keys_with(
        &self,
        receipt: Receipt,
    ) -> impl Iterator<Item = EpisodeKey> + '_ {
        self.received
            .iter()
            .filter(move |(_, r)| **r == receipt)
            .map(|(key, _)| *key)
    }
}

/// Result of recording one received key.
#[derive(Debug)]
pub(crate) enum Recorded {
    /// Key was new to the session.
    Fresh {
        snapshot: JobSnapshot,
        /// This record moved the job to [`JobPhase::Complete`].
        completed: bool,
    },
    /// Another task recorded the key first.
    AlreadyReceived,
}

/// One ingestion session for a single series.
///
/// Shared between the tasks submitting its items. The bookkeeping lock is
/// short-held and never held across an await point.
#[derive(Debug)]
pub struct IngestionJob {
    id: JobId,
    catalog_id: CatalogId,
    title: String,
    mode: JobMode,
    created_at: DateTime<Utc>,
    progress: Mutex<JobProgress>,
}

impl IngestionJob {
    pub(crate) fn new(
        catalog_id: CatalogId,
        title: String,
        mode: JobMode,
    ) -> Self {
        Self {
            id: JobId::new(),
            catalog_id,
            title,
            mode,
            created_at: Utc::now(),
            progress: Mutex::new(JobProgress {
                phase: JobPhase::Collecting,
                received: BTreeMap::new(),
                inserted: 0,
            }),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn catalog_id(&self) -> &CatalogId {
        &self.catalog_id
    }

    /// Title of the target series at the time the job opened.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> JobMode {
        self.mode
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `end - start + 1` for bounded jobs.
    pub fn expected_count(&self) -> Option<usize> {
        match self.mode {
            JobMode::Bounded { range, .. } => Some(range.len()),
            JobMode::Open => None,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.progress.lock().phase
    }

    pub fn is_collecting(&self) -> bool {
        self.phase() == JobPhase::Collecting
    }

    pub fn has_received(&self, key: EpisodeKey) -> bool {
        self.progress.lock().received.contains_key(&key)
    }

    pub fn snapshot(&self) -> JobSnapshot {
        let progress = self.progress.lock();
        self.snapshot_of(&progress)
    }

    pub(crate) fn record(&self, key: EpisodeKey, receipt: Receipt) -> Recorded {
        let mut progress = self.progress.lock();
        if progress.received.contains_key(&key) {
            return Recorded::AlreadyReceived;
        }
        progress.received.insert(key, receipt);
        if receipt == Receipt::Inserted {
            progress.inserted += 1;
        }

        let completed = progress.phase == JobPhase::Collecting
            && self
                .expected_count()
                .is_some_and(|expected| progress.received.len() == expected);
        if completed {
            progress.phase = JobPhase::Complete;
        }

        Recorded::Fresh {
            snapshot: self.snapshot_of(&progress),
            completed,
        }
    }

    /// Close an open job on the operator's finish signal. Returns the final
    /// snapshot, or `None` when the job was no longer collecting.
    pub(crate) fn finish(&self) -> Option<JobSnapshot> {
        let mut progress = self.progress.lock();
        if progress.phase != JobPhase::Collecting {
            return None;
        }
        progress.phase = if progress.received.is_empty() {
            JobPhase::Discarded
        } else {
            JobPhase::Complete
        };
        Some(self.snapshot_of(&progress))
    }

    /// Returns `false` if the job had already completed or been discarded.
    pub(crate) fn discard(&self) -> bool {
        let mut progress = self.progress.lock();
        if progress.phase != JobPhase::Collecting {
            return false;
        }
        progress.phase = JobPhase::Discarded;
        true
    }

    fn snapshot_of(&self, progress: &JobProgress) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id,
            catalog_id: self.catalog_id.clone(),
            title: self.title.clone(),
            mode: self.mode,
            phase: progress.phase,
            received: progress.received.clone(),
            inserted: progress.inserted,
        }
    }
}
