use std::sync::Arc;

use chrono::Utc;
use reelshelf_model::{
    CatalogId, EpisodeKey, EpisodeNumber, EpisodeRange, MediaRef,
    SeasonNumber,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::{InProcIngestionBus, IngestionEvent};
use super::job::{
    IngestionJob, JobMode, JobPhase, JobSnapshot, Receipt, Recorded,
};
use super::locks::{LockRegistry, SeasonLockKey};
use super::outcome::{
    FinishOutcome, RejectReason, SkipReason, SubmitReport, SubmitResult,
};
use super::progress::{ProgressReporter, SummaryMessage};
use super::settings::{IngestSettings, MAX_BOUNDED_EPISODES};
use crate::caption::CaptionParser;
use crate::error::JobError;
use crate::store::ContentStore;

/// Drives ingestion jobs against a [`ContentStore`].
///
/// One service is built at startup and shared (usually behind an `Arc`) by
/// every task submitting items. It owns the season [`LockRegistry`] that
/// serializes the store's check-then-insert pair.
pub struct IngestionService<S: ContentStore + ?Sized> {
    store: Arc<S>,
    locks: Arc<LockRegistry>,
    settings: IngestSettings,
    reporter: ProgressReporter,
    events: InProcIngestionBus,
}

impl<S: ContentStore + ?Sized> std::fmt::Debug for IngestionService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionService")
            .field("locks", &self.locks.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A bounded job whose target series has been validated and which is waiting
/// for its season and episode range.
pub struct RangeSetup<'a, S: ContentStore + ?Sized> {
    service: &'a IngestionService<S>,
    catalog_id: CatalogId,
    title: String,
}

impl<S: ContentStore + ?Sized> std::fmt::Debug for RangeSetup<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeSetup")
            .field("catalog_id", &self.catalog_id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl<S: ContentStore + ?Sized> RangeSetup<'_, S> {
    pub fn catalog_id(&self) -> &CatalogId {
        &self.catalog_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn with_range(
        self,
        season: u16,
        start: u16,
        end: u16,
    ) -> Result<IngestionJob, JobError> {
        let (season, range) =
            self.service.validate_range(season, start, end)?;
        let job = IngestionJob::new(
            self.catalog_id,
            self.title,
            JobMode::Bounded { season, range },
        );
        self.service.opened(&job);
        Ok(job)
    }
}

impl<S: ContentStore + ?Sized> IngestionService<S> {
    pub fn new(store: Arc<S>, settings: IngestSettings) -> Self {
        Self::with_locks(store, Arc::new(LockRegistry::new()), settings)
    }

    /// Build a service around an existing registry, e.g. one shared with a
    /// second service writing to the same store.
    ///
    /// The bounded episode cap is clamped to `1..=MAX_BOUNDED_EPISODES`.
    pub fn with_locks(
        store: Arc<S>,
        locks: Arc<LockRegistry>,
        mut settings: IngestSettings,
    ) -> Self {
        settings.max_bounded_episodes =
            settings.max_bounded_episodes.clamp(1, MAX_BOUNDED_EPISODES);
        let reporter = ProgressReporter::new(&settings);
        let events = InProcIngestionBus::new(settings.event_capacity);
        Self {
            store,
            locks,
            settings,
            reporter,
            events,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn locks(&self) -> &Arc<LockRegistry> {
        &self.locks
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IngestionEvent> {
        self.events.subscribe()
    }

    /// Validate the target series of a bounded job.
    pub async fn begin_bounded(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<RangeSetup<'_, S>, JobError> {
        let title = self.resolve_target(catalog_id).await?;
        Ok(RangeSetup {
            service: self,
            catalog_id: catalog_id.clone(),
            title,
        })
    }

    /// Open a job for one season and an inclusive episode range.
    pub async fn create_bounded_job(
        &self,
        catalog_id: &CatalogId,
        season: u16,
        start: u16,
        end: u16,
    ) -> Result<IngestionJob, JobError> {
        self.validate_range(season, start, end)?;
        self.begin_bounded(catalog_id)
            .await?
            .with_range(season, start, end)
    }

    /// Open a job accepting any season and episode until finished.
    pub async fn create_open_job(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<IngestionJob, JobError> {
        let title = self.resolve_target(catalog_id).await?;
        let job = IngestionJob::new(catalog_id.clone(), title, JobMode::Open);
        self.opened(&job);
        Ok(job)
    }

    /// Process one incoming item.
    ///
    /// Safe to call concurrently for the same job from many tasks. The
    /// existence check, insert and session record for a key happen under the
    /// `(catalog_id, season)` guard.
    pub async fn submit(
        &self,
        job: &IngestionJob,
        raw_caption: &str,
        media: MediaRef,
    ) -> SubmitReport {
        if !job.is_collecting() {
            return self.reject(job, RejectReason::JobClosed);
        }

        let Some(parsed) = CaptionParser::parse(raw_caption) else {
            return self.reject(job, RejectReason::MalformedCaption);
        };
        if &parsed.id != job.catalog_id() {
            return self.reject(job, RejectReason::WrongTarget);
        }
        if let JobMode::Bounded { season, range } = job.mode() {
            if parsed.season != season {
                return self.reject(job, RejectReason::WrongSeason);
            }
            if !range.contains(parsed.episode) {
                return self.reject(job, RejectReason::OutOfRange);
            }
        }

        let key = parsed.key();
        if job.has_received(key) {
            return self.skip(job, key, SkipReason::DuplicateInSession);
        }

        let guard = self
            .locks
            .acquire(SeasonLockKey::new(job.catalog_id().clone(), key.season))
            .await;

        // A racing task may have recorded the key while we waited.
        if job.has_received(key) {
            return self.skip(job, key, SkipReason::DuplicateInSession);
        }

        match self
            .store
            .exists(job.catalog_id(), key.season, key.episode)
            .await
        {
            Ok(false) => {}
            Ok(true) => {
                let recorded = job.record(key, Receipt::AlreadyStored);
                drop(guard);
                return self.finish_skip(job, key, recorded);
            }
            Err(err) => {
                return self.store_failure(job, key, err.to_string());
            }
        }

        let record = media.into_record(Utc::now());
        if let Err(err) = self
            .store
            .insert_episode(job.catalog_id(), key.season, key.episode, record)
            .await
        {
            return self.store_failure(job, key, err.to_string());
        }

        let recorded = job.record(key, Receipt::Inserted);
        drop(guard);

        match recorded {
            Recorded::Fresh {
                snapshot,
                completed,
            } => {
                debug!(
                    job_id = %job.id(),
                    catalog_id = %job.catalog_id(),
                    season = key.season.value(),
                    episode = key.episode.value(),
                    "episode inserted"
                );
                self.events.publish(IngestionEvent::ItemAccepted {
                    job_id: job.id(),
                    key,
                });

                let mut report =
                    SubmitReport::from_result(SubmitResult::Accepted);
                if completed {
                    report.summary = Some(self.complete(&snapshot));
                } else if let Some(progress) =
                    self.reporter.on_accepted(&snapshot)
                {
                    self.events
                        .publish(IngestionEvent::Progress(progress.clone()));
                    report.progress = Some(progress);
                }
                report
            }
            // Unreachable while the guard is held for the whole section.
            Recorded::AlreadyReceived => {
                self.skip(job, key, SkipReason::DuplicateInSession)
            }
        }
    }

    /// Operator's "done" signal. Finishing a job that received nothing
    /// discards it instead of producing an empty summary.
    pub fn finish_open_job(&self, job: &IngestionJob) -> FinishOutcome {
        let Some(snapshot) = job.finish() else {
            debug!(job_id = %job.id(), "finish on a closed job ignored");
            return FinishOutcome::AlreadyClosed;
        };
        if snapshot.phase == JobPhase::Discarded {
            info!(
                job_id = %job.id(),
                catalog_id = %job.catalog_id(),
                "ingestion job finished empty; discarded"
            );
            self.events
                .publish(IngestionEvent::JobDiscarded { job_id: job.id() });
            return FinishOutcome::EmptySession;
        }
        FinishOutcome::Summary(self.complete(&snapshot))
    }

    /// Discard a job on operator cancellation. In-flight submits finish but
    /// the job accepts nothing new. Returns `false` if it was already closed.
    pub fn cancel(&self, job: &IngestionJob) -> bool {
        if !job.discard() {
            return false;
        }
        info!(
            job_id = %job.id(),
            catalog_id = %job.catalog_id(),
            received = job.snapshot().processed(),
            "ingestion job cancelled"
        );
        self.events
            .publish(IngestionEvent::JobDiscarded { job_id: job.id() });
        true
    }

    async fn resolve_target(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<String, JobError> {
        let entry = self
            .store
            .get_catalog_entry(catalog_id)
            .await?
            .ok_or_else(|| JobError::TargetNotFound(catalog_id.clone()))?;
        if !entry.is_series() {
            return Err(JobError::NotASeries(catalog_id.clone()));
        }
        Ok(entry.title)
    }

    fn validate_range(
        &self,
        season: u16,
        start: u16,
        end: u16,
    ) -> Result<(SeasonNumber, EpisodeRange), JobError> {
        let season = SeasonNumber::new(season)?;
        let range = EpisodeRange::new(
            EpisodeNumber::new(start)?,
            EpisodeNumber::new(end)?,
        )?;
        let limit = self.settings.max_bounded_episodes;
        if range.len() > limit {
            return Err(JobError::RangeTooLarge {
                requested: range.len(),
                limit,
            });
        }
        Ok((season, range))
    }

    fn opened(&self, job: &IngestionJob) {
        match job.mode() {
            JobMode::Bounded { season, range } => info!(
                job_id = %job.id(),
                catalog_id = %job.catalog_id(),
                season = season.value(),
                range = %range,
                "bounded ingestion job opened"
            ),
            JobMode::Open => info!(
                job_id = %job.id(),
                catalog_id = %job.catalog_id(),
                "open ingestion job opened"
            ),
        }
        self.events.publish(IngestionEvent::JobOpened {
            job_id: job.id(),
            catalog_id: job.catalog_id().clone(),
            mode: job.mode(),
        });
    }

    fn complete(&self, snapshot: &JobSnapshot) -> SummaryMessage {
        let summary = self.reporter.finalize(snapshot);
        info!(
            job_id = %snapshot.job_id,
            catalog_id = %snapshot.catalog_id,
            inserted = summary.inserted(),
            already_stored = summary.skipped(),
            "ingestion job complete"
        );
        self.events.publish(IngestionEvent::JobCompleted(summary.clone()));
        summary
    }

    fn finish_skip(
        &self,
        job: &IngestionJob,
        key: EpisodeKey,
        recorded: Recorded,
    ) -> SubmitReport {
        let completed = match recorded {
            Recorded::Fresh {
                snapshot,
                completed: true,
            } => Some(snapshot),
            _ => None,
        };
        let mut report = self.skip(job, key, SkipReason::AlreadyInStore);
        if let Some(snapshot) = completed {
            report.summary = Some(self.complete(&snapshot));
        }
        report
    }

    fn skip(
        &self,
        job: &IngestionJob,
        key: EpisodeKey,
        reason: SkipReason,
    ) -> SubmitReport {
        debug!(
            job_id = %job.id(),
            catalog_id = %job.catalog_id(),
            season = key.season.value(),
            episode = key.episode.value(),
            ?reason,
            "item skipped"
        );
        self.events.publish(IngestionEvent::ItemSkipped {
            job_id: job.id(),
            key,
            reason,
        });
        SubmitReport::from_result(SubmitResult::Skipped(reason))
    }

    fn reject(&self, job: &IngestionJob, reason: RejectReason) -> SubmitReport {
        debug!(job_id = %job.id(), ?reason, "item rejected");
        self.events.publish(IngestionEvent::ItemRejected {
            job_id: job.id(),
            reason: reason.clone(),
        });
        SubmitReport::from_result(SubmitResult::Rejected(reason))
    }

    fn store_failure(
        &self,
        job: &IngestionJob,
        key: EpisodeKey,
        cause: String,
    ) -> SubmitReport {
        warn!(
            job_id = %job.id(),
            catalog_id = %job.catalog_id(),
            season = key.season.value(),
            episode = key.episode.value(),
            error = %cause,
            "failed to store episode"
        );
        self.reject(job, RejectReason::StoreFailure { cause })
    }
}
