use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use reelshelf_core::ingest::{
    IngestionJob, IngestionService, JobPhase, SubmitReport,
};
use reelshelf_core::store::ContentStore;
use reelshelf_model::{CatalogId, EpisodeRange, SeasonNumber};
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::open_store;
use crate::config::Config;
use crate::manifest::{ManifestEntry, read_manifest};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Catalog id of the target series
    pub catalog_id: CatalogId,

    /// Season for a bounded batch
    #[arg(long, required_unless_present = "open", requires = "range")]
    pub season: Option<SeasonNumber>,

    /// Episode range for a bounded batch, e.g. `1-5` or `3`
    #[arg(long, required_unless_present = "open", requires = "season")]
    pub range: Option<EpisodeRange>,

    /// Accept any season and episode; finished when the manifest ends
    #[arg(long, conflicts_with_all = ["season", "range"])]
    pub open: bool,

    /// JSON-lines manifest of items to submit
    #[arg(long)]
    pub items: PathBuf,
}

#[derive(Debug, Default)]
struct Tally {
    accepted: usize,
    skipped: usize,
    rejected: usize,
}

impl Tally {
    fn count(&mut self, report: &SubmitReport) {
        if report.result.is_accepted() {
            self.accepted += 1;
        } else if report.result.is_skipped() {
            self.skipped += 1;
        } else {
            self.rejected += 1;
        }
    }
}

pub async fn run(config: &Config, args: IngestArgs) -> Result<()> {
    let entries = read_manifest(&args.items).await?;
    let store = open_store(config).await?;
    let service = Arc::new(IngestionService::new(
        Arc::new(store),
        config.ingest.clone(),
    ));

    let job = match (args.season, args.range) {
        (Some(season), Some(range)) if !args.open => service
            .create_bounded_job(
                &args.catalog_id,
                season.value(),
                range.start().value(),
                range.end().value(),
            )
            .await
            .context("failed to open bounded ingestion job")?,
        _ => service
            .create_open_job(&args.catalog_id)
            .await
            .context("failed to open ingestion job")?,
    };
    let job = Arc::new(job);
    println!("Ingesting into \"{}\" (job {})", job.title(), job.id());

    let mut tally = Tally::default();
    let mut tasks = JoinSet::new();
    for ManifestEntry { line, item } in entries {
        let Some(media) = item.media_ref() else {
            println!("line {line}: rejected: document is not a video");
            tally.rejected += 1;
            continue;
        };
        if media.needs_conversion() {
            warn!(line, "document is not MP4; some clients may not play it");
        }
        let service = Arc::clone(&service);
        let job = Arc::clone(&job);
        tasks.spawn(async move {
            let report = service.submit(&job, &item.caption, media).await;
            (line, report)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (line, report) = joined.context("ingestion task failed")?;
        tally.count(&report);
        println!("line {line}: {}", report.result);
        if let Some(progress) = &report.progress {
            println!("{progress}");
        }
        if let Some(summary) = &report.summary {
            println!("{summary}");
        }
    }

    finish(&service, &job);
    info!(
        job_id = %job.id(),
        accepted = tally.accepted,
        skipped = tally.skipped,
        rejected = tally.rejected,
        "manifest processed"
    );
    println!(
        "Items: {} added, {} skipped, {} rejected",
        tally.accepted, tally.skipped, tally.rejected
    );
    Ok(())
}

fn finish<S: ContentStore + ?Sized>(
    service: &IngestionService<S>,
    job: &IngestionJob,
) {
    if job.mode().is_open() {
        println!("{}", service.finish_open_job(job));
        return;
    }
    if job.phase() == JobPhase::Collecting {
        let snapshot = job.snapshot();
        println!(
            "Batch incomplete: received {} of {} episodes; job cancelled",
            snapshot.processed(),
            job.expected_count().unwrap_or_default()
        );
        service.cancel(job);
    }
}
