use std::collections::BTreeMap;
use std::fmt;

use reelshelf_model::{EpisodeKey, EpisodeNumber, SeasonNumber};
use serde::{Deserialize, Serialize};

use super::job::{JobId, JobMode, JobSnapshot, Receipt};
use super::settings::IngestSettings;

/// Episodes grouped per season, both sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonGrouping(BTreeMap<SeasonNumber, Vec<EpisodeNumber>>);

impl SeasonGrouping {
    pub fn from_keys(keys: impl IntoIterator<Item = EpisodeKey>) -> Self {
        let mut seasons: BTreeMap<SeasonNumber, Vec<EpisodeNumber>> =
            BTreeMap::new();
        for key in keys {
            seasons.entry(key.season).or_default().push(key.episode);
        }
        for episodes in seasons.values_mut() {
            episodes.sort_unstable();
            episodes.dedup();
        }
        Self(seasons)
    }

    pub fn seasons(&self) -> impl Iterator<Item = SeasonNumber> + '_ {
        self.0.keys().copied()
    }

    pub fn episodes(&self, season: SeasonNumber) -> &[EpisodeNumber] {
        self.0.get(&season).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One `Season N: episodes a,b,c` line per season.
impl fmt::Display for SeasonGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (season, episodes)) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let list = episodes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            write!(f, "Season {season}: episodes {list}")?;
        }
        Ok(())
    }
}

/// Intermediate progress notice for a running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub job_id: JobId,
    pub title: String,
    /// Items newly inserted so far.
    pub accepted: usize,
    /// Items handled so far, store duplicates included.
    pub processed: usize,
    /// Bounded jobs only.
    pub expected: Option<usize>,
    /// Open jobs only.
    pub seasons: Option<SeasonGrouping>,
}

impl fmt::Display for ProgressMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            Some(expected) => write!(
                f,
                "{}: {}/{} episodes received",
                self.title, self.processed, expected
            )?,
            None => write!(
                f,
                "{}: {} episodes added so far",
                self.title, self.accepted
            )?,
        }
        if let Some(seasons) = &self.seasons
            && !seasons.is_empty()
        {
            write!(f, "\n{seasons}")?;
        }
        Ok(())
    }
}

/// Final report for a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMessage {
    pub job_id: JobId,
    pub title: String,
    /// Episodes inserted by this job.
    pub added: SeasonGrouping,
    /// Episodes this job found already stored.
    pub already_stored: SeasonGrouping,
}

impl SummaryMessage {
    pub fn inserted(&self) -> usize {
        self.added.total()
    }

    pub fn skipped(&self) -> usize {
        self.already_stored.total()
    }

    pub fn total(&self) -> usize {
        self.inserted() + self.skipped()
    }
}

impl fmt::Display for SummaryMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ingestion finished for {}", self.title)?;
        if !self.added.is_empty() {
            writeln!(f, "{}", self.added)?;
        }
        if !self.already_stored.is_empty() {
            writeln!(f, "Already stored:\n{}", self.already_stored)?;
        }
        write!(
            f,
            "Added {}, already stored {}, total {}",
            self.inserted(),
            self.skipped(),
            self.total()
        )
    }
}

/// Decides when a job reports progress and builds its summary.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    bounded_interval: usize,
    open_interval: usize,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(&IngestSettings::default())
    }
}

impl ProgressReporter {
    pub fn new(settings: &IngestSettings) -> Self {
        Self {
            bounded_interval: settings.bounded_progress_interval.max(1),
            open_interval: settings.open_progress_interval.max(1),
        }
    }

    /// Called after each accepted item with the job state that item produced.
    pub fn on_accepted(&self, job: &JobSnapshot) -> Option<ProgressMessage> {
        let accepted = job.inserted;
        if accepted == 0 {
            return None;
        }
        match job.mode {
            JobMode::Bounded { .. } => {
                if accepted != 1 && accepted % self.bounded_interval != 0 {
                    return None;
                }
                Some(ProgressMessage {
                    job_id: job.job_id,
                    title: job.title.clone(),
                    accepted,
                    processed: job.processed(),
                    expected: job.expected_count(),
                    seasons: None,
                })
            }
            JobMode::Open => {
                if accepted % self.open_interval != 0 {
                    return None;
                }
                Some(ProgressMessage {
                    job_id: job.job_id,
                    title: job.title.clone(),
                    accepted,
                    processed: job.processed(),
                    expected: None,
                    seasons: Some(SeasonGrouping::from_keys(
                        job.received.keys().copied(),
                    )),
                })
            }
        }
    }

    pub fn finalize(&self, job: &JobSnapshot) -> SummaryMessage {
        SummaryMessage {
            job_id: job.job_id,
            title: job.title.clone(),
            added: SeasonGrouping::from_keys(job.keys_with(Receipt::Inserted)),
            already_stored: SeasonGrouping::from_keys(
                job.keys_with(Receipt::AlreadyStored),
            ),
        }
    }
}
