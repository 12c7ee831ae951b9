use std::fmt;

use serde::{Deserialize, Serialize};

use super::progress::{ProgressMessage, SummaryMessage};

/// Why a valid item was not inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DuplicateInSession,
    AlreadyInStore,
}

/// Why an item was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    MalformedCaption,
    WrongTarget,
    WrongSeason,
    OutOfRange,
    JobClosed,
    StoreFailure { cause: String },
}

/// Per-item outcome of [`IngestionService::submit`].
///
/// [`IngestionService::submit`]: super::IngestionService::submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitResult {
    Accepted,
    Skipped(SkipReason),
    Rejected(RejectReason),
}

impl SubmitResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitResult::Accepted)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SubmitResult::Skipped(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitResult::Rejected(_))
    }
}

impl fmt::Display for SubmitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitResult::Accepted => f.write_str("added"),
            SubmitResult::Skipped(SkipReason::DuplicateInSession) => {
                f.write_str("skipped: already received in this session")
            }
            SubmitResult::Skipped(SkipReason::AlreadyInStore) => {
                f.write_str("skipped: already in the catalog")
            }
            SubmitResult::Rejected(reason) => match reason {
                RejectReason::MalformedCaption => f.write_str(
                    "rejected: caption needs id:<id> season:<n> episode:<n>",
                ),
                RejectReason::WrongTarget => {
                    f.write_str("rejected: caption names a different series")
                }
                RejectReason::WrongSeason => {
                    f.write_str("rejected: season does not match this batch")
                }
                RejectReason::OutOfRange => {
                    f.write_str("rejected: episode outside the declared range")
                }
                RejectReason::JobClosed => {
                    f.write_str("rejected: this ingestion job is closed")
                }
                RejectReason::StoreFailure { cause } => {
                    write!(f, "failed to store episode: {cause}")
                }
            },
        }
    }
}

/// Everything the transport needs to answer one submitted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub result: SubmitResult,
    pub progress: Option<ProgressMessage>,
    /// Present only on the submit that completed a bounded job.
    pub summary: Option<SummaryMessage>,
}

impl SubmitReport {
    pub(crate) fn from_result(result: SubmitResult) -> Self {
        Self {
            result,
            progress: None,
            summary: None,
        }
    }
}

/// Result of the operator's finish signal on an open job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    Summary(SummaryMessage),
    /// Nothing was received; the job was discarded.
    EmptySession,
    /// The job had already completed or been cancelled.
    AlreadyClosed,
}

impl fmt::Display for FinishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishOutcome::Summary(summary) => write!(f, "{summary}"),
            FinishOutcome::EmptySession => {
                f.write_str("No episodes were received; nothing to save")
            }
            FinishOutcome::AlreadyClosed => {
                f.write_str("This ingestion job is already closed")
            }
        }
    }
}
