//! Batch episode ingestion.
//!
//! An operator opens a job against an existing series, either bounded (one
//! season, a declared episode range) or open (any season and episode until
//! finished), then forwards tagged media items. Each item is matched against
//! the job, checked against the store and inserted under a per-season guard,
//! so a `(series, season, episode)` slot is written at most once no matter
//! how items race or repeat.

pub mod events;
pub mod job;
pub mod locks;
pub mod outcome;
pub mod progress;
pub mod service;
pub mod settings;

pub use events::{InProcIngestionBus, IngestionEvent};
pub use job::{IngestionJob, JobId, JobMode, JobPhase, JobSnapshot, Receipt};
pub use locks::{LockRegistry, SeasonGuard, SeasonLockKey};
pub use outcome::{
    FinishOutcome, RejectReason, SkipReason, SubmitReport, SubmitResult,
};
pub use progress::{
    ProgressMessage, ProgressReporter, SeasonGrouping, SummaryMessage,
};
pub use service::{IngestionService, RangeSetup};
pub use settings::{IngestSettings, MAX_BOUNDED_EPISODES};
