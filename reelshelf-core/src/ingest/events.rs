use reelshelf_model::{CatalogId, EpisodeKey};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::job::{JobId, JobMode};
use super::outcome::{RejectReason, SkipReason};
use super::progress::{ProgressMessage, SummaryMessage};

/// Lifecycle notifications emitted by the ingestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IngestionEvent {
    JobOpened {
        job_id: JobId,
        catalog_id: CatalogId,
        mode: JobMode,
    },
    ItemAccepted {
        job_id: JobId,
        key: EpisodeKey,
    },
    ItemSkipped {
        job_id: JobId,
        key: EpisodeKey,
        reason: SkipReason,
    },
    ItemRejected {
        job_id: JobId,
        reason: RejectReason,
    },
    Progress(ProgressMessage),
    JobCompleted(SummaryMessage),
    JobDiscarded {
        job_id: JobId,
    },
}

impl IngestionEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            IngestionEvent::JobOpened { job_id, .. }
            | IngestionEvent::ItemAccepted { job_id, .. }
            | IngestionEvent::ItemSkipped { job_id, .. }
            | IngestionEvent::ItemRejected { job_id, .. }
            | IngestionEvent::JobDiscarded { job_id } => *job_id,
            IngestionEvent::Progress(message) => message.job_id,
            IngestionEvent::JobCompleted(summary) => summary.job_id,
        }
    }
}

/// In-process fan-out of [`IngestionEvent`]s to any number of observers.
///
/// Publishing never blocks; with no subscribers events are dropped, and
/// slow subscribers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct InProcIngestionBus {
    sender: broadcast::Sender<IngestionEvent>,
}

impl InProcIngestionBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IngestionEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: IngestionEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = InProcIngestionBus::new(8);
        let mut rx = bus.subscribe();
        let job_id = JobId::new();
        bus.publish(IngestionEvent::JobDiscarded { job_id });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.job_id(), job_id);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = InProcIngestionBus::new(0);
        bus.publish(IngestionEvent::JobDiscarded {
            job_id: JobId::new(),
        });
    }
}
