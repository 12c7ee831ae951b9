use serde::{Deserialize, Serialize};

/// Hard ceiling on a bounded job's declared range.
pub const MAX_BOUNDED_EPISODES: usize = 50;

/// Tunables for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Largest `end - start + 1` a bounded job may declare.
    pub max_bounded_episodes: usize,
    /// Bounded jobs report on the first accepted item and every Nth.
    pub bounded_progress_interval: usize,
    /// Open jobs report every Nth accepted item.
    pub open_progress_interval: usize,
    /// Buffered events per subscriber before lagging receivers drop events.
    pub event_capacity: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_bounded_episodes: MAX_BOUNDED_EPISODES,
            bounded_progress_interval: 5,
            open_progress_interval: 10,
            event_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let settings: IngestSettings =
            serde_json::from_str(r#"{"open_progress_interval": 3}"#).unwrap();
        assert_eq!(settings.open_progress_interval, 3);
        assert_eq!(settings.max_bounded_episodes, 50);
        assert_eq!(settings.bounded_progress_interval, 5);
    }
}
