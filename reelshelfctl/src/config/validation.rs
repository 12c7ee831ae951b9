use reelshelf_core::ingest::MAX_BOUNDED_EPISODES;
use thiserror::Error;

use super::models::Config;

/// Below this, a busy subscriber is likely to lag behind a large batch.
const MIN_COMFORTABLE_EVENT_CAPACITY: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("ingest.{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error(
        "ingest.max_bounded_episodes must be between 1 and {limit}, got {value}"
    )]
    EpisodeCapOutOfRange { value: usize, limit: usize },
    #[error("ingest.event_capacity must be greater than zero")]
    ZeroEventCapacity,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();
    let ingest = &config.ingest;

    if ingest.max_bounded_episodes == 0
        || ingest.max_bounded_episodes > MAX_BOUNDED_EPISODES
    {
        return Err(ConfigGuardRailError::EpisodeCapOutOfRange {
            value: ingest.max_bounded_episodes,
            limit: MAX_BOUNDED_EPISODES,
        });
    }
    if ingest.bounded_progress_interval == 0 {
        return Err(ConfigGuardRailError::ZeroInterval {
            field: "bounded_progress_interval",
        });
    }
    if ingest.open_progress_interval == 0 {
        return Err(ConfigGuardRailError::ZeroInterval {
            field: "open_progress_interval",
        });
    }
    if ingest.event_capacity == 0 {
        return Err(ConfigGuardRailError::ZeroEventCapacity);
    }

    if ingest.event_capacity < MIN_COMFORTABLE_EVENT_CAPACITY {
        warnings.push_with_hint(
            format!(
                "ingest.event_capacity is {}; event subscribers may lag on large batches",
                ingest.event_capacity
            ),
            format!("Use at least {MIN_COMFORTABLE_EVENT_CAPACITY}"),
        );
    }

    if ingest.bounded_progress_interval > ingest.max_bounded_episodes {
        warnings.push(
            "ingest.bounded_progress_interval exceeds max_bounded_episodes; bounded jobs only report their first item",
        );
    }

    if config
        .store_path
        .extension()
        .is_none_or(|ext| ext != "json")
    {
        warnings.push_with_hint(
            format!(
                "store path {} does not end in .json",
                config.store_path.display()
            ),
            "The catalog is written as a JSON snapshot regardless of the name",
        );
    }

    Ok(warnings)
}
