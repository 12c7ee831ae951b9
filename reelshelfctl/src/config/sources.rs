use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const ENV_CONFIG_PATH: &str = "REELSHELF_CONFIG";
pub const ENV_STORE_PATH: &str = "REELSHELF_STORE_PATH";
pub const ENV_MAX_BOUNDED_EPISODES: &str = "REELSHELF_MAX_BOUNDED_EPISODES";

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub store: FileStoreConfig,
    #[serde(default)]
    pub ingest: FileIngestConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileIngestConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bounded_episodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounded_progress_interval: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_progress_interval: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_capacity: Option<usize>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub max_bounded_episodes: Option<usize>,
    /// Variables that were set but could not be parsed.
    pub unparsed: Vec<&'static str>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self {
            config_path: std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from),
            store_path: std::env::var(ENV_STORE_PATH).ok().map(PathBuf::from),
            ..Self::default()
        };

        if let Ok(raw) = std::env::var(ENV_MAX_BOUNDED_EPISODES) {
            match raw.trim().parse() {
                Ok(value) => env_config.max_bounded_episodes = Some(value),
                Err(_) => env_config.unparsed.push(ENV_MAX_BOUNDED_EPISODES),
            }
        }

        env_config
    }
}
