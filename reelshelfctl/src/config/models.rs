use std::path::PathBuf;

use reelshelf_core::ingest::IngestSettings;

/// Fully resolved operator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON catalog snapshot read and written by every command.
    pub store_path: PathBuf,
    pub ingest: IngestSettings,
    pub metadata: ConfigMetadata,
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
