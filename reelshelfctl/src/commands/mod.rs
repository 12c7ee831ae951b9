pub mod ingest;
pub mod series;

use anyhow::{Context, Result};
use reelshelf_core::store::JsonFileContentStore;

use crate::config::Config;

pub(crate) async fn open_store(config: &Config) -> Result<JsonFileContentStore> {
    JsonFileContentStore::open(&config.store_path)
        .await
        .with_context(|| {
            format!(
                "failed to open catalog at {}",
                config.store_path.display()
            )
        })
}
