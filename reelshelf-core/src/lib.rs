//! # Reelshelf Core
//!
//! Core library for the Reelshelf catalog bot: caption parsing, batch episode
//! ingestion and the catalog store port it writes through.
//!
//! ## Overview
//!
//! - **Caption parsing**: pull `id:`, `season:` and `episode:` tokens out of
//!   free-text captions
//! - **Ingestion jobs**: bounded (one season, declared range) and open
//!   (any season, finished by the operator) sessions
//! - **At-most-once inserts**: a per-season lock registry serializes the
//!   store's existence check and insert
//! - **Progress reporting**: batched progress notices and per-season
//!   summaries
//! - **Stores**: the [`store::ContentStore`] port plus in-memory and JSON
//!   snapshot implementations
//!
//! ## Feature Flags
//!
//! - `json-store` (default): enables [`store::JsonFileContentStore`]
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reelshelf_core::ingest::{IngestSettings, IngestionService};
//! use reelshelf_core::store::InMemoryContentStore;
//! use reelshelf_model::{MediaRef, NewCatalogEntry};
//!
//! async fn ingest_pilot() -> reelshelf_core::Result<()> {
//!     let store = Arc::new(InMemoryContentStore::new());
//!     let series = store
//!         .create_series(NewCatalogEntry {
//!             title: "Example".to_string(),
//!             title_alt: "Example".to_string(),
//!             year: 2020,
//!             external_rating: 7.1,
//!         })
//!         .await?;
//!
//!     let service = IngestionService::new(store, IngestSettings::default());
//!     let job = service.create_bounded_job(&series.id, 1, 1, 3).await?;
//!     let caption = format!("id:{} season:1 episode:1", series.id);
//!     let report = service
//!         .submit(&job, &caption, MediaRef::video("file-id"))
//!         .await;
//!     println!("{}", report.result);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Caption metadata parsing
pub mod caption;
pub mod error;
/// Ingestion jobs, locking and progress reporting
pub mod ingest;
/// Catalog store port and implementations
pub mod store;

pub use caption::{CaptionParser, ParsedCaption};
pub use error::{IngestError, JobError, Result};
pub use reelshelf_model;
