//! Core data model definitions shared across Reelshelf crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod ids;
pub mod keys;
pub mod media;
pub mod media_type;
pub mod numbers;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::CatalogId;
pub use keys::{EpisodeKey, EpisodeRange};
pub use media::{
    CatalogContent, CatalogEntry, EpisodeMap, EpisodeRecord, MediaRef,
    NewCatalogEntry, SeasonMap,
};
pub use media_type::{CatalogKind, VideoKind};
pub use numbers::{EpisodeNumber, SeasonNumber};
