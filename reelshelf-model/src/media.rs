use std::collections::BTreeMap;

use crate::chrono::{DateTime, Utc};
use crate::error::ModelError;
use crate::ids::CatalogId;
use crate::keys::EpisodeKey;
use crate::media_type::{
    CatalogKind, VideoKind, is_video_document, needs_mp4_conversion,
};
use crate::numbers::{EpisodeNumber, SeasonNumber};

pub const MIN_RELEASE_YEAR: u16 = 1900;
pub const MAX_RELEASE_YEAR: u16 = 2100;

/// A movie or series stored in the catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub title: String,
    /// Secondary (usually English) title
    pub title_alt: String,
    pub year: u16,
    /// Rating imported from an external database, 0.0 to 10.0
    pub external_rating: f32,
    #[cfg_attr(feature = "serde", serde(default = "Utc::now"))]
    pub added_at: DateTime<Utc>,
    pub content: CatalogContent,
}

/// Kind-specific payload. Only series carry a season map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum CatalogContent {
    Movie { video: Option<MediaRef> },
    Series { seasons: SeasonMap },
}

impl CatalogEntry {
    pub fn kind(&self) -> CatalogKind {
        match self.content {
            CatalogContent::Movie { .. } => CatalogKind::Movie,
            CatalogContent::Series { .. } => CatalogKind::Series,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self.kind(), CatalogKind::Series)
    }

    pub fn seasons(&self) -> Option<&SeasonMap> {
        match &self.content {
            CatalogContent::Series { seasons } => Some(seasons),
            CatalogContent::Movie { .. } => None,
        }
    }

    pub fn seasons_mut(&mut self) -> Option<&mut SeasonMap> {
        match &mut self.content {
            CatalogContent::Series { seasons } => Some(seasons),
            CatalogContent::Movie { .. } => None,
        }
    }
}

/// Operator-provided fields for a new catalog entry, before the store
/// assigns an id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewCatalogEntry {
    pub title: String,
    pub title_alt: String,
    pub year: u16,
    pub external_rating: f32,
}

impl NewCatalogEntry {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::InvalidEntry(
                "title must not be empty".to_string(),
            ));
        }
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&self.year) {
            return Err(ModelError::InvalidEntry(format!(
                "year {} outside {MIN_RELEASE_YEAR}..={MAX_RELEASE_YEAR}",
                self.year
            )));
        }
        if !(0.0..=10.0).contains(&self.external_rating) {
            return Err(ModelError::InvalidEntry(format!(
                "rating {} outside 0.0..=10.0",
                self.external_rating
            )));
        }
        Ok(())
    }

    /// Validate and turn into a stored series with an empty season map.
    pub fn into_series(
        self,
        id: CatalogId,
    ) -> Result<CatalogEntry, ModelError> {
        self.into_entry(id, CatalogContent::Series {
            seasons: SeasonMap::default(),
        })
    }

    pub fn into_movie(
        self,
        id: CatalogId,
        video: Option<MediaRef>,
    ) -> Result<CatalogEntry, ModelError> {
        self.into_entry(id, CatalogContent::Movie { video })
    }

    fn into_entry(
        self,
        id: CatalogId,
        content: CatalogContent,
    ) -> Result<CatalogEntry, ModelError> {
        self.validate()?;
        Ok(CatalogEntry {
            id,
            title: self.title,
            title_alt: self.title_alt,
            year: self.year,
            external_rating: self.external_rating,
            added_at: Utc::now(),
            content,
        })
    }
}

/// Reference to a video held by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaRef {
    /// Platform file handle used to deliver the video again
    pub video_ref: String,
    pub video_kind: VideoKind,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub size_bytes: Option<u64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub duration_seconds: Option<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub file_name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mime_type: Option<String>,
}

impl MediaRef {
    /// A native platform video.
    pub fn video(video_ref: impl Into<String>) -> Self {
        Self {
            video_ref: video_ref.into(),
            video_kind: VideoKind::Video,
            size_bytes: None,
            duration_seconds: None,
            file_name: None,
            mime_type: None,
        }
    }

    /// A file sent as a document. Returns `None` when the document is not a
    /// video by MIME type or extension.
    pub fn from_document(
        video_ref: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: Option<String>,
    ) -> Option<Self> {
        let file_name = file_name.into();
        if !is_video_document(&file_name, mime_type.as_deref()) {
            return None;
        }
        Some(Self {
            video_ref: video_ref.into(),
            video_kind: VideoKind::Document,
            size_bytes: None,
            duration_seconds: None,
            file_name: Some(file_name),
            mime_type,
        })
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_duration(mut self, duration_seconds: u32) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self
    }

    /// Non-MP4 documents play poorly on some clients; callers warn about
    /// them but still ingest.
    pub fn needs_conversion(&self) -> bool {
        match self.video_kind {
            VideoKind::Video => false,
            VideoKind::Document => needs_mp4_conversion(
                self.file_name.as_deref().unwrap_or_default(),
                self.mime_type.as_deref(),
            ),
        }
    }

    pub fn into_record(self, added_at: DateTime<Utc>) -> EpisodeRecord {
        EpisodeRecord {
            video_ref: self.video_ref,
            video_kind: self.video_kind,
            size_bytes: self.size_bytes,
            duration_seconds: self.duration_seconds,
            added_at,
        }
    }
}

/// One stored episode of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeRecord {
    pub video_ref: String,
    pub video_kind: VideoKind,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub size_bytes: Option<u64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub duration_seconds: Option<u32>,
    pub added_at: DateTime<Utc>,
}

/// Episodes of one season keyed by episode number.
pub type EpisodeMap = BTreeMap<EpisodeNumber, EpisodeRecord>;

/// Season number → episode map. At most one record per `(season, episode)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SeasonMap {
    seasons: BTreeMap<SeasonNumber, EpisodeMap>,
}

impl SeasonMap {
    pub fn contains(&self, key: EpisodeKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: EpisodeKey) -> Option<&EpisodeRecord> {
        self.seasons
            .get(&key.season)
            .and_then(|episodes| episodes.get(&key.episode))
    }

    /// Insert a record into a free slot. An occupied slot is left untouched
    /// and the rejected record is handed back.
    pub fn insert_new(
        &mut self,
        key: EpisodeKey,
        record: EpisodeRecord,
    ) -> Result<(), EpisodeRecord> {
        let episodes = self.seasons.entry(key.season).or_default();
        if episodes.contains_key(&key.episode) {
            return Err(record);
        }
        episodes.insert(key.episode, record);
        Ok(())
    }

    /// Sorted season numbers that hold at least one episode.
    pub fn season_numbers(&self) -> Vec<SeasonNumber> {
        self.seasons
            .iter()
            .filter(|(_, episodes)| !episodes.is_empty())
            .map(|(season, _)| *season)
            .collect()
    }

    pub fn episodes(&self, season: SeasonNumber) -> Option<&EpisodeMap> {
        self.seasons.get(&season)
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.episode_count() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = EpisodeKey> + '_ {
        self.seasons.iter().flat_map(|(season, episodes)| {
            episodes
                .keys()
                .map(|episode| EpisodeKey::new(*season, *episode))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(season: u16, episode: u16) -> EpisodeKey {
        EpisodeKey::new(
            SeasonNumber::new(season).unwrap(),
            EpisodeNumber::new(episode).unwrap(),
        )
    }

    fn record(video_ref: &str) -> EpisodeRecord {
        MediaRef::video(video_ref).into_record(Utc::now())
    }

    #[test]
    fn season_map_keeps_first_record_per_slot() {
        let mut seasons = SeasonMap::default();
        assert!(seasons.insert_new(key(1, 1), record("a")).is_ok());
        let rejected = seasons.insert_new(key(1, 1), record("b")).unwrap_err();
        assert_eq!(rejected.video_ref, "b");
        assert_eq!(seasons.get(key(1, 1)).unwrap().video_ref, "a");
        assert_eq!(seasons.episode_count(), 1);
    }

    #[test]
    fn season_map_browsing_is_sorted() {
        let mut seasons = SeasonMap::default();
        for (s, e) in [(2, 1), (1, 3), (1, 1)] {
            seasons.insert_new(key(s, e), record("v")).unwrap();
        }
        let numbers: Vec<u16> =
            seasons.season_numbers().iter().map(|s| s.value()).collect();
        assert_eq!(numbers, vec![1, 2]);
        let keys: Vec<String> =
            seasons.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["S01E01", "S01E03", "S02E01"]);
    }

    #[test]
    fn new_entry_validation_follows_form_rules() {
        let mut entry = NewCatalogEntry {
            title: "Ходячий замок".to_string(),
            title_alt: "Howl's Moving Castle".to_string(),
            year: 2004,
            external_rating: 8.2,
        };
        assert!(entry.validate().is_ok());

        entry.year = 1899;
        assert!(entry.validate().is_err());
        entry.year = 2004;
        entry.external_rating = 10.5;
        assert!(entry.validate().is_err());
    }

    #[test]
    fn series_entries_own_an_empty_season_map() {
        let entry = NewCatalogEntry {
            title: "Show".to_string(),
            title_alt: "Show".to_string(),
            year: 2020,
            external_rating: 7.0,
        }
        .into_series(CatalogId::generate())
        .unwrap();
        assert!(entry.is_series());
        assert!(entry.seasons().unwrap().is_empty());
    }

    #[test]
    fn non_video_documents_are_refused() {
        assert!(
            MediaRef::from_document("f1", "notes.pdf", None).is_none()
        );
        let doc = MediaRef::from_document(
            "f2",
            "ep.mkv",
            Some("video/x-matroska".to_string()),
        )
        .unwrap();
        assert_eq!(doc.video_kind, VideoKind::Document);
        assert!(doc.needs_conversion());
        assert!(!MediaRef::video("f3").needs_conversion());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn stored_series_reload_with_their_episodes() {
        let mut entry = NewCatalogEntry {
            title: "Show".to_string(),
            title_alt: "Show".to_string(),
            year: 2020,
            external_rating: 7.0,
        }
        .into_series(CatalogId::generate())
        .unwrap();
        let seasons = entry.seasons_mut().unwrap();
        seasons.insert_new(key(2, 7), record("file-7")).unwrap();
        seasons.insert_new(key(10, 1), record("file-1")).unwrap();

        let json = serde_json::to_string(&entry).unwrap();
        let reloaded: CatalogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, entry);
        assert_eq!(
            reloaded.seasons().unwrap().get(key(2, 7)).unwrap().video_ref,
            "file-7"
        );
    }
}
