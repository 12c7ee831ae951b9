//! JSON-lines item manifests fed to `reelshelfctl ingest`.
//!
//! Each non-empty line describes one forwarded media item:
//!
//! ```text
//! {"caption": "id:abc season:1 episode:2", "video_ref": "file-2"}
//! {"caption": "id:abc season:1 episode:3", "video_ref": "doc-3", "video_kind": "document", "file_name": "ep3.mkv"}
//! ```

use std::path::{Path, PathBuf};

use reelshelf_model::{MediaRef, VideoKind};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest {path} line {line} is not a valid item")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestItem {
    pub caption: String,
    pub video_ref: String,
    #[serde(default)]
    pub video_kind: VideoKind,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl ManifestItem {
    /// Media reference for this item, or `None` for a document that is not
    /// a video.
    pub fn media_ref(&self) -> Option<MediaRef> {
        let media = match self.video_kind {
            VideoKind::Video => MediaRef::video(self.video_ref.clone()),
            VideoKind::Document => MediaRef::from_document(
                self.video_ref.clone(),
                self.file_name.clone().unwrap_or_default(),
                self.mime_type.clone(),
            )?,
        };
        let media = match self.size_bytes {
            Some(size) => media.with_size(size),
            None => media,
        };
        Some(match self.duration_seconds {
            Some(seconds) => media.with_duration(seconds),
            None => media,
        })
    }
}

/// A manifest item with its 1-based line number.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub line: usize,
    pub item: ManifestItem,
}

pub fn parse_manifest(
    path: &Path,
    contents: &str,
) -> Result<Vec<ManifestEntry>, ManifestError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(index, raw)| {
            serde_json::from_str(raw)
                .map(|item| ManifestEntry {
                    line: index + 1,
                    item,
                })
                .map_err(|source| ManifestError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

pub async fn read_manifest(
    path: &Path,
) -> Result<Vec<ManifestEntry>, ManifestError> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|source| {
        ManifestError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    parse_manifest(path, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_and_numbering_kept() {
        let contents = "\n{\"caption\":\"id:a season:1 episode:1\",\"video_ref\":\"v1\"}\n\n{\"caption\":\"x\",\"video_ref\":\"v2\",\"size_bytes\":10}\n";
        let entries = parse_manifest(Path::new("m.jsonl"), contents).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line, 2);
        assert_eq!(entries[1].line, 4);
        assert_eq!(entries[1].item.media_ref().unwrap().size_bytes, Some(10));
    }

    #[test]
    fn bad_lines_report_their_position() {
        let contents = "{\"caption\":\"c\",\"video_ref\":\"v\"}\nnot json\n";
        let err = parse_manifest(Path::new("m.jsonl"), contents).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { line: 2, .. }));
    }

    #[test]
    fn documents_must_be_videos() {
        let item = |file_name: &str| ManifestItem {
            caption: "c".into(),
            video_ref: "doc".into(),
            video_kind: VideoKind::Document,
            file_name: Some(file_name.into()),
            mime_type: None,
            size_bytes: None,
            duration_seconds: None,
        };
        assert!(item("notes.pdf").media_ref().is_none());
        let media = item("episode.mkv").media_ref().unwrap();
        assert_eq!(media.video_kind, VideoKind::Document);
        assert!(media.needs_conversion());
    }
}
