use std::fmt::{Display, Formatter};

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CatalogKind {
    /// Standalone feature
    Movie,
    /// Series owning a season map
    Series,
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Movie => write!(f, "movie"),
            CatalogKind::Series => write!(f, "series"),
        }
    }
}

/// How the messaging platform holds a video.
///
/// `Video` items were uploaded as native (re-encoded) videos; `Document`
/// items were sent as files and are delivered back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VideoKind {
    #[default]
    Video,
    Document,
}

impl Display for VideoKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoKind::Video => write!(f, "video"),
            VideoKind::Document => write!(f, "document"),
        }
    }
}

/// File extensions accepted when a video arrives as a document.
pub const VIDEO_DOCUMENT_EXTENSIONS: &[&str] =
    &["mp4", "mkv", "avi", "mov", "webm"];

/// Whether a document with this name and MIME type is a video at all.
pub fn is_video_document(file_name: &str, mime_type: Option<&str>) -> bool {
    if mime_type.is_some_and(|mime| mime.starts_with("video/")) {
        return true;
    }
    extension_of(file_name).is_some_and(|ext| {
        VIDEO_DOCUMENT_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Whether a video document is in a container other than MP4.
pub fn needs_mp4_conversion(file_name: &str, mime_type: Option<&str>) -> bool {
    let is_mp4 = mime_type == Some("video/mp4")
        || extension_of(file_name).is_some_and(|ext| ext == "mp4");
    !is_mp4
}

fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_are_videos_by_mime_or_extension() {
        assert!(is_video_document("ep1.MKV", None));
        assert!(is_video_document("blob.bin", Some("video/x-matroska")));
        assert!(!is_video_document("notes.txt", Some("text/plain")));
        assert!(!is_video_document("noextension", None));
    }

    #[test]
    fn only_mp4_skips_conversion_warning() {
        assert!(!needs_mp4_conversion("ep1.mp4", None));
        assert!(!needs_mp4_conversion("ep1", Some("video/mp4")));
        assert!(needs_mp4_conversion("ep1.avi", Some("video/x-msvideo")));
    }
}
