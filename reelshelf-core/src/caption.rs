//! Caption metadata parsing for incoming media items.
//!
//! Operators tag each forwarded video with a caption such as
//! `id:65f1c0 season:2 episode:5 (dub)`. Only three whitespace-delimited
//! tokens matter, in any order; everything else is free text.

use once_cell::sync::Lazy;
use regex::Regex;
use reelshelf_model::{CatalogId, EpisodeKey, EpisodeNumber, SeasonNumber};
use tracing::debug;

static ID_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)id:(\S+)").expect("id token regex should compile")
});
static SEASON_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)season:(\S+)")
        .expect("season token regex should compile")
});
static EPISODE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)episode:(\S+)")
        .expect("episode token regex should compile")
});

/// Metadata extracted from a caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCaption {
    pub id: CatalogId,
    pub season: SeasonNumber,
    pub episode: EpisodeNumber,
}

impl ParsedCaption {
    pub fn key(&self) -> EpisodeKey {
        EpisodeKey::new(self.season, self.episode)
    }

    /// Canonical caption for this item, suitable for tagging uploads.
    pub fn render(&self) -> String {
        format!(
            "id:{} season:{} episode:{}",
            self.id, self.season, self.episode
        )
    }
}

/// Stateless caption parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionParser;

impl CaptionParser {
    /// Extract `(id, season, episode)` from free text.
    ///
    /// Returns `None` when a token is missing or a number is not a positive
    /// integer. Season and episode numbers above 65535 are treated as
    /// missing. The first occurrence of each token wins.
    pub fn parse(text: &str) -> Option<ParsedCaption> {
        let id = Self::token(&ID_TOKEN, text)?;
        let season = Self::token(&SEASON_TOKEN, text)?;
        let episode = Self::token(&EPISODE_TOKEN, text)?;

        let parsed = ParsedCaption {
            id: CatalogId::new(id).ok()?,
            season: Self::positive(season)?.try_into().ok()?,
            episode: Self::positive(episode)?.try_into().ok()?,
        };
        debug!(
            catalog_id = %parsed.id,
            season = parsed.season.value(),
            episode = parsed.episode.value(),
            "parsed caption"
        );
        Some(parsed)
    }

    fn token<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }

    fn positive(raw: &str) -> Option<u16> {
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<u16>().ok().filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_with_trailing_junk() {
        let parsed =
            CaptionParser::parse("id:abc season:2 episode:5 extra junk")
                .unwrap();
        assert_eq!(parsed.id.as_str(), "abc");
        assert_eq!(parsed.season.value(), 2);
        assert_eq!(parsed.episode.value(), 5);
    }

    #[test]
    fn tokens_may_appear_in_any_order() {
        let parsed = CaptionParser::parse(
            "Episode title here\nepisode:12 id:S1 season:3",
        )
        .unwrap();
        assert_eq!(parsed.render(), "id:S1 season:3 episode:12");
    }

    #[test]
    fn missing_id_is_absent() {
        assert_eq!(CaptionParser::parse("season:2 episode:5"), None);
    }

    #[test]
    fn non_numeric_season_is_absent() {
        assert_eq!(CaptionParser::parse("id:abc season:x episode:5"), None);
    }

    #[test]
    fn zero_signed_and_overflowing_numbers_are_absent() {
        assert_eq!(CaptionParser::parse("id:a season:0 episode:1"), None);
        assert_eq!(CaptionParser::parse("id:a season:+1 episode:1"), None);
        assert_eq!(CaptionParser::parse("id:a season:1 episode:-1"), None);
        assert_eq!(
            CaptionParser::parse("id:a season:1 episode:70000"),
            None
        );
    }

    #[test]
    fn tokens_are_case_sensitive_and_whitespace_delimited() {
        assert_eq!(CaptionParser::parse("ID:a Season:1 Episode:1"), None);
        // `vid:` must not be read as an `id:` token.
        assert_eq!(CaptionParser::parse("vid:a season:1 episode:1"), None);
    }

    #[test]
    fn empty_tokens_are_absent() {
        assert_eq!(CaptionParser::parse("id: season:1 episode:1"), None);
        assert_eq!(CaptionParser::parse(""), None);
    }
}
