use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::numbers::{EpisodeNumber, SeasonNumber};

/// Episode slot within one series. Orders season-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeKey {
    pub season: SeasonNumber,
    pub episode: EpisodeNumber,
}

impl EpisodeKey {
    pub fn new(season: SeasonNumber, episode: EpisodeNumber) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S{:02}E{:02}",
            self.season.value(),
            self.episode.value()
        )
    }
}

/// Inclusive range of episode numbers declared up front for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeRange {
    start: EpisodeNumber,
    end: EpisodeNumber,
}

impl EpisodeRange {
    pub fn new(
        start: EpisodeNumber,
        end: EpisodeNumber,
    ) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range holding exactly one episode.
    pub fn single(episode: EpisodeNumber) -> Self {
        Self {
            start: episode,
            end: episode,
        }
    }

    pub fn start(&self) -> EpisodeNumber {
        self.start
    }

    pub fn end(&self) -> EpisodeNumber {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end.value() - self.start.value()) + 1
    }

    /// Ranges always hold at least one episode.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, episode: EpisodeNumber) -> bool {
        self.start <= episode && episode <= self.end
    }
}

impl fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses the operator shorthand `"3"` or `"1-5"`.
impl FromStr for EpisodeRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((start, end)) => {
                EpisodeRange::new(start.parse()?, end.parse()?)
            }
            None => Ok(EpisodeRange::single(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(n: u16) -> EpisodeNumber {
        EpisodeNumber::new(n).unwrap()
    }

    #[test]
    fn keys_order_by_season_then_episode() {
        let s1 = SeasonNumber::new(1).unwrap();
        let s2 = SeasonNumber::new(2).unwrap();
        let mut keys = vec![
            EpisodeKey::new(s2, ep(1)),
            EpisodeKey::new(s1, ep(10)),
            EpisodeKey::new(s1, ep(2)),
        ];
        keys.sort();
        assert_eq!(
            keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["S01E02", "S01E10", "S02E01"]
        );
    }

    #[test]
    fn range_shorthand() {
        let range: EpisodeRange = "4-6".parse().unwrap();
        assert_eq!(range.len(), 3);
        assert!(range.contains(ep(4)) && range.contains(ep(6)));
        assert!(!range.contains(ep(3)) && !range.contains(ep(7)));

        let single: EpisodeRange = " 3 ".parse().unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.to_string(), "3");

        assert!("6-4".parse::<EpisodeRange>().is_err());
        assert!("0-4".parse::<EpisodeRange>().is_err());
        assert!("a-b".parse::<EpisodeRange>().is_err());
    }
}
