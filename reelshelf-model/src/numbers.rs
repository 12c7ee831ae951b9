use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Season number. Seasons are counted from 1; zero is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "u16"))]
pub struct SeasonNumber(u16);

impl SeasonNumber {
    pub fn new(num: u16) -> Result<Self, ModelError> {
        if num == 0 {
            return Err(ModelError::InvalidNumber(
                "season number must be positive".to_string(),
            ));
        }
        Ok(SeasonNumber(num))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for SeasonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for SeasonNumber {
    type Error = ModelError;

    fn try_from(num: u16) -> Result<Self, Self::Error> {
        SeasonNumber::new(num)
    }
}

impl From<SeasonNumber> for u16 {
    fn from(num: SeasonNumber) -> Self {
        num.0
    }
}

impl FromStr for SeasonNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.trim().parse::<u16>().map_err(|_| {
            ModelError::InvalidNumber(format!("`{s}` is not a season number"))
        })?;
        SeasonNumber::new(num)
    }
}

/// Episode number within a season. Episodes are counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "u16"))]
pub struct EpisodeNumber(u16);

impl EpisodeNumber {
    pub fn new(num: u16) -> Result<Self, ModelError> {
        if num == 0 {
            return Err(ModelError::InvalidNumber(
                "episode number must be positive".to_string(),
            ));
        }
        Ok(EpisodeNumber(num))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for EpisodeNumber {
    type Error = ModelError;

    fn try_from(num: u16) -> Result<Self, Self::Error> {
        EpisodeNumber::new(num)
    }
}

impl From<EpisodeNumber> for u16 {
    fn from(num: EpisodeNumber) -> Self {
        num.0
    }
}

impl FromStr for EpisodeNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.trim().parse::<u16>().map_err(|_| {
            ModelError::InvalidNumber(format!("`{s}` is not an episode number"))
        })?;
        EpisodeNumber::new(num)
    }
}

/// Numbers arrive as JSON integers in most places but as strings when they
/// key a map, so both forms are accepted.
#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};

    use super::{EpisodeNumber, SeasonNumber};

    struct PositiveNumber(&'static str);

    impl Visitor<'_> for PositiveNumber {
        type Value = u16;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a {} number as an integer or numeric string", self.0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u16, E> {
            u16::try_from(v)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u16, E> {
            u16::try_from(v)
                .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u16, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    impl<'de> Deserialize<'de> for SeasonNumber {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let num = deserializer.deserialize_any(PositiveNumber("season"))?;
            SeasonNumber::new(num).map_err(de::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for EpisodeNumber {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let num = deserializer.deserialize_any(PositiveNumber("episode"))?;
            EpisodeNumber::new(num).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(SeasonNumber::new(0).is_err());
        assert!(EpisodeNumber::new(0).is_err());
        assert_eq!(SeasonNumber::new(3).unwrap().value(), 3);
    }

    #[test]
    fn parses_trimmed_text() {
        assert_eq!(" 2 ".parse::<SeasonNumber>().unwrap().value(), 2);
        assert!("x".parse::<EpisodeNumber>().is_err());
        assert!("-1".parse::<EpisodeNumber>().is_err());
        assert!("0".parse::<EpisodeNumber>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_integers_and_numeric_strings() {
        let season: SeasonNumber = serde_json::from_str("3").unwrap();
        assert_eq!(season.value(), 3);
        let episode: EpisodeNumber = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(episode.value(), 12);
        assert!(serde_json::from_str::<SeasonNumber>("0").is_err());
        assert!(serde_json::from_str::<EpisodeNumber>("\"x\"").is_err());
        assert!(serde_json::from_str::<EpisodeNumber>("70000").is_err());
    }
}
