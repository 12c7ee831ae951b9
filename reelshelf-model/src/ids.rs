use crate::error::ModelError;
use uuid::Uuid;

/// Opaque, store-assigned identifier of a catalog entry (movie or series).
///
/// Identifiers travel through captions as plain tokens, so they are kept as
/// strings rather than parsed UUIDs. Stores mint new ones with
/// [`CatalogId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidEntry(format!(
                "catalog id `{id}` must be a non-empty token"
            )));
        }
        Ok(CatalogId(id))
    }

    /// Mint a fresh time-ordered identifier.
    pub fn generate() -> Self {
        CatalogId(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CatalogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CatalogId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_spaced_ids() {
        assert!(CatalogId::new("").is_err());
        assert!(CatalogId::new("two words").is_err());
        assert_eq!(CatalogId::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn generated_ids_are_caption_safe() {
        let id = CatalogId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(CatalogId::new(id.as_str()).is_ok());
    }
}
