use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A season or episode number outside the accepted domain.
    InvalidNumber(String),
    /// A catalog entry field failed validation.
    InvalidEntry(String),
    /// An episode range that cannot be satisfied.
    InvalidRange(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidNumber(msg) => {
                write!(f, "invalid number: {msg}")
            }
            ModelError::InvalidEntry(msg) => {
                write!(f, "invalid catalog entry: {msg}")
            }
            ModelError::InvalidRange(msg) => {
                write!(f, "invalid episode range: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
