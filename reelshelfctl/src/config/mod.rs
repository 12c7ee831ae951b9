//! Operator configuration: `.env`, an optional TOML file and environment
//! overrides, checked against guard rails before use.

pub mod error;
pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions};
pub use models::{Config, ConfigMetadata};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
