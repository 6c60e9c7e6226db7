//! Configuration: file location, TOML schema, validation.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, StoreConfig, UpdateFailurePolicy};
