// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, InstrumentSettings, SessionSettings, Settings};

/// Loads the application settings from the `config/` directory of the
/// working directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Loads the application settings from `dir`.
///
/// The layers, lowest priority first:
/// 1. `base.toml`.
/// 2. The environment-specific file named by `APP_ENVIRONMENT` (e.g. `development.toml`), if present.
/// 3. Environment variables with the `APP` prefix and `__` separator
///    (e.g. `APP__STRATEGY__RSI_PERIOD=14`).
pub fn load_settings_from(dir: impl AsRef<Path>) -> Result<Settings> {
    let dir = dir.as_ref();
    // Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::from(dir.join("base")))
        .add_source(File::from(dir.join(&environment)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
