//! Handles settings for the application. Configuration is written in
//! `settings.toml`; every key is optional and falls back to sensible
//! defaults (metric units, EUR).
use config::{Config, ConfigError, File};
use engine::StaticSettings;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_level")]
    pub level: String,
    /// Units, currency and default maintenance intervals, read-only for the
    /// repository layer.
    #[serde(default)]
    pub tracker: StaticSettings,
}

fn default_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .build()?;

        settings.try_deserialize()
    }
}
