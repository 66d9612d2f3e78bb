//! JSON-file settings store

use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::config::{TranslatorSettings, ENV_PREFIX};
use crate::host::SettingsStore;

/// File name used under the user's config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings persisted as JSON, merged over defaults and `DUALTEXT_*` env vars on load
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    env_prefix: String,
}

impl JsonFileSettingsStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix for overrides
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// `<config dir>/dualtext/settings.json`, or `./settings.json` when no config dir exists
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("dualtext").join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Location of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> anyhow::Result<TranslatorSettings> {
        TranslatorSettings::load_with_env_prefix(&self.path, &self.env_prefix)
    }

    fn save(&self, settings: &TranslatorSettings) -> anyhow::Result<()> {
        settings.to_file(&self.path)?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
