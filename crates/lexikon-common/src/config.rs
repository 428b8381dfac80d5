//! Runtime settings for hosts embedding the translation engine
//!
//! Settings are read from a TOML file and then overridden by `LEXIKON_*`
//! environment variables.

use crate::ensure;
use crate::error::{LexikonError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Namespace used when a caller does not name one
pub const DEFAULT_NAMESPACE: &str = "common";

/// Environment variable pointing at a settings file
pub const CONFIG_PATH_VAR: &str = "LEXIKON_CONFIG_PATH";

/// Settings file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "lexikon.toml";

/// Settings for locating resources and choosing locales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Locale active after setup
    pub locale: String,
    /// Locale consulted when the active one has no translation
    pub fallback_locale: Option<String>,
    /// Directory holding `<locale>/<namespace>.json` resource files
    pub locales_dir: PathBuf,
    /// Namespace used by translate calls that do not pass one
    pub default_namespace: String,
    /// Tracing filter directive
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            fallback_locale: None,
            locales_dir: PathBuf::from("locales"),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.locale.trim().is_empty(),
            field = "locale",
            "locale must not be empty"
        );
        ensure!(
            self.fallback_locale
                .as_deref()
                .map_or(true, |fallback| !fallback.trim().is_empty()),
            field = "fallback_locale",
            "fallback_locale must not be empty when set"
        );
        ensure!(
            !self.default_namespace.trim().is_empty(),
            field = "default_namespace",
            "default_namespace must not be empty"
        );
        ensure!(
            !self.locales_dir.as_os_str().is_empty(),
            field = "locales_dir",
            "locales_dir must not be empty"
        );
        ensure!(
            EnvFilter::try_new(&self.log_level).is_ok(),
            field = "log_level",
            "log_level is not a valid filter directive: {}",
            self.log_level
        );
        Ok(())
    }
}

/// Settings loader for host applications
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file, apply environment overrides and validate
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        debug!("Loading settings from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            LexikonError::config_with_source(
                format!("failed to read settings file {}", path.display()),
                e,
            )
        })?;
        let mut settings = Settings::from_toml_str(&content)?;

        Self::apply_env_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `LEXIKON_CONFIG_PATH`, then `lexikon.toml`, then defaults
    pub fn load() -> Result<Settings> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_from_file(path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_from_file(DEFAULT_CONFIG_FILE);
        }

        let mut settings = Settings::default();
        Self::apply_env_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `LEXIKON_*` environment variable overrides
    pub fn apply_env_overrides(settings: &mut Settings) {
        if let Ok(locale) = env::var("LEXIKON_LOCALE") {
            settings.locale = locale;
        }

        if let Ok(fallback) = env::var("LEXIKON_FALLBACK_LOCALE") {
            // An empty value clears a fallback configured in the file
            settings.fallback_locale = Some(fallback).filter(|f| !f.trim().is_empty());
        }

        if let Ok(dir) = env::var("LEXIKON_LOCALES_DIR") {
            settings.locales_dir = PathBuf::from(dir);
        }

        if let Ok(level) = env::var("LEXIKON_LOG_LEVEL") {
            settings.log_level = level;
        }
    }
}
