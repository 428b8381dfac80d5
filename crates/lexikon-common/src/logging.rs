//! Structured logging bootstrap for lexikon hosts
//!
//! The engine itself only emits `tracing` events; a host application (or a test)
//! decides where they go by installing a subscriber through one of these helpers.

use crate::config::Settings;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Boxed error returned when a subscriber cannot be installed
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "lexikon_i18n=debug")
    pub level: String,
    /// Emit one JSON object per event
    pub json_format: bool,
    /// Multi-line pretty output with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Build a config with the given filter directive
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Compact output filtered by `settings.log_level`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_level(settings.log_level.clone())
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn open_log_file(path: &str) -> Result<Mutex<std::fs::File>, LoggingError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(Mutex::new(file))
}

/// Initialize the tracing subscriber with the given configuration
///
/// Returns an error instead of panicking when a global subscriber is already set,
/// so it is safe to call from several tests.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let span_events = config.span_events();

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path.as_deref() {
            Some(path) => registry.with(layer.with_writer(open_log_file(path)?)).try_init()?,
            None => registry.with(layer).try_init()?,
        }
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path.as_deref() {
            Some(path) => registry
                .with(layer.with_ansi(false).with_writer(open_log_file(path)?))
                .try_init()?,
            None => registry.with(layer).try_init()?,
        }
    } else {
        let layer = fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path.as_deref() {
            Some(path) => registry
                .with(layer.with_ansi(false).with_writer(open_log_file(path)?))
                .try_init()?,
            None => registry.with(layer).try_init()?,
        }
    }

    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> Result<(), LoggingError> {
    init_logging(LoggingConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_config_from_settings_uses_log_level() {
        let settings = Settings {
            log_level: "lexikon_i18n=trace".to_string(),
            ..Settings::default()
        };
        let config = LoggingConfig::from_settings(&settings);
        assert_eq!(config.level, "lexikon_i18n=trace");
        assert_eq!(config.env_filter().to_string(), "lexikon_i18n=trace");
        assert!(!config.json_format);
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = LoggingConfig::with_level("lexikon=notalevel");
        assert_eq!(config.env_filter().to_string(), "info");
    }

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let _ = init_default_logging();
        assert!(init_default_logging().is_err());
    }
}
