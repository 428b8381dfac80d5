//! Error types for internationalization operations
//!
//! Only setup problems and misuse cross the public API as errors. Missing
//! translations and broken ICU templates degrade to a best-effort string instead;
//! see [`crate::icu::FormatError`] for the diagnostics produced on that path.

use lexikon_common::LexikonError;
use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Setup was called with an incomplete or inconsistent configuration
    #[error("Invalid i18n configuration: {0}")]
    Config(String),

    /// A locale was selected that has no entry in the message store
    #[error("Locale '{locale}' is not configured; available locales: {available:?}")]
    LocaleNotConfigured {
        locale: String,
        available: Vec<String>,
    },

    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to read a resource file
    #[error("Failed to load resource file {path}: {source}")]
    ResourceLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A resource file did not contain the expected JSON object
    #[error("Failed to parse resource file {path}: {source}")]
    ResourceParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The global instance was used before `init`
    #[error("i18n has not been initialized; call init() first")]
    NotInitialized,

    /// A binding hook was called outside an enclosing provider scope
    #[error("{hook} must be used within an I18nProvider")]
    OutsideProvider { hook: &'static str },
}

impl I18nError {
    /// Whether this error comes from invalid setup data
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::LocaleNotConfigured { .. } | Self::InvalidLanguageId(_)
        )
    }
}

impl From<I18nError> for LexikonError {
    fn from(err: I18nError) -> Self {
        match err {
            I18nError::LocaleNotConfigured { ref locale, .. } => {
                LexikonError::localization_with_locale(err.to_string(), locale.clone())
            }
            err if err.is_config_error() => LexikonError::config(err.to_string()),
            err => LexikonError::localization_with_source("i18n failure", err),
        }
    }
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
