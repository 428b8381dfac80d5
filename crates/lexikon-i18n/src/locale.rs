//! Locale identifiers
//!
//! A [`Locale`] is mostly opaque: it is a key into the message store and an input
//! to the plural-rule provider. Tags that parse as BCP-47 are canonicalised
//! (`en_us` becomes `en-US`) so that store keys and user input agree; anything else
//! is kept verbatim.

use crate::error::{I18nError, I18nResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// A locale identifier such as `en`, `pt-BR` or `sr-Latn`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale, normalising the tag when it is valid BCP-47
    pub fn new(tag: impl AsRef<str>) -> Self {
        let trimmed = tag.as_ref().trim();
        let candidate = trimmed.replace('_', "-");
        match candidate.parse::<LanguageIdentifier>() {
            Ok(langid) => Self(langid.to_string()),
            Err(_) => Self(trimmed.to_string()),
        }
    }

    /// The normalised tag
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (`pt` for `pt-BR`)
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// Whether the tag is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a `unic-langid` identifier
    pub fn to_language_identifier(&self) -> I18nResult<LanguageIdentifier> {
        self.0
            .parse()
            .map_err(|_| I18nError::InvalidLanguageId(self.0.clone()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<&String> for Locale {
    fn from(tag: &String) -> Self {
        Self::new(tag)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::new(tag))
    }
}
