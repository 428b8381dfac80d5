//! Message and meta storage
//!
//! Messages map `(locale, namespace, opaque key)` to a template string. Meta maps
//! `(locale, namespace, source text)` to the opaque key the extractor assigned.
//! Meta is optional; without it the resolver falls back to direct-key lookup.

use crate::error::{I18nError, I18nResult};
use crate::hash::message_key;
use crate::Locale;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::warn;

/// `namespace -> key -> string`
pub type NamespaceEntries = HashMap<String, HashMap<String, String>>;

/// `locale -> namespace -> key -> string`, the shape of setup input
pub type LocaleEntries = HashMap<String, NamespaceEntries>;

/// In-memory message and meta store
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: HashMap<Locale, NamespaceEntries>,
    meta: HashMap<Locale, NamespaceEntries>,
}

impl MessageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-loaded nested maps
    pub fn from_maps(messages: LocaleEntries, meta: Option<LocaleEntries>) -> Self {
        let mut store = Self::new();
        for (locale, namespaces) in messages {
            let entry = store.messages.entry(Locale::new(locale)).or_default();
            merge_into(entry, namespaces);
        }
        for (locale, namespaces) in meta.unwrap_or_default() {
            let entry = store.meta.entry(Locale::new(locale)).or_default();
            merge_into(entry, namespaces);
        }
        store
    }

    /// Build a store from untyped JSON
    ///
    /// Locale and namespace levels must be objects. Leaf values that are not
    /// strings are dropped with a warning.
    pub fn from_json(messages: &JsonValue, meta: Option<&JsonValue>) -> I18nResult<Self> {
        let messages = nested_from_json(messages, "messages")?;
        let meta = meta.map(|m| nested_from_json(m, "meta")).transpose()?;
        Ok(Self::from_maps(messages, meta))
    }

    /// Insert one translation under an opaque key
    pub fn insert_message(
        &mut self,
        locale: impl Into<Locale>,
        namespace: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.messages
            .entry(locale.into())
            .or_default()
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Record which opaque key a source phrase maps to
    pub fn insert_meta(
        &mut self,
        locale: impl Into<Locale>,
        namespace: impl Into<String>,
        source: impl Into<String>,
        key: impl Into<String>,
    ) {
        self.meta
            .entry(locale.into())
            .or_default()
            .entry(namespace.into())
            .or_default()
            .insert(source.into(), key.into());
    }

    /// Insert a translation for a source phrase the way the extractor does:
    /// hash the phrase, store the translation under the hash and record the
    /// meta entry. Returns the opaque key.
    pub fn insert_source(
        &mut self,
        locale: impl Into<Locale>,
        namespace: impl Into<String>,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> String {
        let locale = locale.into();
        let namespace = namespace.into();
        let source = source.into();
        let key = message_key(&source);
        self.insert_message(locale.clone(), namespace.clone(), key.clone(), translation);
        self.insert_meta(locale, namespace, source, key.clone());
        key
    }

    /// Merge a whole namespace, as read from one pair of resource files
    pub fn merge_namespace(
        &mut self,
        locale: &Locale,
        namespace: &str,
        messages: HashMap<String, String>,
        meta: Option<HashMap<String, String>>,
    ) {
        self.messages
            .entry(locale.clone())
            .or_default()
            .entry(namespace.to_string())
            .or_default()
            .extend(messages);
        if let Some(meta) = meta {
            self.meta
                .entry(locale.clone())
                .or_default()
                .entry(namespace.to_string())
                .or_default()
                .extend(meta);
        }
    }

    /// Whether the locale has a messages entry
    pub fn has_locale(&self, locale: &Locale) -> bool {
        self.messages.contains_key(locale)
    }

    /// Locales with messages, sorted
    pub fn locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<_> = self.messages.keys().collect();
        locales.sort();
        locales
    }

    /// Namespaces present for a locale, sorted
    pub fn namespaces(&self, locale: &Locale) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self
            .messages
            .get(locale)
            .map(|ns| ns.keys().map(String::as_str).collect())
            .unwrap_or_default();
        namespaces.sort_unstable();
        namespaces
    }

    /// Message keys of one namespace, sorted
    pub fn keys(&self, locale: &Locale, namespace: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .namespace_messages(locale, namespace)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// All messages of one namespace
    pub fn namespace_messages(
        &self,
        locale: &Locale,
        namespace: &str,
    ) -> Option<&HashMap<String, String>> {
        self.messages.get(locale)?.get(namespace)
    }

    /// The template stored under an opaque key
    pub fn message(&self, locale: &Locale, namespace: &str, key: &str) -> Option<&str> {
        self.namespace_messages(locale, namespace)?
            .get(key)
            .map(String::as_str)
    }

    /// The opaque key recorded for a source phrase
    pub fn meta_key(&self, locale: &Locale, namespace: &str, source: &str) -> Option<&str> {
        self.meta
            .get(locale)?
            .get(namespace)?
            .get(source)
            .map(String::as_str)
    }

    /// Total number of templates across all locales
    pub fn len(&self) -> usize {
        self.messages
            .values()
            .flat_map(|ns| ns.values())
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn merge_into(target: &mut NamespaceEntries, source: NamespaceEntries) {
    for (namespace, entries) in source {
        target.entry(namespace).or_default().extend(entries);
    }
}

fn nested_from_json(value: &JsonValue, what: &str) -> I18nResult<LocaleEntries> {
    let locales = value
        .as_object()
        .ok_or_else(|| I18nError::Config(format!("{what} must be an object keyed by locale")))?;

    let mut out = LocaleEntries::with_capacity(locales.len());
    for (locale, namespaces) in locales {
        let namespaces = namespaces.as_object().ok_or_else(|| {
            I18nError::Config(format!("{what}.{locale} must be an object keyed by namespace"))
        })?;

        let mut by_namespace = NamespaceEntries::with_capacity(namespaces.len());
        for (namespace, entries) in namespaces {
            let context = format!("{what}.{locale}.{namespace}");
            by_namespace.insert(namespace.clone(), string_entries(entries, &context)?);
        }
        out.insert(locale.clone(), by_namespace);
    }
    Ok(out)
}

/// Read a flat JSON object of strings, dropping non-string values
pub(crate) fn string_entries(
    value: &JsonValue,
    context: &str,
) -> I18nResult<HashMap<String, String>> {
    let object = value
        .as_object()
        .ok_or_else(|| I18nError::Config(format!("{context} must be an object of strings")))?;

    let mut entries = HashMap::with_capacity(object.len());
    for (key, value) in object {
        match value {
            JsonValue::String(s) => {
                entries.insert(key.clone(), s.clone());
            }
            other => {
                warn!(
                    context = %context,
                    key = %key,
                    value = %other,
                    "Dropping non-string translation value"
                );
            }
        }
    }
    Ok(entries)
}
