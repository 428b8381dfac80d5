//! Locale and session state
//!
//! [`I18n`] owns the message store, the current and fallback locales and the
//! registered tag handlers. It is `Send + Sync`; share it as `Arc<I18n>`.

use crate::error::{I18nError, I18nResult};
use crate::icu;
use crate::interpolate::{interpolate, Rendered, TagRegistry};
use crate::resolver::Resolver;
use crate::resource::ResourceManager;
use crate::store::{LocaleEntries, MessageStore};
use crate::value::{Part, TagHandler, Values};
use crate::Locale;
use lexikon_common::{Settings, DEFAULT_NAMESPACE};
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Setup input: `{ locale, messages, meta?, fallbackLocale? }`
///
/// Every field is optional at the type level so that incomplete input is
/// reported as [`I18nError::Config`] by [`I18n::new`] rather than failing to
/// deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    pub locale: Option<String>,
    pub messages: Option<LocaleEntries>,
    #[serde(default)]
    pub meta: Option<LocaleEntries>,
    #[serde(default, alias = "fallback_locale")]
    pub fallback_locale: Option<String>,
    #[serde(default, alias = "default_namespace")]
    pub default_namespace: Option<String>,
}

impl I18nConfig {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Self::default()
        }
    }

    pub fn messages(mut self, messages: LocaleEntries) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn meta(mut self, meta: LocaleEntries) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    /// Parse a JSON setup object
    pub fn from_json(json: &str) -> I18nResult<Self> {
        serde_json::from_str(json).map_err(|e| I18nError::Config(e.to_string()))
    }

    fn into_state(self) -> I18nResult<State> {
        let locale = self
            .locale
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| I18nError::Config("a locale is required".to_string()))?;
        let messages = self
            .messages
            .ok_or_else(|| I18nError::Config("a messages object is required".to_string()))?;

        let store = MessageStore::from_maps(messages, self.meta);
        State::build(
            store,
            Locale::new(locale),
            self.fallback_locale.map(Locale::new),
            self.default_namespace,
        )
    }
}

#[derive(Debug)]
struct State {
    store: MessageStore,
    current: Locale,
    fallback: Option<Locale>,
    default_namespace: String,
}

impl State {
    fn build(
        store: MessageStore,
        current: Locale,
        fallback: Option<Locale>,
        default_namespace: Option<String>,
    ) -> I18nResult<Self> {
        if current.is_empty() {
            return Err(I18nError::Config("a locale is required".to_string()));
        }
        if !store.has_locale(&current) {
            return Err(I18nError::Config(format!(
                "no messages provided for locale '{current}'"
            )));
        }
        if let Some(fallback) = fallback.as_ref().filter(|f| !store.has_locale(f)) {
            // Lookups through it simply miss
            warn!(fallback = %fallback, "No messages provided for fallback locale");
        }

        Ok(Self {
            store,
            current,
            fallback,
            default_namespace: default_namespace
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        })
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.current, self.fallback.as_ref())
    }
}

/// Translation context
#[derive(Debug)]
pub struct I18n {
    state: RwLock<State>,
    tags: RwLock<Arc<TagRegistry>>,
}

impl I18n {
    /// Validate `config` and build a ready instance
    pub fn new(config: I18nConfig) -> I18nResult<Self> {
        let state = config.into_state()?;
        info!(
            locale = %state.current,
            fallback = ?state.fallback.as_ref().map(Locale::as_str),
            messages = state.store.len(),
            "i18n initialized"
        );
        Ok(Self::from_state(state))
    }

    /// Build from an existing store
    pub fn from_store(
        store: MessageStore,
        locale: impl Into<Locale>,
        fallback: Option<Locale>,
    ) -> I18nResult<Self> {
        let state = State::build(store, locale.into(), fallback, None)?;
        Ok(Self::from_state(state))
    }

    /// Load every locale under `settings.locales_dir` and select `settings.locale`
    pub fn from_settings(settings: &Settings) -> I18nResult<Self> {
        settings
            .validate()
            .map_err(|e| I18nError::Config(e.to_string()))?;
        let mut resources = ResourceManager::new(&settings.locales_dir);
        let store = resources.load_all()?;
        let state = State::build(
            store,
            Locale::new(&settings.locale),
            settings.fallback_locale.as_deref().map(Locale::new),
            Some(settings.default_namespace.clone()),
        )?;
        info!(
            locales_dir = %settings.locales_dir.display(),
            locale = %state.current,
            loaded = resources.loaded_locales().len(),
            "i18n initialized from settings"
        );
        Ok(Self::from_state(state))
    }

    fn from_state(state: State) -> Self {
        Self {
            state: RwLock::new(state),
            tags: RwLock::new(Arc::new(TagRegistry::new())),
        }
    }

    /// Replace store and locales wholesale; registered tags are kept
    pub fn reconfigure(&self, config: I18nConfig) -> I18nResult<()> {
        let state = config.into_state()?;
        info!(locale = %state.current, messages = state.store.len(), "i18n reconfigured");
        *self.state.write() = state;
        Ok(())
    }

    pub fn locale(&self) -> Locale {
        self.state.read().current.clone()
    }

    pub fn fallback_locale(&self) -> Option<Locale> {
        self.state.read().fallback.clone()
    }

    pub fn default_namespace(&self) -> String {
        self.state.read().default_namespace.clone()
    }

    /// Switch the current locale; unknown locales leave state unchanged
    pub fn set_locale(&self, locale: impl Into<Locale>) -> I18nResult<()> {
        let locale = locale.into();
        let mut state = self.state.write();
        if !state.store.has_locale(&locale) {
            return Err(I18nError::LocaleNotConfigured {
                locale: locale.to_string(),
                available: state.store.locales().iter().map(|l| l.to_string()).collect(),
            });
        }
        if state.current != locale {
            debug!(from = %state.current, to = %locale, "Switching locale");
            state.current = locale;
        }
        Ok(())
    }

    /// Locales with messages, sorted
    pub fn available_locales(&self) -> Vec<Locale> {
        self.state.read().store.locales().into_iter().cloned().collect()
    }

    /// Register a handler used for `<name>…</name>` in every translation
    pub fn register_tag<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Part, &Locale) -> Part + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(tag = %name, "Registering tag handler");
        Arc::make_mut(&mut *self.tags.write()).register(name, TagHandler::new(handler));
    }

    pub fn unregister_tag(&self, name: &str) -> bool {
        Arc::make_mut(&mut *self.tags.write()).remove(name).is_some()
    }

    /// Whether `lookup` resolves to a stored translation in `namespace`
    pub fn has_translation(&self, lookup: &str, namespace: Option<&str>) -> bool {
        let state = self.state.read();
        let namespace = namespace.unwrap_or(&state.default_namespace);
        state.resolver().resolve(lookup, namespace).found
    }

    /// Resolve without formatting
    pub fn resolve(&self, lookup: &str, namespace: Option<&str>) -> (String, bool) {
        let state = self.state.read();
        let namespace = namespace.unwrap_or(&state.default_namespace);
        let resolution = state.resolver().resolve(lookup, namespace);
        (resolution.template.to_string(), resolution.found)
    }

    /// Translate to a flat string
    pub fn translate(&self, lookup: &str, values: &Values, namespace: Option<&str>) -> String {
        self.translate_rich(lookup, values, namespace).to_plain_string()
    }

    /// Translate, keeping tag handler output as parts
    pub fn translate_rich(
        &self,
        lookup: &str,
        values: &Values,
        namespace: Option<&str>,
    ) -> Rendered {
        let (template, plural_locale, current) = {
            let state = self.state.read();
            let namespace = namespace.unwrap_or(&state.default_namespace);
            let resolution = state.resolver().resolve(lookup, namespace);
            (
                resolution.template.to_string(),
                resolution.locale.unwrap_or(&state.current).clone(),
                state.current.clone(),
            )
        };
        // Handlers run without holding the state lock
        let tags = Arc::clone(&*self.tags.read());

        let formatted = if icu::is_icu(&template) {
            icu::format_icu(&template, &plural_locale, values)
        } else {
            template
        };
        interpolate(&formatted, values, &tags, &current)
    }

    /// Translate in the default namespace without values
    pub fn t(&self, lookup: &str) -> String {
        self.translate(lookup, &Values::new(), None)
    }

    /// Read access to the store, for validators
    pub fn with_store<R>(&self, f: impl FnOnce(&MessageStore) -> R) -> R {
        f(&self.state.read().store)
    }
}
