//! Scoped binding of an [`I18n`] instance for UI layers
//!
//! A UI binding enters a provider scope around a component tree; hooks called
//! inside it find the innermost instance. Scopes are per thread and nest.

use crate::error::{I18nError, I18nResult};
use crate::interpolate::Rendered;
use crate::state::I18n;
use crate::value::Values;
use crate::Locale;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static PROVIDERS: RefCell<Vec<Arc<I18n>>> = const { RefCell::new(Vec::new()) };
}

/// Entry point for provider scopes
pub struct I18nProvider;

impl I18nProvider {
    /// Make `i18n` the innermost instance until the guard is dropped
    pub fn enter(i18n: Arc<I18n>) -> ProviderGuard {
        PROVIDERS.with(|stack| stack.borrow_mut().push(i18n));
        ProviderGuard {
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `i18n` provided
    pub fn scope<R>(i18n: Arc<I18n>, f: impl FnOnce() -> R) -> R {
        let _guard = Self::enter(i18n);
        f()
    }
}

/// Leaves the provider scope on drop
#[must_use = "the provider scope ends when the guard is dropped"]
pub struct ProviderGuard {
    // Scopes live on a thread-local stack
    _not_send: PhantomData<*const ()>,
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        PROVIDERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn current(hook: &'static str) -> I18nResult<Arc<I18n>> {
    PROVIDERS
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(I18nError::OutsideProvider { hook })
}

/// The innermost provided instance
pub fn use_i18n() -> I18nResult<Arc<I18n>> {
    current("use_i18n")
}

/// A translator bound to the innermost instance and a namespace
pub fn use_translation(namespace: Option<&str>) -> I18nResult<Translator> {
    let i18n = current("use_translation")?;
    Ok(Translator {
        i18n,
        namespace: namespace.map(str::to_string),
    })
}

/// What [`use_translation`] hands to a component
#[derive(Debug, Clone)]
pub struct Translator {
    i18n: Arc<I18n>,
    namespace: Option<String>,
}

impl Translator {
    pub fn t(&self, lookup: &str, values: &Values) -> String {
        self.i18n.translate(lookup, values, self.namespace.as_deref())
    }

    /// Tag-aware variant for component trees
    pub fn rich(&self, lookup: &str, values: &Values) -> Rendered {
        self.i18n
            .translate_rich(lookup, values, self.namespace.as_deref())
    }

    pub fn locale(&self) -> Locale {
        self.i18n.locale()
    }

    pub fn set_locale(&self, locale: impl Into<Locale>) -> I18nResult<()> {
        self.i18n.set_locale(locale)
    }

    pub fn i18n(&self) -> &Arc<I18n> {
        &self.i18n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::I18nConfig;
    use crate::store::LocaleEntries;

    fn instance(locale: &str, text: &str) -> Arc<I18n> {
        let mut messages = LocaleEntries::new();
        messages
            .entry(locale.to_string())
            .or_default()
            .entry("common".to_string())
            .or_default()
            .insert("greeting".to_string(), text.to_string());
        Arc::new(I18n::new(I18nConfig::new(locale).messages(messages)).unwrap())
    }

    #[test]
    fn test_hooks_fail_outside_provider() {
        let err = use_i18n().unwrap_err();
        assert_eq!(err.to_string(), "use_i18n must be used within an I18nProvider");

        let err = use_translation(None).unwrap_err();
        assert!(matches!(err, I18nError::OutsideProvider { hook: "use_translation" }));
    }

    #[test]
    fn test_nested_scopes_use_innermost_instance() {
        let outer = instance("en", "Hello");
        let inner = instance("de", "Hallo");

        I18nProvider::scope(outer, || {
            let t = use_translation(None).unwrap();
            assert_eq!(t.t("greeting", &Values::new()), "Hello");

            I18nProvider::scope(inner, || {
                let t = use_translation(Some("common")).unwrap();
                assert_eq!(t.t("greeting", &Values::new()), "Hallo");
                assert_eq!(t.locale().as_str(), "de");
            });

            assert_eq!(use_i18n().unwrap().locale().as_str(), "en");
        });

        assert!(use_i18n().is_err());
    }
}
