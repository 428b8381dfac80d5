//! Process-wide instance for callers that do not thread an [`I18n`] around

use crate::error::{I18nError, I18nResult};
use crate::interpolate::Rendered;
use crate::state::{I18n, I18nConfig};
use crate::value::{Part, Values};
use crate::Locale;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

static GLOBAL: Lazy<RwLock<Option<Arc<I18n>>>> = Lazy::new(|| RwLock::new(None));

/// Set up the global instance; later calls replace its state wholesale
pub fn init(config: I18nConfig) -> I18nResult<Arc<I18n>> {
    let mut slot = GLOBAL.write();
    if let Some(existing) = slot.as_ref() {
        existing.reconfigure(config)?;
        return Ok(Arc::clone(existing));
    }

    let i18n = Arc::new(I18n::new(config)?);
    *slot = Some(Arc::clone(&i18n));
    debug!("Global i18n instance installed");
    Ok(i18n)
}

/// Install an already built instance, replacing any previous one
pub fn install(i18n: Arc<I18n>) {
    *GLOBAL.write() = Some(i18n);
}

pub fn is_initialized() -> bool {
    GLOBAL.read().is_some()
}

pub fn instance() -> I18nResult<Arc<I18n>> {
    GLOBAL.read().clone().ok_or(I18nError::NotInitialized)
}

/// Translate with the global instance; echoes `lookup` before `init`
pub fn translate(lookup: &str, values: &Values, namespace: Option<&str>) -> String {
    match instance() {
        Ok(i18n) => i18n.translate(lookup, values, namespace),
        Err(_) => {
            warn!(lookup = %lookup, "Translation requested before i18n was initialized");
            lookup.to_string()
        }
    }
}

pub fn translate_rich(lookup: &str, values: &Values, namespace: Option<&str>) -> Rendered {
    match instance() {
        Ok(i18n) => i18n.translate_rich(lookup, values, namespace),
        Err(_) => {
            warn!(lookup = %lookup, "Translation requested before i18n was initialized");
            Rendered::Text(lookup.to_string())
        }
    }
}

/// `translate` in the default namespace without values
pub fn t(lookup: &str) -> String {
    translate(lookup, &Values::new(), None)
}

pub fn get_locale() -> I18nResult<Locale> {
    Ok(instance()?.locale())
}

pub fn set_locale(locale: impl Into<Locale>) -> I18nResult<()> {
    instance()?.set_locale(locale)
}

pub fn register_tag<F>(name: impl Into<String>, handler: F) -> I18nResult<()>
where
    F: Fn(Part, &Locale) -> Part + Send + Sync + 'static,
{
    instance()?.register_tag(name, handler);
    Ok(())
}
