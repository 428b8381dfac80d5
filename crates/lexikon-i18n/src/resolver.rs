//! Key resolution with hash indirection and locale fallback

use crate::store::MessageStore;
use crate::Locale;
use tracing::trace;

/// Outcome of resolving a lookup string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Template to format; the lookup itself on a miss
    pub template: &'a str,
    /// Whether a stored translation was found
    pub found: bool,
    /// Locale whose messages supplied the template
    pub locale: Option<&'a Locale>,
}

/// Resolves lookups against a store for a current and optional fallback locale
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a MessageStore,
    current: &'a Locale,
    fallback: Option<&'a Locale>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a MessageStore, current: &'a Locale, fallback: Option<&'a Locale>) -> Self {
        Self {
            store,
            current,
            fallback,
        }
    }

    /// Resolve `lookup` in `namespace`; first match wins:
    ///
    /// 1. current locale, meta hash for `lookup`, then the message under that hash
    /// 2. current locale, message stored directly under `lookup`
    /// 3. the same two steps in the fallback locale, if one is configured
    /// 4. `lookup` itself, with `found == false`
    pub fn resolve(&self, lookup: &'a str, namespace: &str) -> Resolution<'a> {
        if let Some(template) = self.resolve_in(self.current, lookup, namespace) {
            return Resolution {
                template,
                found: true,
                locale: Some(self.current),
            };
        }

        if let Some(fallback) = self.fallback {
            if let Some(template) = self.resolve_in(fallback, lookup, namespace) {
                return Resolution {
                    template,
                    found: true,
                    locale: Some(fallback),
                };
            }
        }

        trace!(lookup = %lookup, namespace = %namespace, "No translation found, echoing lookup");
        Resolution {
            template: lookup,
            found: false,
            locale: None,
        }
    }

    /// Steps 1 and 2 for a single locale
    pub fn resolve_in(&self, locale: &Locale, lookup: &str, namespace: &str) -> Option<&'a str> {
        let store = self.store;
        if let Some(hash) = store.meta_key(locale, namespace, lookup) {
            if let Some(template) = store.message(locale, namespace, hash) {
                return Some(template);
            }
        }
        store.message(locale, namespace, lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MessageStore {
        let mut store = MessageStore::new();
        store.insert_source("es", "common", "Hello", "Hola");
        store.insert_message("es", "common", "Hello", "Direct hola");
        store.insert_message("en", "common", "Goodbye", "Bye!");
        store.insert_source("en", "common", "Only in English", "Only in English (en)");
        store
    }

    #[test]
    fn test_hash_indirection_wins_over_direct_key() {
        let store = store();
        let es = Locale::new("es");
        let resolver = Resolver::new(&store, &es, None);

        let resolution = resolver.resolve("Hello", "common");
        assert_eq!(resolution.template, "Hola");
        assert!(resolution.found);
        assert_eq!(resolution.locale, Some(&es));
    }

    #[test]
    fn test_direct_key_lookup() {
        let store = store();
        let en = Locale::new("en");
        let resolver = Resolver::new(&store, &en, None);
        assert_eq!(resolver.resolve("Goodbye", "common").template, "Bye!");
    }

    #[test]
    fn test_fallback_locale() {
        let store = store();
        let es = Locale::new("es");
        let en = Locale::new("en");
        let resolver = Resolver::new(&store, &es, Some(&en));

        let resolution = resolver.resolve("Only in English", "common");
        assert_eq!(resolution.template, "Only in English (en)");
        assert_eq!(resolution.locale, Some(&en));
    }

    #[test]
    fn test_miss_echoes_lookup() {
        let store = store();
        let es = Locale::new("es");
        let en = Locale::new("en");
        let resolver = Resolver::new(&store, &es, Some(&en));

        let resolution = resolver.resolve("Never translated", "common");
        assert_eq!(resolution.template, "Never translated");
        assert!(!resolution.found);
        assert_eq!(resolution.locale, None);
    }

    #[test]
    fn test_dangling_meta_hash_falls_through_to_direct_key() {
        let mut store = MessageStore::new();
        store.insert_meta("en", "common", "Save", "deadbeef");
        store.insert_message("en", "common", "Save", "Save it");
        let en = Locale::new("en");

        let resolver = Resolver::new(&store, &en, None);
        assert_eq!(resolver.resolve("Save", "common").template, "Save it");
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = store();
        let en = Locale::new("en");
        let resolver = Resolver::new(&store, &en, None);
        assert!(!resolver.resolve("Goodbye", "admin").found);
    }
}
