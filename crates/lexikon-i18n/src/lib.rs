//! Hash-keyed message translation with ICU MessageFormat support
//!
//! This crate resolves a source phrase (or its opaque 8-hex key) to a translated
//! template and formats it. It includes:
//!
//! - A message store keyed by locale, namespace and opaque key, with optional
//!   source-phrase meta mappings
//! - Key resolution with hash indirection and a fallback locale
//! - ICU `plural`, `selectordinal`, `select`, `number`, `date` and `time`
//!   evaluation driven by CLDR plural rules
//! - `<tag>…</tag>` handlers and `{var}` substitution
//! - Graceful degradation: misses echo the lookup, broken templates render raw
//!
//! # Example
//!
//! ```rust
//! use lexikon_i18n::{values, I18n, MessageStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = MessageStore::new();
//! store.insert_source(
//!     "de",
//!     "common",
//!     "You have {count} messages",
//!     "{count, plural, one {Du hast # Nachricht} other {Du hast # Nachrichten}}",
//! );
//!
//! let i18n = I18n::from_store(store, "de", None)?;
//! let text = i18n.translate("You have {count} messages", &values!["count" => 3], None);
//! assert_eq!(text, "Du hast 3 Nachrichten");
//! assert_eq!(i18n.t("Untranslated"), "Untranslated");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod error;
pub mod global;
pub mod hash;
pub mod icu;
pub mod interpolate;
pub mod locale;
pub mod pluralization;
pub mod provider;
pub mod resolver;
pub mod resource;
pub mod state;
pub mod store;
pub mod validate;
pub mod value;

pub use error::{I18nError, I18nResult};
pub use hash::message_key;
pub use interpolate::{Rendered, TagRegistry};
pub use locale::Locale;
pub use pluralization::{PluralKind, PluralizationHelper};
pub use provider::{use_i18n, use_translation, I18nProvider, Translator};
pub use resolver::{Resolution, Resolver};
pub use resource::ResourceManager;
pub use state::{I18n, I18nConfig};
pub use store::{LocaleEntries, MessageStore, NamespaceEntries};
pub use value::{Node, Part, Renderable, Scalar, TagHandler, Value, Values};

pub use lexikon_common::DEFAULT_NAMESPACE;
