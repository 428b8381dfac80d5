//! Demonstration of hash-keyed lookup, ICU plurals and tag handlers
//!
//! Run with `LEXIKON_LOG_LEVEL=debug` to see resolution and formatting diagnostics.

use anyhow::anyhow;
use lexikon_common::{init_logging, LoggingConfig, SettingsLoader};
use lexikon_i18n::{values, I18n, MessageStore, Part, PluralKind, PluralizationHelper, Values};

fn main() -> anyhow::Result<()> {
    let settings = SettingsLoader::load()?;
    init_logging(LoggingConfig {
        pretty_format: true,
        ..LoggingConfig::from_settings(&settings)
    })
    .map_err(|e| anyhow!(e))?;

    let mut store = MessageStore::new();
    for (locale, inbox, welcome) in [
        (
            "en",
            "{count, plural, =0 {Your inbox is empty} one {You have # message} other {You have # messages}}",
            "Welcome back, <b>{name}</b>!",
        ),
        (
            "pl",
            "{count, plural, =0 {Skrzynka jest pusta} one {Masz # wiadomość} few {Masz # wiadomości} many {Masz # wiadomości} other {Masz # wiadomości}}",
            "Witaj ponownie, <b>{name}</b>!",
        ),
    ] {
        store.insert_source(locale, "common", "You have {count} messages", inbox);
        store.insert_source(locale, "common", "Welcome back, {name}!", welcome);
    }

    let i18n = I18n::from_store(store, "en", Some("en".into()))?;
    i18n.register_tag("b", |content, _| Part::Text(format!("\x1b[1m{content}\x1b[0m")));

    println!("=== Translation Demo ===\n");
    for locale in ["en", "pl"] {
        i18n.set_locale(locale)?;
        println!("{locale}:");
        for count in [0, 1, 2, 5, 22] {
            let values = values!["count" => count];
            let text = i18n.translate("You have {count} messages", &values, None);
            println!("  {count:>3} -> {text}");
        }
        println!("  {}", i18n.translate("Welcome back, {name}!", &values!["name" => "Ada"], None));
        println!(
            "  plural categories: {:?}\n",
            PluralizationHelper::get_plural_categories(&i18n.locale(), PluralKind::Cardinal)
        );
    }

    println!("untranslated: {}", i18n.translate("Not translated yet", &Values::new(), None));
    Ok(())
}
