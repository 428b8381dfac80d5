//! Property tests for resolution and formatting invariants

use lexikon_i18n::{values, I18n, MessageStore, Values};
use proptest::prelude::*;

fn i18n() -> I18n {
    let mut store = MessageStore::new();
    store.insert_source("en", "common", "Known phrase", "Translated phrase");
    store.insert_source(
        "en",
        "common",
        "Items",
        "{count, plural, =0 {none} one {# item} other {# items}}",
    );
    I18n::from_store(store, "en", None).unwrap()
}

proptest! {
    #[test]
    fn prop_unknown_lookups_echo(lookup in "[A-Za-z ,.!?]{1,40}") {
        prop_assume!(lookup != "Known phrase" && lookup != "Items");
        prop_assert_eq!(i18n().translate(&lookup, &Values::new(), None), lookup);
    }

    #[test]
    fn prop_translate_never_panics(lookup in "\\PC{0,60}", count in any::<i64>()) {
        let i18n = i18n();
        let _ = i18n.translate(&lookup, &values!["count" => count, "name" => "x"], None);
        let _ = i18n.translate_rich(&lookup, &Values::new(), Some("other"));
    }

    #[test]
    fn prop_plural_renders_count(count in 2i64..1000) {
        let rendered = i18n().translate("Items", &values!["count" => count], None);
        prop_assert!(rendered.ends_with(" items"), "unexpected rendering: {}", rendered);
    }
}
