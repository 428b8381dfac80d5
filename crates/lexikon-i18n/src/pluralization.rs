//! Plural category selection
//!
//! Categories come from the CLDR rules shipped in `intl_pluralrules`. A locale
//! the rule tables do not know is retried with its bare language subtag, then
//! falls back to English rules so that evaluation always has an answer.
//! Built rules are cached per locale and kind for the life of the process.

use crate::Locale;
use intl_pluralrules::{PluralCategory, PluralRuleType, PluralRules};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use unic_langid::LanguageIdentifier;

type RulesCache = HashMap<(Locale, PluralKind), Arc<PluralRules>>;

static RULES: Lazy<RwLock<RulesCache>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Cardinal (`plural`) or ordinal (`selectordinal`) rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralKind {
    /// Counts: `1 item`, `2 items`
    Cardinal,
    /// Positions: `1st`, `2nd`
    Ordinal,
}

impl PluralKind {
    fn rule_type(self) -> PluralRuleType {
        match self {
            Self::Cardinal => PluralRuleType::CARDINAL,
            Self::Ordinal => PluralRuleType::ORDINAL,
        }
    }
}

/// Helper for plural rules across languages
#[derive(Debug)]
pub struct PluralizationHelper;

impl PluralizationHelper {
    /// The plural rules for a locale, built on first use
    pub fn rules_for(locale: &Locale, kind: PluralKind) -> Arc<PluralRules> {
        let cache_key = (locale.clone(), kind);
        if let Some(rules) = RULES.read().get(&cache_key) {
            return Arc::clone(rules);
        }

        let rules = Arc::new(Self::build_rules(locale, kind));
        Arc::clone(RULES.write().entry(cache_key).or_insert(rules))
    }

    fn build_rules(locale: &Locale, kind: PluralKind) -> PluralRules {
        let candidates = [
            locale.to_language_identifier().ok(),
            locale.language().parse::<LanguageIdentifier>().ok(),
        ];
        for langid in candidates.into_iter().flatten() {
            if let Ok(rules) = PluralRules::create(langid, kind.rule_type()) {
                return rules;
            }
        }

        debug!("No {:?} plural rules for locale {}, using English rules", kind, locale);
        let english: LanguageIdentifier =
            "en".parse().expect("\"en\" is a valid language identifier");
        PluralRules::create(english, kind.rule_type())
            .expect("English plural rules are always available")
    }

    /// Get the CLDR category name (`one`, `few`, …) for a number in the given locale
    pub fn get_plural_form(locale: &Locale, value: f64, kind: PluralKind) -> &'static str {
        let rules = Self::rules_for(locale, kind);
        Self::select(&rules, value)
    }

    /// Select with prebuilt rules; numbers the rules cannot interpret are `other`
    pub fn select(rules: &PluralRules, value: f64) -> &'static str {
        if !value.is_finite() {
            return "other";
        }
        rules
            .select(value.abs())
            .map(category_name)
            .unwrap_or("other")
    }

    /// Categories a locale distinguishes, in CLDR order
    pub fn get_plural_categories(locale: &Locale, kind: PluralKind) -> Vec<&'static str> {
        let rules = Self::rules_for(locale, kind);
        let mut seen = Vec::new();
        let samples = (0..=200).map(f64::from).chain([0.5, 1.5, 1000.0, 1_000_000.0]);
        for sample in samples {
            let category = Self::select(&rules, sample);
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        let order = ["zero", "one", "two", "few", "many", "other"];
        order.into_iter().filter(|c| seen.contains(c)).collect()
    }
}

fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::ZERO => "zero",
        PluralCategory::ONE => "one",
        PluralCategory::TWO => "two",
        PluralCategory::FEW => "few",
        PluralCategory::MANY => "many",
        PluralCategory::OTHER => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_cardinal() {
        let en = Locale::new("en");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 1.0, PluralKind::Cardinal), "one");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 0.0, PluralKind::Cardinal), "other");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 2.0, PluralKind::Cardinal), "other");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 1.5, PluralKind::Cardinal), "other");
    }

    #[test]
    fn test_polish_cardinal() {
        let pl = Locale::new("pl");
        assert_eq!(PluralizationHelper::get_plural_form(&pl, 1.0, PluralKind::Cardinal), "one");
        assert_eq!(PluralizationHelper::get_plural_form(&pl, 2.0, PluralKind::Cardinal), "few");
        assert_eq!(PluralizationHelper::get_plural_form(&pl, 5.0, PluralKind::Cardinal), "many");
        assert_eq!(PluralizationHelper::get_plural_form(&pl, 22.0, PluralKind::Cardinal), "few");
    }

    #[test]
    fn test_english_ordinal() {
        let en = Locale::new("en");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 1.0, PluralKind::Ordinal), "one");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 2.0, PluralKind::Ordinal), "two");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 3.0, PluralKind::Ordinal), "few");
        assert_eq!(PluralizationHelper::get_plural_form(&en, 11.0, PluralKind::Ordinal), "other");
    }

    #[test]
    fn test_region_and_unknown_locales() {
        let ru = Locale::new("ru-RU");
        assert_eq!(PluralizationHelper::get_plural_form(&ru, 3.0, PluralKind::Cardinal), "few");

        let unknown = Locale::new("pirate speak");
        assert_eq!(
            PluralizationHelper::get_plural_form(&unknown, 1.0, PluralKind::Cardinal),
            "one"
        );
    }

    #[test]
    fn test_rules_are_cached_per_locale_and_kind() {
        let uk = Locale::new("uk");
        let first = PluralizationHelper::rules_for(&uk, PluralKind::Cardinal);
        let second = PluralizationHelper::rules_for(&uk, PluralKind::Cardinal);
        assert!(Arc::ptr_eq(&first, &second));

        let ordinal = PluralizationHelper::rules_for(&uk, PluralKind::Ordinal);
        assert!(!Arc::ptr_eq(&first, &ordinal));
        assert_eq!(PluralizationHelper::select(&first, 3.0), "few");
    }

    #[test]
    fn test_negative_numbers_use_absolute_value() {
        let en = Locale::new("en");
        assert_eq!(PluralizationHelper::get_plural_form(&en, -1.0, PluralKind::Cardinal), "one");
    }

    #[test]
    fn test_plural_categories() {
        assert_eq!(
            PluralizationHelper::get_plural_categories(&Locale::new("en"), PluralKind::Cardinal),
            vec!["one", "other"]
        );
        assert_eq!(
            PluralizationHelper::get_plural_categories(&Locale::new("ja"), PluralKind::Cardinal),
            vec!["other"]
        );
    }
}
