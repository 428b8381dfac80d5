//! Read-only helpers for cross-locale validators

use crate::store::MessageStore;
use crate::Locale;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("variable pattern is valid"));

/// Names of the `{word}` placeholders in a template
pub fn extract_variables(template: &str) -> BTreeSet<String> {
    VARIABLE_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Variables that differ between two translations of the same key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMismatch {
    pub namespace: String,
    pub key: String,
    /// Present in the base translation only
    pub missing: BTreeSet<String>,
    /// Present in the target translation only
    pub extra: BTreeSet<String>,
}

/// Structural differences of `target` relative to `base`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleDiff {
    /// `namespace -> keys` present in base but not in target
    pub missing_keys: BTreeMap<String, BTreeSet<String>>,
    /// `namespace -> keys` present in target but not in base
    pub extra_keys: BTreeMap<String, BTreeSet<String>>,
    pub variable_mismatches: Vec<VariableMismatch>,
}

impl LocaleDiff {
    pub fn is_clean(&self) -> bool {
        self.missing_keys.is_empty()
            && self.extra_keys.is_empty()
            && self.variable_mismatches.is_empty()
    }
}

/// Compare the key sets and per-key variables of two locales
pub fn diff_locales(store: &MessageStore, base: &Locale, target: &Locale) -> LocaleDiff {
    let mut diff = LocaleDiff::default();

    let namespaces: BTreeSet<&str> = store
        .namespaces(base)
        .into_iter()
        .chain(store.namespaces(target))
        .collect();

    for namespace in namespaces {
        let base_keys: BTreeSet<&str> = store.keys(base, namespace).into_iter().collect();
        let target_keys: BTreeSet<&str> = store.keys(target, namespace).into_iter().collect();

        let missing: BTreeSet<String> = base_keys
            .difference(&target_keys)
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            diff.missing_keys.insert(namespace.to_string(), missing);
        }

        let extra: BTreeSet<String> = target_keys
            .difference(&base_keys)
            .map(|k| k.to_string())
            .collect();
        if !extra.is_empty() {
            diff.extra_keys.insert(namespace.to_string(), extra);
        }

        for key in base_keys.intersection(&target_keys) {
            let (Some(base_text), Some(target_text)) = (
                store.message(base, namespace, key),
                store.message(target, namespace, key),
            ) else {
                continue;
            };
            let base_vars = extract_variables(base_text);
            let target_vars = extract_variables(target_text);
            if base_vars != target_vars {
                diff.variable_mismatches.push(VariableMismatch {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                    missing: base_vars.difference(&target_vars).cloned().collect(),
                    extra: target_vars.difference(&base_vars).cloned().collect(),
                });
            }
        }
    }

    diff
}
