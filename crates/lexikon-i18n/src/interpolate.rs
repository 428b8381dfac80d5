//! Tag and variable interpolation on formatted strings
//!
//! Runs after ICU evaluation. The tag pass splices handler output for
//! `<name>content</name>` spans; if it handled nothing, the variable pass
//! substitutes plain `{key}` placeholders instead.

use crate::value::{Part, Scalar, TagHandler, Value, Values};
use crate::Locale;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// `<name>content</name>`; open and close names are compared after matching
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(\w+)>([^<]*)</(\w+)>").expect("tag pattern is valid")
});

/// Content that is exactly one placeholder
static SINGLE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{(\w+)\}$").expect("placeholder pattern is valid"));

/// Handlers registered for every translation of an instance
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    handlers: HashMap<String, TagHandler>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the handler for `name`
    pub fn register(&mut self, name: impl Into<String>, handler: TagHandler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&TagHandler> {
        self.handlers.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<TagHandler> {
        self.handlers.remove(name)
    }

    /// Registered tag names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Result of a translation: plain text, or a sequence once a tag was handled
#[derive(Debug, Clone)]
pub enum Rendered {
    /// No tag was handled
    Text(String),
    /// Text and handler output in template order
    Parts(Vec<Part>),
}

impl Rendered {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The parts of this rendering; plain text is a single part
    pub fn into_parts(self) -> Vec<Part> {
        match self {
            Self::Text(text) => vec![Part::Text(text)],
            Self::Parts(parts) => parts,
        }
    }

    /// Flatten to a string, rendering nodes through `Display`
    pub fn to_plain_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Parts(parts) => parts.iter().try_for_each(|part| write!(f, "{part}")),
        }
    }
}

impl PartialEq<&str> for Rendered {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::Text(text) => text == other,
            Self::Parts(_) => self.to_string() == *other,
        }
    }
}

/// Run the tag pass, then the variable pass if no tag was handled
pub fn interpolate(
    text: &str,
    values: &Values,
    registry: &TagRegistry,
    locale: &Locale,
) -> Rendered {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending = String::new();
    let mut last = 0;
    let mut handled = false;

    for caps in TAG_PATTERN.captures_iter(text) {
        let (Some(whole), Some(open), Some(content), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        if open.as_str() != close.as_str() {
            continue;
        }

        let name = open.as_str();
        let global = registry.get(name);
        let inline = values.tag(name);
        if global.is_none() && inline.is_none() {
            continue;
        }

        pending.push_str(&text[last..whole.start()]);
        if !pending.is_empty() {
            parts.push(Part::Text(std::mem::take(&mut pending)));
        }

        let mut rendered = Part::Text(tag_content(content.as_str(), values));
        if let Some(handler) = global {
            rendered = handler.call(rendered, locale);
        }
        if let Some(handler) = inline {
            rendered = handler.call(rendered, locale);
        }
        parts.push(rendered);

        handled = true;
        last = whole.end();
    }

    if !handled {
        return Rendered::Text(substitute_variables(text, values));
    }

    if last < text.len() {
        parts.push(Part::Text(text[last..].to_string()));
    }
    Rendered::Parts(parts)
}

/// Content of a tag span, with a lone `{var}` resolved from the scalars
fn tag_content(content: &str, values: &Values) -> String {
    SINGLE_PLACEHOLDER
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|name| values.scalar(name.as_str()))
        .map(Scalar::to_string)
        .unwrap_or_else(|| content.to_string())
}

/// Replace every `{key}` for string and number values; everything else stays literal
///
/// Keys are substituted in sorted order, one pass per key.
pub fn substitute_variables(text: &str, values: &Values) -> String {
    let mut result = text.to_string();
    let substitutable = values.iter().filter_map(|(key, value)| match value {
        Value::Scalar(scalar) if scalar.is_text_or_number() => Some((key, scalar)),
        _ => None,
    });
    for (key, value) in substitutable {
        let placeholder = format!("{{{key}}}");
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, &value.to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct Link {
        label: String,
    }

    impl fmt::Display for Link {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "[{}]", self.label)
        }
    }

    fn en() -> Locale {
        Locale::new("en")
    }

    fn render(text: &str, values: &Values) -> Rendered {
        interpolate(text, values, &TagRegistry::new(), &en())
    }

    #[test]
    fn test_plain_brace_passthrough() {
        let values = values!["variable" => "count"];
        let rendered = render("Use {variable} for substitution", &values);
        assert_eq!(rendered, "Use count for substitution");
        assert!(rendered.is_text());
    }

    #[test]
    fn test_all_occurrences_are_replaced() {
        let values = values!["name" => "Ada", "n" => 2.5];
        assert_eq!(
            substitute_variables("{name}, {name}! n={n} {missing}", &values),
            "Ada, Ada! n=2.5 {missing}"
        );
    }

    #[test]
    fn test_chained_values_substitute_in_key_order() {
        let values = values!["a" => "{b}", "b" => "x", "c" => "{a}", "d" => "{c}"];
        let first = substitute_variables("{d}", &values);
        // `d` is replaced last, so the placeholder it introduces stays literal
        assert_eq!(first, "{c}");
        for _ in 0..50 {
            assert_eq!(substitute_variables("{d}", &values), first);
        }
        assert_eq!(substitute_variables("{c}", &values), "{a}");
        assert_eq!(substitute_variables("{a}", &values), "x");
    }

    #[test]
    fn test_booleans_and_handlers_are_not_substituted() {
        let values = Values::new()
            .with("flag", true)
            .with_tag("b", |content, _| content);
        assert_eq!(substitute_variables("{flag} {b}", &values), "{flag} {b}");
    }

    #[test]
    fn test_inline_tag_handler_produces_parts() {
        let values = Values::new().with_tag("link", |content, _| {
            Part::node(Link {
                label: content.to_string(),
            })
        });
        let rendered = render("Read the <link>docs</link> first", &values);

        let Rendered::Parts(parts) = &rendered else {
            panic!("expected parts, got {rendered:?}");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].as_text(), Some("Read the "));
        assert_eq!(parts[1].downcast_ref::<Link>().map(|l| l.label.as_str()), Some("docs"));
        assert_eq!(parts[2].as_text(), Some(" first"));
        assert_eq!(rendered.to_plain_string(), "Read the [docs] first");
    }

    #[test]
    fn test_global_handler_runs_before_inline() {
        let mut registry = TagRegistry::new();
        registry.register(
            "b",
            TagHandler::new(|content, _| Part::Text(format!("*{content}*"))),
        );
        let values =
            Values::new().with_tag("b", |content, _| Part::Text(format!("[{content}]")));

        let rendered = interpolate("<b>hi</b>", &values, &registry, &en());
        assert_eq!(rendered.to_plain_string(), "[*hi*]");
    }

    #[test]
    fn test_handler_receives_locale() {
        let mut registry = TagRegistry::new();
        registry.register(
            "lang",
            TagHandler::new(|content, locale| Part::Text(format!("{content}@{locale}"))),
        );
        let rendered =
            interpolate("<lang>x</lang>", &Values::new(), &registry, &Locale::new("de"));
        assert_eq!(rendered.to_plain_string(), "x@de");
    }

    #[test]
    fn test_single_placeholder_content_is_resolved() {
        let values = Values::new()
            .with("user", "Ada")
            .with_tag("b", |content, _| {
                Part::Text(content.to_string().to_uppercase())
            });
        let rendered = render("Hi <b>{user}</b>, {user}", &values);
        // Variables outside tags are only substituted when no tag was handled
        assert_eq!(rendered.to_plain_string(), "Hi ADA, {user}");
    }

    #[test]
    fn test_unhandled_and_mismatched_tags_stay_verbatim() {
        let values = values!["name" => "Ada"];
        let rendered = render("<i>{name}</i> and <b>x</i>", &values);
        assert_eq!(rendered, "<i>Ada</i> and <b>x</i>");
    }

    #[test]
    fn test_registry_names() {
        let mut registry = TagRegistry::new();
        registry.register("strong", TagHandler::new(|c, _| c));
        registry.register("em", TagHandler::new(|c, _| c));
        assert_eq!(registry.names(), vec!["em", "strong"]);
        assert!(registry.remove("em").is_some());
        assert!(registry.get("em").is_none());
    }

    proptest! {
        #[test]
        fn prop_interpolate_never_panics(text in "[<>/{}a-z ]{0,64}") {
            let values = Values::new()
                .with("a", "x")
                .with_tag("b", |content, _| Part::Text(format!("({content})")));
            let _ = interpolate(&text, &values, &TagRegistry::new(), &en()).to_plain_string();
        }

        #[test]
        fn prop_text_without_tags_or_braces_is_unchanged(text in "[a-z ,.!]{0,64}") {
            let rendered = interpolate(&text, &values!["a" => 1], &TagRegistry::new(), &en());
            prop_assert_eq!(rendered.to_plain_string(), text);
        }
    }
}
