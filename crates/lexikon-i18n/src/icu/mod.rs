//! ICU MessageFormat detection and evaluation
//!
//! [`format_icu`] never fails: parse and evaluation errors are logged and the
//! template is returned unchanged.

pub mod eval;
pub mod format;
pub mod parser;

pub use eval::{evaluate, Arguments};
pub use parser::{parse, Arm, Element, Message, PluralElement, Selector};

use crate::value::Values;
use crate::Locale;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

static ICU_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\s*[A-Za-z_][\w-]*\s*,\s*(plural|select|selectordinal|number|date|time)\b")
        .expect("ICU detection pattern is valid")
});

/// Diagnostics from parsing or evaluating a template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("no value provided for argument '{0}'")]
    MissingValue(String),

    #[error("argument '{name}' is not a number: {value}")]
    NotANumber { name: String, value: String },

    #[error("argument '{name}' is not a date: {value}")]
    NotADate { name: String, value: String },

    #[error("no arm matched for argument '{0}'")]
    NoMatchingArm(String),
}

/// Whether the template contains an ICU argument with a format type
pub fn is_icu(template: &str) -> bool {
    ICU_PATTERN.is_match(template)
}

/// Parse and evaluate in one step
pub fn try_format(template: &str, locale: &Locale, values: &Values) -> Result<String, FormatError> {
    let message = parse(template)?;
    evaluate(&message, locale, &values.scalars())
}

/// Evaluate `template`, returning it verbatim if anything goes wrong
pub fn format_icu(template: &str, locale: &Locale, values: &Values) -> String {
    match try_format(template, locale, values) {
        Ok(formatted) => formatted,
        Err(error) => {
            warn!(
                template = %template,
                locale = %locale,
                values = ?values.scalars(),
                error = %error,
                "Failed to format ICU message, using raw template"
            );
            template.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use proptest::prelude::*;

    #[test]
    fn test_detection() {
        assert!(is_icu("{count, plural, one {#} other {#}}"));
        assert!(is_icu("Hi { user_name ,select, a {A} other {B}}"));
        assert!(is_icu("{total, number}"));
        assert!(is_icu("{when,date,short}"));
        assert!(!is_icu("Use {variable} for substitution"));
        assert!(!is_icu("{count, plurals}"));
        assert!(!is_icu("plain text"));
    }

    #[test]
    fn test_combined_plural_and_select() {
        let template = "{gender, select, female {She has {count, plural, one {# message} other {# messages}}} other {They have {count, plural, one {# message} other {# messages}}}} waiting.";
        let values = values!["gender" => "female", "count" => 3];
        assert_eq!(
            format_icu(template, &Locale::new("en"), &values),
            "She has 3 messages waiting."
        );
    }

    #[test]
    fn test_malformed_template_is_returned_verbatim() {
        let template = "{count, plural, one {# item} other {# items}";
        let formatted = format_icu(template, &Locale::new("en"), &values!["count" => 2]);
        assert_eq!(formatted, template);
    }

    #[test]
    fn test_missing_value_is_returned_verbatim() {
        let template = "{count, plural, one {# item} other {# items}}";
        assert_eq!(format_icu(template, &Locale::new("en"), &Values::new()), template);
    }

    #[test]
    fn test_tag_handlers_are_invisible_to_icu() {
        let values = Values::new().with_tag("count", |content, _| content);
        let err = try_format("{count, number}", &Locale::new("en"), &values).unwrap_err();
        assert_eq!(err, FormatError::MissingValue("count".into()));
    }

    proptest! {
        #[test]
        fn prop_format_never_panics(template in "[a-z{}#=,' 0-9]{0,48}", count in -5i64..200) {
            let formatted = format_icu(&template, &Locale::new("en"), &values!["count" => count]);
            if parse(&template).is_err() {
                prop_assert_eq!(formatted, template);
            }
        }

        #[test]
        fn prop_plural_output_contains_count(count in 0i64..10_000) {
            let template = "{count, plural, other {# files}}";
            let formatted = format_icu(template, &Locale::new("fr"), &values!["count" => count]);
            prop_assert!(formatted.ends_with(" files"));
        }
    }
}
