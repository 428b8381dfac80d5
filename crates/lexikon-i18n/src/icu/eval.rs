//! Evaluation of parsed ICU messages

use super::format::{format_date, format_number, format_time, DateStyle, NumberStyle};
use super::parser::{Arm, Element, PluralElement, Selector};
use super::FormatError;
use crate::pluralization::PluralizationHelper;
use crate::value::Scalar;
use crate::Locale;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Scalar arguments visible to the evaluator
pub type Arguments<'v> = HashMap<&'v str, &'v Scalar>;

/// Render a parsed message
pub fn evaluate(
    message: &[Element],
    locale: &Locale,
    args: &Arguments<'_>,
) -> Result<String, FormatError> {
    let evaluator = Evaluator { locale, args };
    let mut out = String::new();
    evaluator.write_message(message, None, &mut out)?;
    Ok(out)
}

struct Evaluator<'e, 'v> {
    locale: &'e Locale,
    args: &'e Arguments<'v>,
}

impl Evaluator<'_, '_> {
    fn arg(&self, name: &str) -> Result<&Scalar, FormatError> {
        self.args
            .get(name)
            .copied()
            .ok_or_else(|| FormatError::MissingValue(name.to_string()))
    }

    fn number_arg(&self, name: &str) -> Result<f64, FormatError> {
        let value = self.arg(name)?;
        value.as_number().ok_or_else(|| FormatError::NotANumber {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn date_arg(&self, name: &str) -> Result<DateTime<Utc>, FormatError> {
        let value = self.arg(name)?;
        let parsed = match value {
            Scalar::Date(d) => Some(*d),
            Scalar::Int(ms) => DateTime::from_timestamp_millis(*ms),
            Scalar::Float(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
            Scalar::Str(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            _ => None,
        };
        parsed.ok_or_else(|| FormatError::NotADate {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// `pound` is the offset-adjusted number of the nearest enclosing plural
    fn write_message(
        &self,
        message: &[Element],
        pound: Option<f64>,
        out: &mut String,
    ) -> Result<(), FormatError> {
        for element in message {
            match element {
                Element::Literal(text) => out.push_str(text),
                Element::Argument(name) => out.push_str(&self.arg(name)?.to_string()),
                Element::Number { name, style } => {
                    let value = self.number_arg(name)?;
                    let style = NumberStyle::from_style(style.as_deref());
                    out.push_str(&format_number(self.locale, value, style));
                }
                Element::Date { name, style } => {
                    let value = self.date_arg(name)?;
                    let style = DateStyle::from_style(style.as_deref());
                    out.push_str(&format_date(self.locale, &value, style));
                }
                Element::Time { name, style } => {
                    let value = self.date_arg(name)?;
                    let style = DateStyle::from_style(style.as_deref());
                    out.push_str(&format_time(self.locale, &value, style));
                }
                Element::Plural(plural) => self.write_plural(plural, out)?,
                Element::Select { name, arms } => {
                    let key = self.arg(name)?.to_string();
                    let arm = find_keyword(arms, &key)
                        .or_else(|| find_keyword(arms, "other"))
                        .ok_or_else(|| FormatError::NoMatchingArm(name.clone()))?;
                    self.write_message(&arm.message, pound, out)?;
                }
                Element::Pound => match pound {
                    Some(n) => out.push_str(&format_number(self.locale, n, NumberStyle::Decimal)),
                    None => out.push('#'),
                },
            }
        }
        Ok(())
    }

    fn write_plural(&self, plural: &PluralElement, out: &mut String) -> Result<(), FormatError> {
        let value = self.number_arg(&plural.name)?;
        let adjusted = value - plural.offset;

        // Exact arms see the raw value; categories and `#` see the offset one
        let exact = plural
            .arms
            .iter()
            .find(|arm| matches!(arm.selector, Selector::Exact(n) if n == value));

        let arm = match exact {
            Some(arm) => Some(arm),
            None => {
                let rules = PluralizationHelper::rules_for(self.locale, plural.kind);
                let category = PluralizationHelper::select(&rules, adjusted);
                find_keyword(&plural.arms, category)
            }
        }
        .or_else(|| find_keyword(&plural.arms, "other"))
        .ok_or_else(|| FormatError::NoMatchingArm(plural.name.clone()))?;

        self.write_message(&arm.message, Some(adjusted), out)
    }
}

fn find_keyword<'a>(arms: &'a [Arm], keyword: &str) -> Option<&'a Arm> {
    arms.iter()
        .find(|arm| matches!(&arm.selector, Selector::Keyword(k) if k == keyword))
}
