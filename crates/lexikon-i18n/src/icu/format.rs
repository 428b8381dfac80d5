//! Number and date rendering for `#`, `{n, number}`, `{d, date}` and `{d, time}`
//!
//! Separators follow the locale's language; date and time patterns are the
//! English CLDR ones for `en` and ISO-style numeric patterns elsewhere.

use crate::Locale;
use chrono::{DateTime, Utc};

/// Maximum fraction digits for the default number style
const MAX_FRACTION_DIGITS: usize = 3;

/// `{n, number, style}` presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Grouped, up to three fraction digits
    Decimal,
    /// Rounded to a whole number
    Integer,
    /// Multiplied by 100 with a `%` suffix
    Percent,
}

impl NumberStyle {
    /// Map an ICU style keyword; unknown styles and skeletons format as decimals
    pub fn from_style(style: Option<&str>) -> Self {
        match style.map(str::trim) {
            Some("integer") => Self::Integer,
            Some("percent") => Self::Percent,
            _ => Self::Decimal,
        }
    }
}

/// `{d, date, style}` and `{t, time, style}` presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// Numeric, e.g. `3/14/24`
    Short,
    /// Abbreviated month, e.g. `Mar 14, 2024`
    Medium,
    /// Full month name
    Long,
    /// Weekday and full month name
    Full,
}

impl DateStyle {
    pub fn from_style(style: Option<&str>) -> Self {
        match style.map(str::trim) {
            Some("short") => Self::Short,
            Some("long") => Self::Long,
            Some("full") => Self::Full,
            _ => Self::Medium,
        }
    }
}

/// Grouping and decimal separators for a locale
fn separators(locale: &Locale) -> (&'static str, char) {
    match locale.language() {
        "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" | "el" | "ro" | "hr" | "sl"
        | "sr" => (".", ','),
        "fr" => ("\u{202f}", ','),
        "ru" | "pl" | "cs" | "uk" | "sv" | "nb" | "no" | "fi" | "sk" | "hu" | "bg" | "lt"
        | "lv" | "et" => ("\u{a0}", ','),
        _ => (",", '.'),
    }
}

/// Format a number for display in the given locale
pub fn format_number(locale: &Locale, value: f64, style: NumberStyle) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let (value, fraction_digits, suffix) = match style {
        NumberStyle::Decimal => (value, MAX_FRACTION_DIGITS, ""),
        NumberStyle::Integer => (value, 0, ""),
        NumberStyle::Percent => (value * 100.0, 0, "%"),
    };

    let rendered = format!("{:.*}", fraction_digits, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rendered.as_str(), ""),
    };

    let (group, decimal) = separators(locale);
    let mut out = String::with_capacity(rendered.len() + 4);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, group));
    if !frac_part.is_empty() {
        out.push(decimal);
        out.push_str(frac_part);
    }
    out.push_str(suffix);
    out
}

fn group_digits(digits: &str, separator: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn is_english(locale: &Locale) -> bool {
    locale.language() == "en"
}

/// Format the date portion of a timestamp
pub fn format_date(locale: &Locale, value: &DateTime<Utc>, style: DateStyle) -> String {
    let pattern = if is_english(locale) {
        match style {
            DateStyle::Short => "%-m/%-d/%y",
            DateStyle::Medium => "%b %-d, %Y",
            DateStyle::Long => "%B %-d, %Y",
            DateStyle::Full => "%A, %B %-d, %Y",
        }
    } else {
        "%Y-%m-%d"
    };
    value.format(pattern).to_string()
}

/// Format the time portion of a timestamp
pub fn format_time(locale: &Locale, value: &DateTime<Utc>, style: DateStyle) -> String {
    let pattern = match (is_english(locale), style) {
        (true, DateStyle::Short) => "%-I:%M %p",
        (true, DateStyle::Medium) => "%-I:%M:%S %p",
        (true, _) => "%-I:%M:%S %p UTC",
        (false, DateStyle::Short) => "%H:%M",
        (false, DateStyle::Medium) => "%H:%M:%S",
        (false, _) => "%H:%M:%S UTC",
    };
    value.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decimal_formatting() {
        let en = Locale::new("en");
        assert_eq!(format_number(&en, 5.0, NumberStyle::Decimal), "5");
        assert_eq!(format_number(&en, 100.0, NumberStyle::Decimal), "100");
        assert_eq!(format_number(&en, 1234.5, NumberStyle::Decimal), "1,234.5");
        assert_eq!(format_number(&en, 1234567.0, NumberStyle::Decimal), "1,234,567");
        assert_eq!(format_number(&en, 0.12345, NumberStyle::Decimal), "0.123");
        assert_eq!(format_number(&en, -42.0, NumberStyle::Decimal), "-42");
        assert_eq!(format_number(&en, -0.0001, NumberStyle::Decimal), "0");
    }

    #[test]
    fn test_locale_separators() {
        assert_eq!(format_number(&Locale::new("de"), 1234.5, NumberStyle::Decimal), "1.234,5");
        assert_eq!(
            format_number(&Locale::new("ru"), 1234.5, NumberStyle::Decimal),
            "1\u{a0}234,5"
        );
    }

    #[test]
    fn test_integer_and_percent_styles() {
        let en = Locale::new("en");
        assert_eq!(format_number(&en, 2.6, NumberStyle::Integer), "3");
        assert_eq!(format_number(&en, 0.256, NumberStyle::Percent), "26%");
        assert_eq!(NumberStyle::from_style(Some(" percent ")), NumberStyle::Percent);
        assert_eq!(NumberStyle::from_style(Some("::currency/EUR")), NumberStyle::Decimal);
    }

    #[test]
    fn test_non_finite_numbers() {
        let en = Locale::new("en");
        assert_eq!(format_number(&en, f64::NAN, NumberStyle::Decimal), "NaN");
        assert_eq!(format_number(&en, f64::NEG_INFINITY, NumberStyle::Decimal), "-∞");
    }

    #[test]
    fn test_dates_and_times() {
        let en = Locale::new("en-US");
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 15, 45, 30).unwrap();

        assert_eq!(format_date(&en, &when, DateStyle::Short), "1/15/24");
        assert_eq!(format_date(&en, &when, DateStyle::Medium), "Jan 15, 2024");
        assert_eq!(format_date(&en, &when, DateStyle::Full), "Monday, January 15, 2024");
        assert_eq!(format_time(&en, &when, DateStyle::Short), "3:45 PM");

        let de = Locale::new("de");
        assert_eq!(format_date(&de, &when, DateStyle::Long), "2024-01-15");
        assert_eq!(format_time(&de, &when, DateStyle::Medium), "15:45:30");
    }
}
