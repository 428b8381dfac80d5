//! Validation macro producing `LexikonError::Validation`

/// Return a `LexikonError::Validation` unless `$cond` holds
///
/// An optional `field = ...` names the offending setting.
///
/// # Examples
///
/// ```rust
/// use lexikon_common::ensure;
/// use lexikon_common::Result;
///
/// fn check_locale(locale: &str) -> Result<()> {
///     ensure!(!locale.is_empty(), field = "locale", "locale must not be empty");
///     Ok(())
/// }
///
/// assert!(check_locale("").is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, field = $field:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::LexikonError::validation_field(format!($($arg)+), $field));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::LexikonError::validation(format!($($arg)+)));
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{LexikonError, Result};

    fn positive(value: i32) -> Result<i32> {
        ensure!(value > 0, "value must be positive, got {}", value);
        Ok(value)
    }

    fn named(value: &str) -> Result<()> {
        ensure!(!value.is_empty(), field = "name", "name must not be empty");
        Ok(())
    }

    #[test]
    fn test_ensure_without_field() {
        assert_eq!(positive(3).unwrap(), 3);
        let err = positive(-1).unwrap_err();
        assert!(matches!(err, LexikonError::Validation { field: None, .. }));
        assert!(err.to_string().contains("got -1"));
    }

    #[test]
    fn test_ensure_with_field() {
        assert!(named("x").is_ok());
        match named("").unwrap_err() {
            LexikonError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("name"));
                assert_eq!(message, "name must not be empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
