use core::fmt;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised by write-time field validation, before anything is
/// handed to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A color field is not a comma-separated list of integers
    NotAnIntegerList { field: &'static str, value: String },
    /// A field declared non-negative was given a negative value
    Negative { field: &'static str, value: i64 },
    /// A day list with more than seven entries
    TooManyDays(usize),
    /// A day list entry that is empty
    EmptyDay,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnIntegerList { field, value } => {
                write!(f, "{} must be a comma-separated integer list, got {:?}", field, value)
            }
            ValidationError::Negative { field, value } => {
                write!(f, "{} must be non-negative, got {}", field, value)
            }
            ValidationError::TooManyDays(n) => {
                write!(f, "day list holds at most 7 entries, got {}", n)
            }
            ValidationError::EmptyDay => write!(f, "day list entries cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Validate a comma-separated integer list (the RGB color format,
/// e.g. "0,255,255"). Mirrors what the stored column CHECK cannot
/// express: every comma-separated token must parse as an integer.
pub fn validate_color_list(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty() && value.split(',').all(|part| part.trim().parse::<i64>().is_ok());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::NotAnIntegerList {
            field,
            value: value.to_string(),
        })
    }
}

/// Reject negative values for fields declared non-negative.
pub fn ensure_non_negative<T: Into<i64> + Copy>(field: &'static str, value: T) -> Result<(), ValidationError> {
    let v = value.into();
    if v < 0 {
        Err(ValidationError::Negative { field, value: v })
    } else {
        Ok(())
    }
}

/// Day lists are capped at seven entries and entries must be non-empty.
/// Entries are stored as given; `TimeSlot::applies` lowercases only its
/// input, so callers should store lowercase day names.
pub fn validate_days(days: &[String]) -> Result<(), ValidationError> {
    if days.len() > 7 {
        return Err(ValidationError::TooManyDays(days.len()));
    }
    if days.iter().any(|d| d.trim().is_empty()) {
        return Err(ValidationError::EmptyDay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_list_accepts_rgb_triples() {
        assert!(validate_color_list("fillcolorrgb", "0,255,255").is_ok());
        assert!(validate_color_list("fillcolorrgb", "12, 34, 56").is_ok());
        // the stored validator accepts any length of integer list
        assert!(validate_color_list("fillcolorrgb", "1").is_ok());
    }

    #[test]
    fn color_list_rejects_non_integers() {
        let err = validate_color_list("strokecolorrgb", "0,teal,255").unwrap_err();
        assert!(matches!(err, ValidationError::NotAnIntegerList { field: "strokecolorrgb", .. }));
        assert!(validate_color_list("strokecolorrgb", "").is_err());
        assert!(validate_color_list("strokecolorrgb", "0,,255").is_err());
    }

    #[test]
    fn non_negative_bounds() {
        assert!(ensure_non_negative("zipcode", 0i64).is_ok());
        assert!(ensure_non_negative("zipcode", 55401i64).is_ok());
        let err = ensure_non_negative("priority", -1i16).unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "priority", value: -1 });
    }

    #[test]
    fn day_list_limits() {
        let ok: Vec<String> = ["monday", "tuesday"].iter().map(|s| s.to_string()).collect();
        assert!(validate_days(&ok).is_ok());

        let too_many: Vec<String> = (0..8).map(|i| format!("day{}", i)).collect();
        assert_eq!(validate_days(&too_many), Err(ValidationError::TooManyDays(8)));

        let empty = vec!["monday".to_string(), "  ".to_string()];
        assert_eq!(validate_days(&empty), Err(ValidationError::EmptyDay));
    }
}
