//! Request payload bounds. The HTTP boundary validates here; everything past
//! it trusts its arguments.

use crate::errors::AppError;

/// Returns the trimmed value if its character count falls in `min..=max`,
/// otherwise a validation error naming the field.
pub fn require_length(field: &str, value: &str, min: usize, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Lower-cases and bounds an email address. Format checking is intentionally
/// light: exactly one `@`, a non-empty local part, a dotted domain.
pub fn normalize_email(value: &str) -> Result<String, AppError> {
    let email = value.trim().to_lowercase();

    let shape_ok = email.len() <= 254
        && email.matches('@').count() == 1
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };

    if !shape_ok {
        return Err(AppError::Validation(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(email)
}

/// Password bounds. Not trimmed — leading or trailing whitespace is part of
/// the password.
pub fn require_password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if !(8..=128).contains(&len) {
        return Err(AppError::Validation(
            "password must be between 8 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_length_trims_before_counting() {
        let value = require_length("jobTitle", "  Backend Engineer  ", 2, 150).unwrap();
        assert_eq!(value, "Backend Engineer");
    }

    #[test]
    fn test_require_length_rejects_too_short() {
        assert!(require_length("jobTitle", " x ", 2, 150).is_err());
    }

    #[test]
    fn test_require_length_rejects_too_long() {
        let long = "x".repeat(151);
        let err = require_length("jobTitle", &long, 2, 150).unwrap_err();
        assert!(err.to_string().contains("jobTitle"));
    }

    #[test]
    fn test_require_length_counts_chars_not_bytes() {
        // Two chars, six bytes — must pass a min of 2.
        assert!(require_length("name", "éé", 2, 100).is_ok());
    }

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_missing_at() {
        assert!(normalize_email("ada.example.com").is_err());
    }

    #[test]
    fn test_normalize_email_rejects_double_at() {
        assert!(normalize_email("ada@b@example.com").is_err());
    }

    #[test]
    fn test_normalize_email_rejects_undotted_domain() {
        assert!(normalize_email("ada@localhost").is_err());
    }

    #[test]
    fn test_require_password_bounds() {
        assert!(require_password("short").is_err());
        assert!(require_password("long enough").is_ok());
        assert!(require_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_require_password_keeps_whitespace() {
        // "      pw" is 8 chars including the spaces — valid as-is.
        assert!(require_password("      pw").is_ok());
    }
}
