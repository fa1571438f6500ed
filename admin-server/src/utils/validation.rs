//! Input validation helpers
//!
//! Text length limits, `validator` error conversion, and JSON body parsing
//! that reports malformed input as a 400 with details.

use serde::de::DeserializeOwned;
use shared::error::AppError;
use validator::{Validate, ValidateEmail, ValidationErrors, ValidationErrorsKind};

// ── Text length limits ──────────────────────────────────────────────

/// Staff and customer names
pub const MAX_NAME_LEN: usize = 200;

/// Order notes, item notes, cancellation reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Helpers ─────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")).with_detail("field", field));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && email.validate_email()
}

/// Run `validator` rules, reporting the first message and every field error
pub fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(validation_error)
}

pub fn validation_error(errors: ValidationErrors) -> AppError {
    let message = first_message(&errors).unwrap_or_else(|| "Validation failed".to_string());
    let details = serde_json::to_value(&errors).unwrap_or_default();
    AppError::validation(message).with_detail("fields", details)
}

fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(errs) => errs.first().map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"))
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

/// Parse a JSON request body
///
/// Handlers take the raw body and parse it only after the caller's access
/// to the target resource has been checked.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        AppError::validation("Invalid request body")
            .with_detail("reason", e.to_string())
            .with_detail("line", e.line())
            .with_detail("column", e.column())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use shared::ErrorCode;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 10, message = "Valid phone number required"))]
        phone: String,
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Out of stock", "reason", MAX_NOTE_LEN).is_ok());
        let err = validate_required_text("   ", "reason", MAX_NOTE_LEN).unwrap_err();
        assert_eq!(err.message, "reason is required");
        assert!(validate_required_text(&"x".repeat(501), "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(None, "notes", MAX_NOTE_LEN).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("chef@bistro.example"));
        assert!(!is_valid_email("chef@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn test_validator_errors_become_app_error() {
        let input = Signup {
            phone: "123".into(),
            email: "x@example.com".into(),
        };
        let err = validate(&input).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Valid phone number required");
        assert!(err.details.unwrap()["fields"].get("phone").is_some());
    }

    #[test]
    fn test_parse_json_reports_malformed_body() {
        let err = parse_json::<Signup>(b"{\"phone\": ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid request body");
        assert!(err.details.unwrap().contains_key("reason"));

        let ok: Signup = parse_json(br#"{"phone":"5551234567","email":"a@b.co"}"#).unwrap();
        assert_eq!(ok.phone, "5551234567");
    }
}
