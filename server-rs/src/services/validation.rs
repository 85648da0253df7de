//! Checks untrusted create payloads and turns them into a
//! [`CreateOrganizationRequest`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::CreateOrganizationRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Collects every problem with `input` instead of stopping at the first.
pub fn validate_create(input: &Value) -> ValidationResult {
    // Arrays pass the shape check but carry no fields, so they fail on `name`.
    let empty = Map::new();
    let fields = match input {
        Value::Object(fields) => fields,
        Value::Array(_) => &empty,
        _ => {
            return ValidationResult {
                errors: vec!["Invalid request body".to_string()],
            }
        }
    };

    let mut errors = Vec::new();

    let name_ok = fields
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !name_ok {
        errors.push("Name is required and must be a non-empty string".to_string());
    }

    // A present key counts even when it holds null.
    if let Some(email) = fields.get("email") {
        match email.as_str() {
            None => errors.push("Email must be a string".to_string()),
            Some(email) => {
                let email = email.trim();
                if !email.is_empty() && !is_valid_email(email) {
                    errors.push("Email must have a valid format".to_string());
                }
            }
        }
    }

    if fields.get("license").is_some_and(|v| !v.is_string()) {
        errors.push("License must be a string".to_string());
    }

    if fields.get("active").is_some_and(|v| !v.is_boolean()) {
        errors.push("Active must be a boolean".to_string());
    }

    ValidationResult { errors }
}

/// Only meaningful after [`validate_create`] passed; nothing is re-checked.
pub fn sanitize_create(input: &Value) -> CreateOrganizationRequest {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);

    CreateOrganizationRequest {
        name: trimmed(fields, "name").unwrap_or_default(),
        email: trimmed(fields, "email"),
        license: trimmed(fields, "license"),
        active: fields.get("active").and_then(Value::as_bool).unwrap_or(true),
    }
}

// Blank after trimming is treated as absent.
fn trimmed(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `local@domain.tld`: no whitespace or `@` in any part, and a dot somewhere
/// after the `@` with text on both sides.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX is a valid regex literal")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_bodies_are_rejected() {
        for input in [json!(null), json!("Acme"), json!(42), json!(true)] {
            let result = validate_create(&input);
            assert!(!result.is_valid());
            assert_eq!(result.errors, vec!["Invalid request body"]);
        }
    }

    #[test]
    fn array_bodies_fail_on_missing_name() {
        let result = validate_create(&json!([{"name": "Acme"}]));
        assert_eq!(
            result.errors,
            vec!["Name is required and must be a non-empty string"]
        );
    }

    #[test]
    fn missing_or_blank_name_is_reported() {
        for input in [
            json!({}),
            json!({"name": ""}),
            json!({"name": "   "}),
            json!({"name": 7}),
            json!({"name": null}),
        ] {
            let result = validate_create(&input);
            assert!(!result.is_valid(), "{input} should fail");
            assert!(result.errors[0].contains("Name"));
        }
    }

    #[test]
    fn well_formed_emails_pass() {
        for email in ["info@acme.com", "a.b+c@mail.example.org", "  x@y.io  ", ""] {
            let result = validate_create(&json!({"name": "Acme", "email": email}));
            assert!(result.is_valid(), "{email:?} should pass");
        }
    }

    #[test]
    fn malformed_emails_fail() {
        for email in [
            "plainaddress",
            "@acme.com",
            "info@",
            "info@acme",
            "info@@acme.com",
            "in fo@acme.com",
            "info@.com",
            "info@acme.",
        ] {
            let result = validate_create(&json!({"name": "Acme", "email": email}));
            assert_eq!(
                result.errors,
                vec!["Email must have a valid format"],
                "{email:?} should fail"
            );
        }
    }

    #[test]
    fn wrong_types_accumulate_in_order() {
        let result = validate_create(&json!({
            "email": 12,
            "license": false,
            "active": "yes",
        }));
        assert_eq!(
            result.errors,
            vec![
                "Name is required and must be a non-empty string",
                "Email must be a string",
                "License must be a string",
                "Active must be a boolean",
            ]
        );
        assert!(matches!(
            result.into_result(),
            Err(AppError::Validation(errors)) if errors.len() == 4
        ));
    }

    #[test]
    fn sanitize_trims_and_defaults_active() {
        let request = sanitize_create(&json!({
            "name": "  Acme Corp ",
            "email": " info@acme.com ",
            "license": "  LIC-1",
        }));
        assert_eq!(
            request,
            CreateOrganizationRequest {
                name: "Acme Corp".into(),
                email: Some("info@acme.com".into()),
                license: Some("LIC-1".into()),
                active: true,
            }
        );
    }

    #[test]
    fn sanitize_drops_blank_optionals_and_keeps_explicit_active() {
        let request = sanitize_create(&json!({
            "name": "Acme",
            "email": "   ",
            "license": "",
            "active": false,
        }));
        assert_eq!(request.email, None);
        assert_eq!(request.license, None);
        assert!(!request.active);
    }
}
