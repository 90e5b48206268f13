//! Request validation. Field rules are derived on the DTOs; the password
//! policy and cross-field checks are added here, and the combined failures
//! become `DomainError::Validation`.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use blog_core::error::DomainError;

/// Run the derived rules of `request`, then `extra` for the checks the
/// derive cannot express.
pub fn check<T, F>(request: &T, extra: F) -> Result<(), DomainError>
where
    T: Validate,
    F: FnOnce(&mut ValidationErrors),
{
    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
    extra(&mut errors);
    into_result(errors)
}

/// Record a failed check against `field`.
pub fn reject(errors: &mut ValidationErrors, field: &'static str, message: impl Into<String>) {
    let mut error = ValidationError::new(field);
    error.message = Some(Cow::Owned(message.into()));
    errors.add(field, error);
}

/// Flatten to messages, ordered by field, each message once.
fn into_result(errors: ValidationErrors) -> Result<(), DomainError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    if fields.is_empty() {
        return Ok(());
    }
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid."),
            };
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }
    Err(DomainError::Validation(messages))
}

/// Password policy failures, each prefixed with `subject` ("Password",
/// "New password").
pub fn password_problems(subject: &str, password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if !(6..=100).contains(&password.chars().count()) {
        problems.push(format!("{subject} must be between 6 and 100 characters."));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push(format!("{subject} must contain at least one uppercase letter."));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push(format!("{subject} must contain at least one lowercase letter."));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push(format!("{subject} must contain at least one number."));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        problems.push(format!("{subject} must contain at least one special character."));
    }
    problems
}

/// Add each password policy failure under `field`.
pub fn check_password(
    errors: &mut ValidationErrors,
    field: &'static str,
    subject: &str,
    password: &str,
) {
    for problem in password_problems(subject, password) {
        reject(errors, field, problem);
    }
}
