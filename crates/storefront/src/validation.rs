//! Synchronous sign-up form validation.
//!
//! Pure functions from field values to per-rule reports. A report maps a
//! rule name to whether the rule is violated (`true` = invalid). The
//! presentation layer decides when to validate, typically per keystroke,
//! and how to render the violations.

use std::collections::BTreeMap;

use wildberry_core::{Email, Password, PasswordError};

/// Per-field rule report, rule name to violated flag.
pub type RuleReport = BTreeMap<&'static str, bool>;

/// Rule names, shared between validators and presentation.
pub mod rules {
    pub const REQUIRED: &str = "required";
    pub const FORMAT: &str = "format";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MATCH: &str = "match";
}

/// Whether a report contains no violations.
#[must_use]
pub fn is_clean(report: &RuleReport) -> bool {
    report.values().all(|violated| !violated)
}

/// Validate an email field: required, structurally valid.
#[must_use]
pub fn validate_email(value: &str) -> RuleReport {
    let mut report = RuleReport::new();
    report.insert(rules::REQUIRED, value.is_empty());
    report.insert(
        rules::FORMAT,
        !value.is_empty() && Email::parse(value).is_err(),
    );
    report
}

/// Validate a password field: required, minimum length, at least one
/// letter and one digit.
///
/// Rules are checked independently, so a short digit-free input reports
/// both violations at once.
#[must_use]
pub fn validate_password(value: &str) -> RuleReport {
    let mut report = RuleReport::new();
    report.insert(rules::REQUIRED, value.is_empty());
    report.insert(
        rules::MIN_LENGTH,
        !value.is_empty() && value.chars().count() < Password::MIN_LENGTH,
    );
    report.insert(
        rules::FORMAT,
        !value.is_empty()
            && matches!(
                Password::parse(value),
                Err(PasswordError::MissingLetterOrDigit)
            ),
    );
    report
}

/// Validate the password confirmation field: required, matches the
/// password.
#[must_use]
pub fn validate_password_check(password: &str, check: &str) -> RuleReport {
    let mut report = RuleReport::new();
    report.insert(rules::REQUIRED, check.is_empty());
    report.insert(rules::MATCH, !check.is_empty() && check != password);
    report
}

/// Validation state for the sign-up form.
///
/// Tracks the latest report per field; a field nobody has touched yet
/// has no report and keeps the form invalid, so submit cannot enable
/// prematurely.
#[derive(Debug, Clone, Default)]
pub struct SignUpValidation {
    email: Option<RuleReport>,
    password: Option<RuleReport>,
    password_check: Option<RuleReport>,
}

impl SignUpValidation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record the email field.
    pub fn record_email(&mut self, value: &str) -> &RuleReport {
        self.email.insert(validate_email(value))
    }

    /// Validate and record the password field.
    pub fn record_password(&mut self, value: &str) -> &RuleReport {
        self.password.insert(validate_password(value))
    }

    /// Validate and record the confirmation field.
    pub fn record_password_check(&mut self, password: &str, check: &str) -> &RuleReport {
        self.password_check
            .insert(validate_password_check(password, check))
    }

    /// True only when every field has been validated at least once and
    /// no report carries a violation.
    #[must_use]
    pub fn all_valid(&self) -> bool {
        [&self.email, &self.password, &self.password_check]
            .into_iter()
            .all(|report| report.as_ref().is_some_and(is_clean))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(is_clean(&validate_email("user@example.com")));

        let empty = validate_email("");
        assert_eq!(empty[rules::REQUIRED], true);
        assert_eq!(empty[rules::FORMAT], false, "format not flagged when empty");

        let malformed = validate_email("not-an-email");
        assert_eq!(malformed[rules::REQUIRED], false);
        assert_eq!(malformed[rules::FORMAT], true);
    }

    #[test]
    fn test_validate_password_rules_are_independent() {
        assert!(is_clean(&validate_password("sturdy4password")));

        let short_and_digitless = validate_password("abc");
        assert_eq!(short_and_digitless[rules::MIN_LENGTH], true);
        assert_eq!(short_and_digitless[rules::FORMAT], true);

        let long_but_digitless = validate_password("lettersonly");
        assert_eq!(long_but_digitless[rules::MIN_LENGTH], false);
        assert_eq!(long_but_digitless[rules::FORMAT], true);
    }

    #[test]
    fn test_validate_password_check() {
        assert!(is_clean(&validate_password_check("abc12345", "abc12345")));

        let mismatch = validate_password_check("abc12345", "abc12346");
        assert_eq!(mismatch[rules::MATCH], true);

        let empty = validate_password_check("abc12345", "");
        assert_eq!(empty[rules::REQUIRED], true);
        assert_eq!(empty[rules::MATCH], false);
    }

    #[test]
    fn test_untouched_form_is_invalid() {
        let form = SignUpValidation::new();
        assert!(!form.all_valid());
    }

    #[test]
    fn test_all_valid_requires_every_field_clean() {
        let mut form = SignUpValidation::new();
        form.record_email("user@example.com");
        form.record_password("sturdy4password");
        assert!(!form.all_valid(), "confirmation untouched");

        form.record_password_check("sturdy4password", "sturdy4password");
        assert!(form.all_valid());

        form.record_password_check("sturdy4password", "different1");
        assert!(!form.all_valid());
    }
}
