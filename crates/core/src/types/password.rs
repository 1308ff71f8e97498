//! Registration password type.

use serde::Serialize;

/// Errors that can occur when parsing a [`Password`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The input string is empty.
    #[error("password cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum required length.
        min: usize,
    },
    /// The input lacks a letter or a digit.
    #[error("password must contain at least one letter and one digit")]
    MissingLetterOrDigit,
}

/// A password accepted by the registration rules.
///
/// ## Constraints
///
/// - At least 8 characters
/// - At least one letter and one digit
///
/// The value is deliberately excluded from `Debug` output and is never
/// deserialized; it exists only on the way to the sign-in/sign-up
/// endpoints.
#[derive(Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Minimum length of a password.
    pub const MIN_LENGTH: usize = 8;

    /// Parse a `Password` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, shorter than
    /// [`Self::MIN_LENGTH`], or missing a letter or a digit.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        if s.is_empty() {
            return Err(PasswordError::Empty);
        }

        if s.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        let has_letter = s.chars().any(char::is_alphabetic);
        let has_digit = s.chars().any(|c| c.is_ascii_digit());
        if !has_letter || !has_digit {
            return Err(PasswordError::MissingLetterOrDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the password as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(\"[REDACTED]\")")
    }
}
