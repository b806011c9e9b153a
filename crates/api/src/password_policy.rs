// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! This module enforces password requirements for admin credentials.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password lacks a required character class.
    #[error("Password must contain at least one {class}")]
    MissingCharacterClass { class: &'static str },
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// A password needs the minimum length plus at least one uppercase
    /// letter, one lowercase letter and one digit.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let classes: [(&'static str, fn(&char) -> bool); 3] = [
            ("uppercase letter", char::is_ascii_uppercase),
            ("lowercase letter", char::is_ascii_lowercase),
            ("digit", char::is_ascii_digit),
        ];
        for (class, matches) in classes {
            if !password.chars().any(|c| matches(&c)) {
                return Err(PasswordPolicyError::MissingCharacterClass { class });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert!(policy.validate("Password1").is_ok());
        assert!(policy.validate("aB3defgh").is_ok());
        assert!(policy.validate("MyP@ssw0rd!").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> = policy.validate("Ab1defg");

        assert_eq!(result, Err(PasswordPolicyError::TooShort { min_length: 8 }));
    }

    #[test]
    fn test_password_missing_classes() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("password1"),
            Err(PasswordPolicyError::MissingCharacterClass {
                class: "uppercase letter"
            })
        );
        assert_eq!(
            policy.validate("PASSWORD1"),
            Err(PasswordPolicyError::MissingCharacterClass {
                class: "lowercase letter"
            })
        );
        assert_eq!(
            policy.validate("Passwordd"),
            Err(PasswordPolicyError::MissingCharacterClass { class: "digit" })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        // Seven characters, more than eight bytes.
        assert!(policy.validate("Äb1défg").is_err());
    }
}
