//! Email address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A syntactically plausible email address, trimmed.
///
/// Only the shape is checked (one `@`, non-empty local part and domain, a dot
/// in the domain); the backend owns real verification.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not of the form `local@domain.tld`.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Email {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let Some((local, domain)) = s.split_once('@') else {
            return Err(invalid("missing '@'"));
        };
        if local.is_empty() || domain.is_empty() {
            return Err(invalid("local part and domain must be non-empty"));
        }
        if domain.contains('@') {
            return Err(invalid("contains more than one '@'"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid("domain must contain a dot"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims() {
        let email = Email::new("  fern@moss.garden ").unwrap();
        assert_eq!(email.as_str(), "fern@moss.garden");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "fern", "@moss.garden", "fern@", "fern@moss", "a@b@c.d", "fe rn@moss.garden"] {
            assert!(Email::new(bad).is_err(), "accepted {bad:?}");
        }
    }
}
