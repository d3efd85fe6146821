//! Login credentials type.

use std::fmt;

use crate::types::Email;

/// Email and password submitted to `Auth/login`.
///
/// The password is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use sylvan_core::{Credentials, Email};
///
/// let email = Email::new("hazel@sylvan.shop").unwrap();
/// let creds = Credentials::new(email, "correct horse");
/// assert_eq!(creds.email().as_str(), "hazel@sylvan.shop");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the password. Use only to build the login request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
