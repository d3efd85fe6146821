//! Customer profile records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{CustomerId, Email};

/// The signed-in customer, as returned by `GET Customer/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// OAuth providers linked to this account (e.g. `google`).
    #[serde(default)]
    pub linked_providers: Vec<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl Customer {
    /// First and last name joined for display.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Registration form submitted to `Auth/register`.
///
/// The password is excluded from serialization and `Debug`; the transport
/// adds it to the request body explicitly.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(skip_serializing)]
    password: String,
}

impl NewCustomer {
    /// Build a registration form.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Email,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            password: password.into(),
        }
    }

    /// Returns the chosen password for building the request body.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCustomer")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `PUT Customer/profile`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl ProfileUpdate {
    /// Returns true if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}
