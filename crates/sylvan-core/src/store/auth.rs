//! Signed-in state.

use tracing::debug;

use crate::Result;
use crate::customer::Customer;
use crate::error::AuthError;
use crate::tokens::{AccessToken, RefreshToken};

/// Tokens and profile of a signed-in customer.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub customer: Customer,
    pub access_token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
}

/// Holds the current [`AuthSession`], if any.
///
/// Injected into whatever needs it. [`AuthStore::reset`] is the logout
/// teardown and must be paired with clearing any cached per-user data.
#[derive(Debug, Default)]
pub struct AuthStore {
    session: Option<AuthSession>,
}

impl AuthStore {
    /// An empty, signed-out store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session.
    pub fn sign_in(&mut self, session: AuthSession) {
        debug!(customer = %session.customer.id, "signed in");
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.session.as_ref().map(|s| &s.customer)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Returns true if the signed-in customer may use admin operations.
    pub fn is_admin(&self) -> bool {
        self.customer().is_some_and(|c| c.is_admin)
    }

    /// Access token of the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when signed out.
    pub fn access_token(&self) -> Result<&AccessToken> {
        self.session
            .as_ref()
            .map(|s| &s.access_token)
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    /// Store a refreshed token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when signed out.
    pub fn update_tokens(
        &mut self,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) -> Result<()> {
        let session = self.session.as_mut().ok_or(AuthError::NotSignedIn)?;
        session.access_token = access_token;
        if refresh_token.is_some() {
            session.refresh_token = refresh_token;
        }
        Ok(())
    }

    /// Store a freshly fetched profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when signed out.
    pub fn update_customer(&mut self, customer: Customer) -> Result<()> {
        let session = self.session.as_mut().ok_or(AuthError::NotSignedIn)?;
        session.customer = customer;
        Ok(())
    }

    /// Sign out, returning the session that was held.
    pub fn reset(&mut self) -> Option<AuthSession> {
        debug!("auth store reset");
        self.session.take()
    }
}
