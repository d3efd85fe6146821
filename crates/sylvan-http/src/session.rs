//! Authenticated storefront session.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reqwest::Method;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use sylvan_core::catalog::{Category, NewCategory, NewProduct, NewTag, Product, ProductUpdate, Tag};
use sylvan_core::customer::{Address, NewAddress, ProfileUpdate, sort_default_first};
use sylvan_core::error::AuthError;
use sylvan_core::types::{AddressId, CategoryId, ProductId, TagId};
use sylvan_core::{AuthSession, AuthStore, Customer, Error, Result};

use crate::rest::{
    AUTH_LINK, AUTH_LOGOUT, AUTH_REFRESH, AuthResponse, CATEGORY, CUSTOMER_ADDRESSES,
    CUSTOMER_PROFILE, LinkRequest, PRODUCT, RefreshRequest, TAG, address_default_path,
    address_path, category_path, product_path, tag_path,
};
use crate::storefront::HttpStorefront;

/// A signed-in customer's connection to the storefront.
///
/// Obtained from [`HttpStorefront::login`], [`HttpStorefront::register`] or
/// [`HttpSession::from_persisted`]. Cheap to clone; clones share one
/// [`AuthStore`], so a refresh or logout through any clone is seen by all.
///
/// Requests rejected with `401` are retried once after a token refresh when
/// a refresh token is held.
#[derive(Clone)]
pub struct HttpSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storefront: HttpStorefront,
    store: RwLock<AuthStore>,
}

impl HttpSession {
    /// Create a session from tokens saved by an earlier run.
    ///
    /// The tokens are not validated until the first request.
    pub fn from_persisted(storefront: HttpStorefront, session: AuthSession) -> Self {
        let mut store = AuthStore::new();
        store.sign_in(session);

        Self {
            inner: Arc::new(SessionInner {
                storefront,
                store: RwLock::new(store),
            }),
        }
    }

    /// The storefront this session belongs to.
    pub fn storefront(&self) -> &HttpStorefront {
        &self.inner.storefront
    }

    /// Snapshot of the session for persistence, or `None` after logout.
    ///
    /// # Security
    ///
    /// The returned tokens grant access to the account. Store them with
    /// owner-only permissions.
    pub async fn export(&self) -> Option<AuthSession> {
        self.inner.store.read().await.session().cloned()
    }

    /// The signed-in customer as last seen.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] after logout.
    pub async fn customer(&self) -> Result<Customer> {
        let store = self.inner.store.read().await;
        store
            .customer()
            .cloned()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    pub async fn is_admin(&self) -> bool {
        self.inner.store.read().await.is_admin()
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Exchange the refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RefreshTokenInvalid`] if no refresh token is held
    /// or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing session");

        let refresh_token = {
            let store = self.inner.store.read().await;
            store
                .session()
                .ok_or(AuthError::NotSignedIn)?
                .refresh_token
                .as_ref()
                .map(|t| t.as_str().to_string())
        };
        let refresh_token = refresh_token.ok_or(AuthError::RefreshTokenInvalid)?;

        let request = RefreshRequest {
            refresh_token: Some(&refresh_token),
        };
        let response: AuthResponse = match self.client().post(AUTH_REFRESH, &request).await {
            Ok(response) => response,
            Err(err) if err.is_unauthorized() => {
                warn!("refresh token rejected");
                return Err(AuthError::RefreshTokenInvalid.into());
            }
            Err(err) => return Err(err),
        };

        let refreshed = response.into_session();
        {
            let mut store = self.inner.store.write().await;
            store.update_tokens(refreshed.access_token, refreshed.refresh_token)?;
            store.update_customer(refreshed.customer)?;
        }

        debug!("Session refreshed successfully");
        Ok(())
    }

    /// Revoke the session on the backend and tear down local state.
    ///
    /// Local state is cleared even if the backend call fails; the error is
    /// still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Signing out");

        let previous = self.inner.store.write().await.reset();
        let Some(previous) = previous else {
            return Ok(());
        };

        let request = RefreshRequest {
            refresh_token: previous.refresh_token.as_ref().map(|t| t.as_str()),
        };
        self.client()
            .send_authed_no_response(
                Method::POST,
                AUTH_LOGOUT,
                Some(&request),
                previous.access_token.as_str(),
            )
            .await
    }

    /// Link an external identity provider using an OAuth authorization code.
    ///
    /// Returns the updated profile.
    #[instrument(skip(self, code))]
    pub async fn link_oauth(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<Customer> {
        let request = &LinkRequest {
            provider,
            code,
            redirect_uri,
        };
        let customer: Customer = self
            .authed(|token| async move {
                self.client()
                    .send_authed(Method::POST, AUTH_LINK, request, &token)
                    .await
            })
            .await?;

        self.remember(&customer).await;
        Ok(customer)
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Fetch the current profile.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Customer> {
        let customer: Customer = self
            .authed(|token| async move { self.client().get_authed(CUSTOMER_PROFILE, &token).await })
            .await?;

        self.remember(&customer).await;
        Ok(customer)
    }

    /// Update profile fields.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Customer> {
        let customer: Customer = self
            .authed(|token| async move {
                self.client()
                    .send_authed(Method::PUT, CUSTOMER_PROFILE, update, &token)
                    .await
            })
            .await?;

        self.remember(&customer).await;
        Ok(customer)
    }

    // ========================================================================
    // Address book
    // ========================================================================

    /// List saved addresses, default first and then by city.
    #[instrument(skip(self))]
    pub async fn addresses(&self) -> Result<Vec<Address>> {
        let mut addresses: Vec<Address> = self
            .authed(|token| async move { self.client().get_authed(CUSTOMER_ADDRESSES, &token).await })
            .await?;

        sort_default_first(&mut addresses);
        debug!(count = addresses.len(), "addresses fetched");
        Ok(addresses)
    }

    #[instrument(skip(self))]
    pub async fn add_address(&self, address: &NewAddress) -> Result<Address> {
        self.authed(|token| async move {
            self.client()
                .send_authed(Method::POST, CUSTOMER_ADDRESSES, address, &token)
                .await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_address(&self, id: AddressId, address: &NewAddress) -> Result<Address> {
        let path = address_path(id);
        self.authed(|token| {
            let path = &path;
            async move {
                self.client()
                    .send_authed(Method::PUT, path, address, &token)
                    .await
            }
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_address(&self, id: AddressId) -> Result<()> {
        let path = address_path(id);
        self.authed_no_response(Method::DELETE, &path).await
    }

    /// Make an address the default. The backend clears the flag elsewhere.
    #[instrument(skip(self))]
    pub async fn set_default_address(&self, id: AddressId) -> Result<()> {
        let path = address_default_path(id);
        self.authed_no_response(Method::PUT, &path).await
    }

    // ========================================================================
    // Catalog administration
    // ========================================================================

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let created: Product = self
            .authed(|token| async move {
                self.client()
                    .send_authed(Method::POST, PRODUCT, product, &token)
                    .await
            })
            .await?;

        self.storefront().invalidate_products().await;
        Ok(created)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(&self, id: ProductId, update: &ProductUpdate) -> Result<Product> {
        let path = product_path(id);
        let updated: Product = self
            .authed(|token| {
                let path = &path;
                async move {
                    self.client()
                        .send_authed(Method::PUT, path, update, &token)
                        .await
                }
            })
            .await?;

        self.storefront().invalidate_products().await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.authed_no_response(Method::DELETE, &product_path(id))
            .await?;
        self.storefront().invalidate_products().await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        self.authed(|token| async move {
            self.client()
                .send_authed(Method::POST, CATEGORY, category, &token)
                .await
        })
        .await
    }

    /// Delete a category. Cached pages are dropped since products may have
    /// lost their category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.authed_no_response(Method::DELETE, &category_path(id))
            .await?;
        self.storefront().invalidate_products().await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_tag(&self, tag: &NewTag) -> Result<Tag> {
        self.authed(|token| async move {
            self.client()
                .send_authed(Method::POST, TAG, tag, &token)
                .await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: TagId) -> Result<()> {
        self.authed_no_response(Method::DELETE, &tag_path(id))
            .await?;
        self.storefront().invalidate_products().await;
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn client(&self) -> &crate::rest::ApiClient {
        self.inner.storefront.client()
    }

    async fn access_token(&self) -> Result<String> {
        let store = self.inner.store.read().await;
        Ok(store.access_token()?.as_str().to_string())
    }

    async fn can_refresh(&self) -> bool {
        let store = self.inner.store.read().await;
        store
            .session()
            .is_some_and(|s| s.refresh_token.is_some())
    }

    async fn remember(&self, customer: &Customer) {
        let mut store = self.inner.store.write().await;
        if store.update_customer(customer.clone()).is_err() {
            debug!("profile fetched after logout, not stored");
        }
    }

    /// Run a request with the current access token, refreshing and retrying
    /// once if the backend answers `401`.
    async fn authed<T, F, Fut>(&self, request: F) -> Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.access_token().await?;
        let result = request(token).await;

        let rejected = matches!(&result, Err(Error::Api(err)) if err.status == 401);
        if rejected && self.can_refresh().await {
            debug!("access token rejected, refreshing");
            self.refresh().await?;
            return request(self.access_token().await?).await;
        }
        result
    }

    async fn authed_no_response(&self, method: Method, path: &str) -> Result<()> {
        self.authed(|token| {
            let method = method.clone();
            async move {
                self.client()
                    .send_authed_no_response::<()>(method, path, None, &token)
                    .await
            }
        })
        .await
    }
}

impl fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSession")
            .field("api", &self.inner.storefront.api().as_str())
            .finish_non_exhaustive()
    }
}
