//! Anonymous storefront operations.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use sylvan_core::catalog::{Category, Product, ProductFilter, Tag};
use sylvan_core::customer::NewCustomer;
use sylvan_core::error::AuthError;
use sylvan_core::types::{PageSize, ProductId};
use sylvan_core::{ApiUrl, AuthSession, CancelSignal, Credentials, Error, Feed, PageCache, Result};

use crate::catalog::ProductPages;
use crate::config::ClientConfig;
use crate::rest::{
    AUTH_LOGIN, AUTH_REGISTER, ApiClient, AuthResponse, CATEGORY, LoginRequest, NoParams,
    RegisterRequest, TAG, product_path,
};
use crate::session::HttpSession;

/// Entry point to a storefront backend.
///
/// Clones share the HTTP connection pool and the product page cache, so
/// every feed created from the same storefront deduplicates requests
/// against the others.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: ApiClient,
    pages: Arc<PageCache<ProductPages>>,
}

impl HttpStorefront {
    /// Connect to a backend with default client settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Self::with_config(api, &ClientConfig::default())
    }

    /// Connect to a backend with explicit client settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn with_config(api: ApiUrl, config: &ClientConfig) -> Result<Self> {
        let client = ApiClient::new(api, config)?;
        let pages = Arc::new(PageCache::new(ProductPages::new(client.clone())));
        Ok(Self { client, pages })
    }

    /// Returns the backend URL.
    pub fn api(&self) -> &ApiUrl {
        self.client.api()
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The page cache shared by this storefront's feeds.
    pub fn pages(&self) -> &Arc<PageCache<ProductPages>> {
        &self.pages
    }

    /// Start a product feed backed by the shared page cache.
    pub fn feed(
        &self,
        page_size: PageSize,
        filter: ProductFilter,
        cancel: CancelSignal,
    ) -> Feed<ProductPages> {
        Feed::new(Arc::clone(&self.pages), page_size, filter, cancel)
    }

    /// Drop every cached product page.
    ///
    /// Called after catalog mutations so the next feed sees fresh data.
    pub async fn invalidate_products(&self) {
        debug!("invalidating cached product pages");
        self.pages.clear().await;
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Create an account and sign in to it.
    ///
    /// # Errors
    ///
    /// Returns an API error if the backend rejects the form (for example a
    /// `409` for an email that is already registered).
    #[instrument(skip(self, form), fields(email = %form.email.as_str()))]
    pub async fn register(&self, form: &NewCustomer) -> Result<HttpSession> {
        info!("Registering new customer");

        let request = RegisterRequest {
            form,
            password: form.password(),
        };
        let response: AuthResponse = self.client.post(AUTH_REGISTER, &request).await?;

        Ok(self.session_from(response))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the backend answers
    /// `401`, or any other transport or API error.
    #[instrument(skip(self, credentials), fields(email = %credentials.email().as_str()))]
    pub async fn login(&self, credentials: Credentials) -> Result<HttpSession> {
        info!("Signing in");

        let request = LoginRequest {
            email: credentials.email().as_str(),
            password: credentials.password(),
        };
        let response: AuthResponse = match self.client.post(AUTH_LOGIN, &request).await {
            Ok(response) => response,
            Err(Error::Api(err)) if err.status == 401 => {
                let detail = err.detail.unwrap_or_else(|| "email or password rejected".into());
                return Err(AuthError::InvalidCredentials(detail).into());
            }
            Err(err) => return Err(err),
        };

        Ok(self.session_from(response))
    }

    /// Restore a session from previously exported tokens.
    pub fn resume(&self, session: AuthSession) -> HttpSession {
        HttpSession::from_persisted(self.clone(), session)
    }

    fn session_from(&self, response: AuthResponse) -> HttpSession {
        let session = response.into_session();
        debug!(customer = %session.customer.id, "session created");
        HttpSession::from_persisted(self.clone(), session)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch a single product.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.client.get(&product_path(id), &NoParams {}).await
    }

    /// List all categories.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.client.get(CATEGORY, &NoParams {}).await
    }

    /// List all tags.
    #[instrument(skip(self))]
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        self.client.get(TAG, &NoParams {}).await
    }
}
