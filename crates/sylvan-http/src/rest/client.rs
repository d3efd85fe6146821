//! REST HTTP client implementation.

use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use sylvan_core::error::{ApiError, Error, TransportError};
use sylvan_core::{ApiUrl, Result};

use super::endpoints::ErrorResponse;
use crate::config::ClientConfig;

/// HTTP client for the storefront REST backend.
///
/// Paths are relative to the configured [`ApiUrl`]. A 2xx response is decoded
/// as JSON; anything else becomes an [`ApiError`] carrying the status and
/// whatever message the backend sent.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    /// Create a client for the given backend.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the TLS backend cannot be initialised.
    pub fn new(api: ApiUrl, config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sylvan/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, api })
    }

    /// Returns the backend URL this client talks to.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Unauthenticated GET.
    #[instrument(skip(self), fields(api = %self.api))]
    pub async fn get<Q, R>(&self, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        trace!(?params, "query parameters");

        let request = self.request(Method::GET, path, None).query(params);
        self.execute(request).await
    }

    /// Authenticated GET.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn get_authed<R>(&self, path: &str, token: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!(path, "authenticated GET");

        let request = self.request(Method::GET, path, Some(token));
        self.execute(request).await
    }

    /// Unauthenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!(path, "POST");

        let request = self.request(Method::POST, path, None).json(body);
        self.execute(request).await
    }

    /// Authenticated request with a JSON body and a JSON response.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn send_authed<B, R>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<R>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        debug!(%method, path, "authenticated request");
        trace!(?body, "request body");

        let request = self.request(method, path, Some(token)).json(body);
        self.execute(request).await
    }

    /// Authenticated request whose response body is ignored.
    ///
    /// Used for deletes, logout and other endpoints that answer `204`.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn send_authed_no_response<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: &str,
    ) -> Result<()>
    where
        B: Serialize,
    {
        debug!(%method, path, "authenticated request (no response)");

        let mut request = self.request(method, path, Some(token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            Ok(())
        } else {
            Err(parse_error_response(response).await.into())
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.api.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            response.json::<R>().await.map_err(transport_error)
        } else {
            Err(parse_error_response(response).await.into())
        }
    }
}

/// Build an [`ApiError`] from a non-success response.
///
/// JSON bodies contribute their `message`, `detail`, `title` or `error`
/// field, in that order. A plain-text body is used as is.
async fn parse_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let detail = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => body.into_detail(),
        Err(_) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
    };

    debug!(status, ?detail, "backend returned an error");
    ApiError::new(status, detail)
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let error = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    error.into()
}
