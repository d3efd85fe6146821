//! Error types for the storefront client.
//!
//! Every failure is a tagged variant. Backend errors carry their HTTP status,
//! a coarse [`ApiErrorKind`] derived from it and the detail message the
//! backend sent, so callers never have to inspect response shapes.

use std::fmt;
use thiserror::Error;

use crate::types::Cursor;

/// The unified error type for storefront operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (not signed in, rejected credentials or refresh token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success response from the backend.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Malformed pagination from the backend.
    #[error("pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// The request was abandoned by its owner before it resolved.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// Returns true if the backend rejected the request for lack of a valid session.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::Auth(AuthError::NotSignedIn | AuthError::RefreshTokenInvalid) => true,
            Error::Api(api) => api.kind == ApiErrorKind::Unauthorized,
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("could not decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No session is available for an operation that requires one.
    #[error("not signed in")]
    NotSignedIn,

    /// Invalid credentials provided.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Refresh token is missing, invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,
}

/// Coarse classification of a backend error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Server,
    Other,
}

impl ApiErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

/// A non-success response from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Classification derived from the status.
    pub kind: ApiErrorKind,
    /// Message from the response body, if the backend sent one.
    pub detail: Option<String>,
}

impl ApiError {
    /// Create a new API error from a status and optional detail.
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self {
            status,
            kind: ApiErrorKind::from_status(status),
            detail,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} [{:?}]", self.status, self.kind)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid page size.
    #[error("invalid page size {value}: {reason}")]
    PageSize { value: u32, reason: String },

    /// Invalid email address.
    #[error("invalid email '{value}': {reason}")]
    Email { value: String, reason: String },

    /// Invalid identifier.
    #[error("invalid id '{value}': {reason}")]
    Id { value: String, reason: String },
}

/// Pagination contract violations.
#[derive(Debug, Clone, Error)]
pub enum PaginationError {
    /// The backend returned a next cursor that was already consumed.
    #[error("next cursor {cursor} did not advance")]
    CursorDidNotAdvance { cursor: Cursor },
}
