//! Endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use sylvan_core::catalog::ProductFilter;
use sylvan_core::customer::NewCustomer;
use sylvan_core::types::{AddressId, CategoryId, Cursor, PageSize, ProductId, TagId};
use sylvan_core::{AccessToken, AuthSession, Customer, RefreshToken};

// Endpoint paths
pub const AUTH_REGISTER: &str = "Auth/register";
pub const AUTH_LOGIN: &str = "Auth/login";
pub const AUTH_REFRESH: &str = "Auth/refresh";
pub const AUTH_LOGOUT: &str = "Auth/logout";
pub const AUTH_LINK: &str = "Auth/link";
pub const CUSTOMER_PROFILE: &str = "Customer/profile";
pub const CUSTOMER_ADDRESSES: &str = "Customer/addresses";
pub const PRODUCT: &str = "Product";
pub const CATEGORY: &str = "Category";
pub const TAG: &str = "Tag";

pub fn product_path(id: ProductId) -> String {
    format!("{PRODUCT}/{id}")
}

pub fn category_path(id: CategoryId) -> String {
    format!("{CATEGORY}/{id}")
}

pub fn tag_path(id: TagId) -> String {
    format!("{TAG}/{id}")
}

pub fn address_path(id: AddressId) -> String {
    format!("{CUSTOMER_ADDRESSES}/{id}")
}

pub fn address_default_path(id: AddressId) -> String {
    format!("{CUSTOMER_ADDRESSES}/{id}/default")
}

// Auth

/// Request body for `Auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    #[serde(flatten)]
    pub form: &'a NewCustomer,
    pub password: &'a str,
}

/// Request body for `Auth/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request body for `Auth/refresh` and `Auth/logout`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

impl std::fmt::Debug for RefreshRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &self.refresh_token.map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Response of `Auth/register`, `Auth/login` and `Auth/refresh`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub customer: Customer,
}

impl AuthResponse {
    pub fn into_session(self) -> AuthSession {
        AuthSession {
            customer: self.customer,
            access_token: AccessToken::new(self.access_token),
            refresh_token: self.refresh_token.map(RefreshToken::new),
        }
    }
}

/// Request body for `Auth/link`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest<'a> {
    pub provider: &'a str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<&'a str>,
}

// Product

/// Query parameters for `GET Product`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub cursor: u64,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i64>,
}

impl ListProductsQuery {
    pub fn new(cursor: Cursor, page_size: PageSize, filter: &ProductFilter) -> Self {
        Self {
            cursor: cursor.get(),
            page_size: page_size.get(),
            category_id: filter.category.map(CategoryId::get),
            tag_id: filter.tag.map(TagId::get),
        }
    }
}

/// Empty query for GET requests without parameters.
#[derive(Debug, Serialize)]
pub struct NoParams {}

// Errors

/// Error body the backend sends with non-success statuses.
///
/// Handlers use `message`; framework-generated errors use the problem-details
/// `title`/`detail` pair.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_detail(self) -> Option<String> {
        self.message.or(self.detail).or(self.title).or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sylvan_core::Email;

    #[test]
    fn list_query_skips_absent_filters() {
        let query = ListProductsQuery::new(
            Cursor::new(24),
            PageSize::default(),
            &ProductFilter::default(),
        );
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "cursor": 24, "pageSize": 12 })
        );
    }

    #[test]
    fn list_query_includes_filters() {
        let filter = ProductFilter {
            category: Some(CategoryId::new(3)),
            tag: Some(TagId::new(9)),
        };
        let query = ListProductsQuery::new(Cursor::FIRST, PageSize::new(20).unwrap(), &filter);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "cursor": 0, "pageSize": 20, "categoryId": 3, "tagId": 9 })
        );
    }

    #[test]
    fn register_request_carries_password() {
        let form = NewCustomer::new(
            "Hazel",
            "Birch",
            Email::new("hazel@sylvan.shop").unwrap(),
            "secret123",
        );
        let request = RegisterRequest {
            form: &form,
            password: form.password(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "firstName": "Hazel",
                "lastName": "Birch",
                "email": "hazel@sylvan.shop",
                "password": "secret123"
            })
        );
    }

    #[test]
    fn error_detail_precedence() {
        let body: ErrorResponse =
            serde_json::from_value(json!({ "title": "Bad Request", "detail": "name is required" }))
                .unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("name is required"));

        let body: ErrorResponse = serde_json::from_value(json!({ "error": "Forbidden" })).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("Forbidden"));

        assert!(ErrorResponse::default().into_detail().is_none());
    }

    #[test]
    fn paths_embed_ids() {
        assert_eq!(product_path(ProductId::new(12)), "Product/12");
        assert_eq!(
            address_default_path(AddressId::new(4)),
            "Customer/addresses/4/default"
        );
    }
}
