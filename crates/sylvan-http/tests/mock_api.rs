//! Mock backend tests for sylvan-http.
//!
//! These tests use wiremock to simulate the storefront REST backend and
//! exercise the client without network access.

use std::time::Duration;

use serde_json::{Value, json};
use sylvan_core::error::{ApiErrorKind, AuthError, TransportError};
use sylvan_core::{
    AccessToken, ApiUrl, AuthSession, CancelSignal, CategoryId, Credentials, Customer, CustomerId,
    Email, Error, FeedView, PageSize, ProductFilter, ProductId, RefreshToken,
};
use sylvan_core::catalog::NewProduct;
use sylvan_core::customer::NewCustomer;
use sylvan_http::{ClientConfig, HttpSession, HttpStorefront};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to point a storefront at a mock server.
fn mock_storefront(server: &MockServer) -> HttpStorefront {
    let api = ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    HttpStorefront::new(api).unwrap()
}

fn customer_json(is_admin: bool) -> Value {
    json!({
        "id": 7,
        "firstName": "Hazel",
        "lastName": "Birch",
        "email": "hazel@sylvan.shop",
        "linkedProviders": [],
        "isAdmin": is_admin
    })
}

fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Fern #{id}"),
        "price": 12.5,
        "discount": 0,
        "quantity": 4,
        "images": [{ "url": format!("https://cdn.sylvan.shop/{id}.jpg") }],
        "tags": []
    })
}

fn page_json(ids: &[i64], next: Option<u64>) -> Value {
    json!({
        "products": ids.iter().map(|&id| product_json(id)).collect::<Vec<_>>(),
        "nextCursor": next,
        "pageSize": 3
    })
}

fn signed_in(storefront: &HttpStorefront, access: &str, refresh: Option<&str>) -> HttpSession {
    storefront.resume(AuthSession {
        customer: Customer {
            id: CustomerId::new(7),
            first_name: "Hazel".into(),
            last_name: "Birch".into(),
            email: "hazel@sylvan.shop".into(),
            linked_providers: Vec::new(),
            is_admin: true,
        },
        access_token: AccessToken::new(access),
        refresh_token: refresh.map(RefreshToken::new),
    })
}

async fn mount_product_page(server: &MockServer, cursor: &str, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/Product"))
        .and(query_param("cursor", cursor))
        .and(query_param("pageSize", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Auth/login"))
        .and(body_json(json!({
            "email": "hazel@sylvan.shop",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "test-access-token",
            "refreshToken": "test-refresh-token",
            "customer": customer_json(false)
        })))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let credentials = Credentials::new(Email::new("hazel@sylvan.shop").unwrap(), "secret123");
    let session = storefront.login(credentials).await.unwrap();

    let exported = session.export().await.unwrap();
    assert_eq!(exported.customer.display_name(), "Hazel Birch");
    assert_eq!(exported.access_token.as_str(), "test-access-token");
    assert_eq!(
        exported.refresh_token.unwrap().as_str(),
        "test-refresh-token"
    );
    assert!(!session.is_admin().await);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let credentials = Credentials::new(Email::new("hazel@sylvan.shop").unwrap(), "wrong");
    let err = storefront.login(credentials).await.unwrap_err();

    match err {
        Error::Auth(AuthError::InvalidCredentials(detail)) => {
            assert_eq!(detail, "Invalid email or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_conflict_reports_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Auth/register"))
        .and(body_json(json!({
            "firstName": "Hazel",
            "lastName": "Birch",
            "email": "hazel@sylvan.shop",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "title": "Conflict",
            "detail": "Email already registered"
        })))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let form = NewCustomer::new(
        "Hazel",
        "Birch",
        Email::new("hazel@sylvan.shop").unwrap(),
        "secret123",
    );
    let err = storefront.register(&form).await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 409);
            assert_eq!(api.kind, ApiErrorKind::Conflict);
            assert_eq!(api.detail.as_deref(), Some("Email already registered"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_token_refreshes_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Customer/profile"))
        .and(header("Authorization", "Bearer old-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Auth/refresh"))
        .and(body_json(json!({ "refreshToken": "old-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-access",
            "refreshToken": "new-refresh",
            "customer": customer_json(true)
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Customer/profile"))
        .and(header("Authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json(true)))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "old-access", Some("old-refresh"));

    let profile = session.profile().await.unwrap();
    assert_eq!(profile.first_name, "Hazel");

    let exported = session.export().await.unwrap();
    assert_eq!(exported.access_token.as_str(), "new-access");
    assert_eq!(exported.refresh_token.unwrap().as_str(), "new-refresh");
}

#[tokio::test]
async fn test_rejected_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", Some("stale-refresh"));

    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshTokenInvalid)));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Customer/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", None);

    let err = session.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_logout_tears_down_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Auth/logout"))
        .and(header("Authorization", "Bearer access"))
        .and(body_json(json!({ "refreshToken": "refresh" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", Some("refresh"));

    session.logout().await.unwrap();
    assert!(session.export().await.is_none());

    let err = session.profile().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotSignedIn)));

    // A second logout is a no-op.
    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_link_oauth_updates_profile() {
    let server = MockServer::start().await;

    let mut linked = customer_json(false);
    linked["linkedProviders"] = json!(["google"]);

    Mock::given(method("POST"))
        .and(path("/Auth/link"))
        .and(body_json(json!({ "provider": "google", "code": "auth-code" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(linked))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", None);

    let customer = session.link_oauth("google", "auth-code", None).await.unwrap();
    assert_eq!(customer.linked_providers, ["google"]);
    assert_eq!(
        session.customer().await.unwrap().linked_providers,
        ["google"]
    );
}

// ============================================================================
// Product Feed Tests
// ============================================================================

#[tokio::test]
async fn test_feed_accumulates_pages_without_duplicates() {
    let server = MockServer::start().await;

    mount_product_page(&server, "0", page_json(&[1, 2, 3], Some(3)), 1).await;
    mount_product_page(&server, "3", page_json(&[3, 4, 5], Some(6)), 1).await;
    mount_product_page(&server, "6", page_json(&[6], None), 1).await;

    let storefront = mock_storefront(&server);
    let mut feed = storefront.feed(
        PageSize::new(3).unwrap(),
        ProductFilter::default(),
        CancelSignal::never(),
    );

    let pages = feed.load_pages(None).await.unwrap();
    assert_eq!(pages, 3);

    let ids: Vec<i64> = feed.items().iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
    assert!(!feed.has_more());
    assert!(!feed.view().has_sentinel());
}

#[tokio::test]
async fn test_second_feed_reuses_cached_pages() {
    let server = MockServer::start().await;

    mount_product_page(&server, "0", page_json(&[1, 2, 3], Some(3)), 1).await;
    mount_product_page(&server, "3", page_json(&[4], None), 1).await;

    let storefront = mock_storefront(&server);
    let page_size = PageSize::new(3).unwrap();

    let mut first = storefront.feed(page_size, ProductFilter::default(), CancelSignal::never());
    first.load_pages(None).await.unwrap();

    let mut second = storefront.feed(page_size, ProductFilter::default(), CancelSignal::never());
    second.load_pages(None).await.unwrap();

    assert_eq!(second.items().len(), 4);
    assert_eq!(storefront.pages().len().await, 2);
}

#[tokio::test]
async fn test_feed_sends_filter_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Product"))
        .and(query_param("cursor", "0"))
        .and(query_param("categoryId", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let mut feed = storefront.feed(
        PageSize::new(3).unwrap(),
        ProductFilter::category(CategoryId::new(5)),
        CancelSignal::never(),
    );
    feed.load_initial().await.unwrap();

    assert_eq!(feed.view(), FeedView::Empty);
}

#[tokio::test]
async fn test_failed_next_page_keeps_items_and_retries() {
    let server = MockServer::start().await;

    mount_product_page(&server, "0", page_json(&[1, 2, 3], Some(3)), 1).await;
    Mock::given(method("GET"))
        .and(path("/Product"))
        .and(query_param("cursor", "3"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_product_page(&server, "3", page_json(&[4], None), 1).await;

    let storefront = mock_storefront(&server);
    let mut feed = storefront.feed(
        PageSize::new(3).unwrap(),
        ProductFilter::default(),
        CancelSignal::never(),
    );

    feed.load_initial().await.unwrap();
    let err = feed.on_sentinel_visible().await.unwrap_err();
    assert!(err.to_string().contains("maintenance"));

    match feed.view() {
        FeedView::Items { items, error, .. } => {
            assert_eq!(items.len(), 3);
            assert!(error.unwrap().contains("503"));
        }
        other => panic!("unexpected view: {other:?}"),
    }

    feed.retry().await.unwrap();
    assert_eq!(feed.items().len(), 4);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn test_product_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Product/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let err = storefront.product(ProductId::new(99)).await.unwrap_err();

    match err {
        Error::Api(api) => assert_eq!(api.kind, ApiErrorKind::NotFound),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let mut feed = storefront.feed(
        PageSize::new(3).unwrap(),
        ProductFilter::default(),
        CancelSignal::never(),
    );

    let err = feed.load_initial().await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Decode { .. })));
    assert!(matches!(feed.view(), FeedView::Failed { .. }));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Category"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    let config = ClientConfig::default().with_timeout(Duration::from_millis(50));
    let storefront = HttpStorefront::with_config(api, &config).unwrap();

    let err = storefront.categories().await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Timeout)));
}

// ============================================================================
// Account and Admin Tests
// ============================================================================

#[tokio::test]
async fn test_addresses_are_listed_default_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Customer/addresses"))
        .and(header("Authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "street": "3 Oak Row", "city": "Zurich", "postalCode": "8001", "country": "CH", "isDefault": false },
            { "id": 2, "street": "9 Elm St", "city": "amsterdam", "postalCode": "1011", "country": "NL", "isDefault": false },
            { "id": 3, "street": "1 Pine Rd", "city": "Oslo", "postalCode": "0150", "country": "NO", "isDefault": true }
        ])))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", None);

    let ids: Vec<i64> = session
        .addresses()
        .await
        .unwrap()
        .iter()
        .map(|a| a.id.get())
        .collect();
    assert_eq!(ids, [3, 2, 1]);
}

#[tokio::test]
async fn test_create_product_invalidates_cached_pages() {
    let server = MockServer::start().await;

    mount_product_page(&server, "0", page_json(&[1], None), 2).await;
    Mock::given(method("POST"))
        .and(path("/Product"))
        .and(header("Authorization", "Bearer access"))
        .and(body_json(json!({
            "name": "Moss Terrarium",
            "price": 24.5,
            "discount": 10,
            "quantity": 3,
            "tagIds": [],
            "imageUrls": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json(2)))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", None);
    let page_size = PageSize::new(3).unwrap();

    let mut before = storefront.feed(page_size, ProductFilter::default(), CancelSignal::never());
    before.load_initial().await.unwrap();

    let product = NewProduct {
        name: "Moss Terrarium".into(),
        description: None,
        price: "24.50".parse().unwrap(),
        discount: 10,
        quantity: 3,
        category_id: None,
        tag_ids: Vec::new(),
        image_urls: Vec::new(),
    };
    let created = session.create_product(&product).await.unwrap();
    assert_eq!(created.id, ProductId::new(2));
    assert!(storefront.pages().is_empty().await);

    let mut after = storefront.feed(page_size, ProductFilter::default(), CancelSignal::never());
    after.load_initial().await.unwrap();
}

#[tokio::test]
async fn test_admin_delete_forbidden() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/Tag/4"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "Forbidden"
        })))
        .mount(&server)
        .await;

    let storefront = mock_storefront(&server);
    let session = signed_in(&storefront, "access", Some("refresh"));

    let err = session
        .delete_tag(sylvan_core::TagId::new(4))
        .await
        .unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.kind, ApiErrorKind::Forbidden);
            assert_eq!(api.detail.as_deref(), Some("Forbidden"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
