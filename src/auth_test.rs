use super::*;
use crate::config::PanelConfig;
use crate::storage::{ACCESS_TOKEN_KEY, MemoryStorage, REFRESH_TOKEN_KEY, SessionStorage, USER_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller_for(server: &MockServer, storage: Arc<MemoryStorage>) -> AuthController {
    let session = Arc::new(SessionStore::new(storage));
    session.hydrate();
    let client = ApiClient::builder(PanelConfig::new(&server.uri()).unwrap(), session)
        .build()
        .unwrap();
    AuthController::new(client)
}

async fn mount_verify(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_json(json!({
            "phoneNumber": "09123456789",
            "otpCode": "123456",
            "userType": "jeweler",
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// verify_and_login
// =============================================================================

#[tokio::test]
async fn login_stores_tokens_and_principal() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A1",
            "refreshToken": "R1",
            "user": { "id": 7, "phoneNumber": "09123456789" },
            "isNewUser": false,
        })),
    )
    .await;

    let storage = Arc::new(MemoryStorage::new());
    let auth = controller_for(&server, storage.clone());
    let response = auth.verify_and_login("09123456789", "123456").await.unwrap();

    assert_eq!(response.access_token, "A1");
    assert_eq!(response.flags.get("isNewUser"), Some(&json!(false)));

    let session = auth.session();
    assert!(session.is_authenticated());
    assert!(!session.is_loading);
    assert_eq!(session.access_token.as_deref(), Some("A1"));
    assert_eq!(session.refresh_token.as_deref(), Some("R1"));
    assert_eq!(session.principal, Some(json!({ "id": 7, "phoneNumber": "09123456789" })));

    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
    let stored: Value = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored["id"], 7);
}

#[tokio::test]
async fn login_falls_back_to_jeweler_principal() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A1",
            "refreshToken": "R1",
            "jeweler": { "id": "j1", "storeName": "Gold House" },
        })),
    )
    .await;

    let auth = controller_for(&server, Arc::new(MemoryStorage::new()));
    auth.verify_and_login("09123456789", "123456").await.unwrap();

    assert_eq!(auth.session().principal.unwrap()["storeName"], "Gold House");
}

#[tokio::test]
async fn rejected_otp_leaves_session_untouched() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid OTP", "statusCode": 401 })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([
        (ACCESS_TOKEN_KEY, "OLD"),
        (REFRESH_TOKEN_KEY, "R"),
        (USER_KEY, r#"{"id":1}"#),
    ]));
    let auth = controller_for(&server, storage.clone());
    let before = auth.session();

    let err = auth.verify_and_login("09123456789", "123456").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message(), Some("Invalid OTP"));
    assert_eq!(auth.session(), before);
    assert!(!auth.session().is_loading);
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("OLD"));
}

#[tokio::test]
async fn missing_principal_is_reported() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "A1", "refreshToken": "R1" })),
    )
    .await;

    let storage = Arc::new(MemoryStorage::new());
    let auth = controller_for(&server, storage.clone());
    let err = auth.verify_and_login("09123456789", "123456").await.unwrap_err();

    assert!(matches!(err, ApiError::MissingField("user")));
    assert!(!auth.session().is_authenticated());
    assert!(!auth.session().is_loading);
    assert!(storage.entries().is_empty());
}

#[tokio::test]
async fn missing_access_token_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })),
    )
    .await;

    let auth = controller_for(&server, Arc::new(MemoryStorage::new()));
    let err = auth.verify_and_login("09123456789", "123456").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!auth.session().is_loading);
}

// =============================================================================
// request_otp / logout / update_principal
// =============================================================================

#[tokio::test]
async fn request_otp_propagates_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send-otp"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "message": "Too many requests", "statusCode": 429 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = controller_for(&server, Arc::new(MemoryStorage::new()));
    let err = auth.request_otp("09123456789").await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert!(!auth.session().is_loading);
}

#[tokio::test]
async fn logout_clears_session_and_storage() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([
        (ACCESS_TOKEN_KEY, "A"),
        (REFRESH_TOKEN_KEY, "R"),
        (USER_KEY, r#"{"id":1}"#),
    ]));
    let auth = controller_for(&server, storage.clone());
    assert!(auth.session().is_authenticated());

    auth.logout();

    assert!(!auth.session().is_authenticated());
    assert!(storage.entries().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_principal_keeps_tokens() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([
        (ACCESS_TOKEN_KEY, "A"),
        (REFRESH_TOKEN_KEY, "R"),
        (USER_KEY, r#"{"id":1}"#),
    ]));
    let auth = controller_for(&server, storage.clone());

    auth.update_principal(json!({ "id": 1, "storeName": "New" })).unwrap();

    let session = auth.session();
    assert_eq!(session.access_token.as_deref(), Some("A"));
    assert_eq!(session.principal.unwrap()["storeName"], "New");
    assert!(storage.get(USER_KEY).unwrap().contains("New"));
}

#[test]
fn principal_prefers_user_over_jeweler() {
    let response: VerifyOtpResponse = serde_json::from_value(json!({
        "accessToken": "A",
        "user": { "kind": "user" },
        "jeweler": { "kind": "jeweler" },
    }))
    .unwrap();
    assert_eq!(response.principal(), Some(&json!({ "kind": "user" })));
    assert!(response.refresh_token.is_none());
}

#[test]
fn null_user_falls_back_to_jeweler() {
    let response: VerifyOtpResponse = serde_json::from_value(json!({
        "accessToken": "A",
        "user": null,
        "jeweler": { "kind": "jeweler" },
    }))
    .unwrap();
    assert_eq!(response.principal(), Some(&json!({ "kind": "jeweler" })));
}
