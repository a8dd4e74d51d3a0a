//! End-to-end session tests against a mock backend: real HTTP service
//! implementations, real credential file, mock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ecosort_core::api::HttpAuthService;
use ecosort_core::session::FileCredentialStore;
use ecosort_core::{
    CredentialStore, EcosortError, NotificationCenter, RegistrationForm, SessionStore,
};

fn store_against(server: &MockServer, dir: &tempfile::TempDir) -> SessionStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let auth = Arc::new(HttpAuthService::new(&server.uri()).unwrap());
    let credentials =
        Arc::new(FileCredentialStore::new(dir.path().join("credentials.json")).unwrap());
    SessionStore::new(auth, credentials, NotificationCenter::new())
}

fn profile_body() -> serde_json::Value {
    json!({
        "_id": "u1",
        "fullName": "Ada Lovelace",
        "email": "ada@example.com"
    })
}

#[tokio::test]
async fn login_then_fresh_bootstrap_stays_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-live" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth"))
        .and(header("x-auth-token", "tok-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);
    store.bootstrap().await.unwrap();

    let response = store.login("ada@example.com", "Str0ng!pass").await.unwrap();
    assert_eq!(response.token, "tok-live");

    let snapshot = store.snapshot().await;
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.user.unwrap().full_name, "Ada Lovelace");

    // A later launch reads the persisted token and resolves the user again.
    let relaunched = store_against(&server, &dir);
    relaunched.bootstrap().await.unwrap();
    assert!(relaunched.snapshot().await.is_authenticated);
}

#[tokio::test]
async fn rejected_login_surfaces_the_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "msg": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);
    store.bootstrap().await.unwrap();

    let err = store.login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(
        err,
        EcosortError::LoginFailed {
            message: "Invalid credentials".to_string()
        }
    );
    assert!(!store.snapshot().await.is_authenticated);
}

#[tokio::test]
async fn login_error_without_body_uses_the_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);

    let err = store.login("ada@example.com", "pw").await.unwrap_err();
    assert_eq!(
        err,
        EcosortError::LoginFailed {
            message: "Login failed".to_string()
        }
    );
}

#[tokio::test]
async fn stale_token_is_cleared_without_any_toast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth"))
        .and(header("x-auth-token", "tok-stale"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "msg": "Token is not valid" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials =
        Arc::new(FileCredentialStore::new(dir.path().join("credentials.json")).unwrap());
    credentials.set("tok-stale").unwrap();
    let auth = Arc::new(HttpAuthService::new(&server.uri()).unwrap());
    let notifier = NotificationCenter::new();
    let store = SessionStore::new(auth, credentials.clone(), notifier.clone());

    store.bootstrap().await.unwrap();

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert!(!snapshot.is_authenticated);
    assert_eq!(credentials.get().unwrap(), None);
    assert_eq!(notifier.current().await, None);
}

#[tokio::test]
async fn bootstrap_without_token_never_calls_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);
    store.bootstrap().await.unwrap();

    assert!(!store.snapshot().await.loading);
}

#[tokio::test]
async fn registration_posts_the_camel_case_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_partial_json(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "msg": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);

    let form = RegistrationForm {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        confirm_password: "Str0ng!pass".to_string(),
    };
    store.register(&form).await.unwrap();
}

#[tokio::test]
async fn registration_surfaces_per_field_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [
                { "msg": "Email already in use" },
                { "msg": "Password too common" }
            ]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store_against(&server, &dir);

    let form = RegistrationForm {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        confirm_password: "Str0ng!pass".to_string(),
    };
    let err = store.register(&form).await.unwrap_err();
    assert_eq!(
        err,
        EcosortError::RegistrationFailed {
            errors: vec![
                "Email already in use".to_string(),
                "Password too common".to_string()
            ]
        }
    );
}
