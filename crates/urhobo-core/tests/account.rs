//! Sign-in, profile and word of the day against a mock backend.

use std::sync::Arc;

use serde_json::json;
use urhobo_core::account::{self, SignUp};
use urhobo_core::api::ApiClient;
use urhobo_core::session::{SessionHandle, SessionStorage};
use urhobo_core::validation::OtpInput;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn api_for(server: &MockServer) -> ApiClient {
    let session = Arc::new(SessionHandle::new(SessionStorage::in_memory()));
    ApiClient::new(server.uri(), session)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "user": { "id": "u1", "email": "a@b.com", "firstName": "Ada", "lastName": "Oghene" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_in_authenticates_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_login(&server).await;

    let api = api_for(&server);
    let user = account::sign_in(&api, " a@b.com ", "secret123").await.unwrap();
    assert_eq!(user.display_name(), "Ada Oghene");

    let session = api.session();
    assert!(session.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some("access-1"));
    assert_eq!(session.stored("refreshToken").as_deref(), Some("refresh-1"));
    session.read(|state| {
        assert!(!state.auth.submission_started);
        assert!(state.auth.error.is_none());
        assert_eq!(state.auth.email, "a@b.com");
    });
}

#[tokio::test]
async fn test_sign_in_failure_records_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = account::sign_in(&api, "a@b.com", "wrong").await.unwrap_err();
    assert_eq!(err.message(), "Invalid credentials");
    assert!(!api.session().is_authenticated());
    api.session().read(|state| {
        assert!(!state.auth.submission_started);
        assert_eq!(state.auth.error.as_deref(), Some("Invalid credentials"));
    });
}

#[tokio::test]
async fn test_log_out_clears_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_login(&server).await;

    let api = api_for(&server);
    account::sign_in(&api, "a@b.com", "secret123").await.unwrap();
    assert_eq!(account::log_out(api.session()), account::LOGGED_OUT_MESSAGE);
    assert!(!api.session().is_authenticated());
    assert!(api.session().current_user().is_none());
    assert!(api.session().stored("accessToken").is_none());
}

#[tokio::test]
async fn test_sign_up_then_verify_uses_remembered_email() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "firstName": "Ada",
            "lastName": "Oghene",
            "username": "ada",
            "email": "a@b.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_json(json!({ "otp": "123456", "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Verified" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let form = SignUp {
        first_name: "Ada".to_string(),
        last_name: "Oghene".to_string(),
        username: "ada".to_string(),
        email: "a@b.com".to_string(),
        password: "secret123".to_string(),
    };
    let message = account::sign_up(&api, &form).await.unwrap();
    assert_eq!(message, "Verification email sent");
    assert_eq!(api.session().pending_email().as_deref(), Some("a@b.com"));

    let otp = OtpInput::from_code("123456").unwrap();
    let message = account::verify_signup_otp(&api, &otp).await.unwrap();
    assert_eq!(message, "Verified");
}

#[tokio::test]
async fn test_update_name_splits_and_persists_user() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("PUT"))
        .and(path("/users/me/name"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({ "firstName": "Ada", "lastName": "Mary Oghene" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "a@b.com",
            "firstName": "Ada",
            "lastName": "Mary Oghene"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    account::sign_in(&api, "a@b.com", "secret123").await.unwrap();
    let user = account::update_name(&api, "  Ada   Mary  Oghene ").await.unwrap();
    assert_eq!(user.last_name, "Mary Oghene");

    let stored = api.session().stored("user").unwrap();
    assert!(stored.contains("Mary Oghene"));
}

#[tokio::test]
async fn test_blank_name_is_rejected_locally() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/me/name"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = account::update_name(&api, "   ").await.unwrap_err();
    assert_eq!(err.message(), "Please enter a new name");
}

#[tokio::test]
async fn test_word_of_day_fills_photo_defaults() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word-of-day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "word_of_day": {
                "word": "Ame",
                "meaning": "Water",
                "photo": { "url": "" }
            }
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let word = account::word_of_day(&api).await.unwrap();
    assert_eq!(word.word, "Ame");
    let photo = word.photo.unwrap();
    assert_eq!(photo.url, "/images/dish.svg");
    assert_eq!(photo.kind, "photo");
}

#[tokio::test]
async fn test_word_of_day_failure_stores_fallback_and_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word-of-day"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(account::word_of_day(&api).await.is_err());
    api.session().read(|state| {
        assert_eq!(state.word.word_of_day, Some(account::fallback_word()));
        assert_eq!(state.word.error.as_deref(), Some("Failed to fetch word of day"));
        assert!(!state.word.is_loading);
    });
}
