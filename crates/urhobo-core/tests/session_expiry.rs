//! A 401 from any authenticated call ends the persisted session.

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use urhobo_core::api::error::SESSION_EXPIRED_MESSAGE;
use urhobo_core::api::{ApiClient, ApiErrorKind};
use urhobo_core::session::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use urhobo_core::session::{Bootstrap, SessionHandle, SessionStorage};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Writes a signed-in session file and returns its directory.
fn signed_in_home() -> TempDir {
    let dir = TempDir::new().unwrap();
    let user = json!({ "id": "u1", "email": "a@b.com", "firstName": "Ada" }).to_string();
    let scope = json!({
        "accessToken": "access-1",
        "refreshToken": "refresh-1",
        "user": user,
        "email": "pending@b.com"
    });
    fs::write(dir.path().join("session.json"), scope.to_string()).unwrap();
    dir
}

#[tokio::test]
async fn test_unauthorized_clears_persisted_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let session_path = home.path().join("session.json");

    let session = Arc::new(SessionHandle::new(
        SessionStorage::open(&session_path).unwrap(),
    ));
    assert_eq!(session.bootstrap(), Bootstrap::Restored);
    assert!(session.is_authenticated());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/profile"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri(), Arc::clone(&session));
    let err = api.profile().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthorized);

    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(session.access_token().is_none());

    // Reopen from disk: the three session keys went together.
    let reopened = SessionStorage::open(&session_path).unwrap();
    assert!(reopened.session_is_empty());
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(reopened.get(REFRESH_TOKEN_KEY), None);
    assert_eq!(reopened.get(USER_KEY), None);
    assert_eq!(reopened.get("email"), Some("pending@b.com"));
}

#[tokio::test]
async fn test_unauthorized_search_logs_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let session = Arc::new(SessionHandle::new(
        SessionStorage::open(&home.path().join("session.json")).unwrap(),
    ));
    session.bootstrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri(), Arc::clone(&session));
    let err = api.search("ame").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert_eq!(err.message, SESSION_EXPIRED_MESSAGE);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_other_failures_keep_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let session = Arc::new(SessionHandle::new(
        SessionStorage::open(&home.path().join("session.json")).unwrap(),
    ));
    session.bootstrap();

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/me/name"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri(), Arc::clone(&session));
    let err = api.update_name("Ada", "Oghene").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Request);
    assert_eq!(err.message, "Update failed");
    assert!(session.is_authenticated());
    assert_eq!(session.stored(ACCESS_TOKEN_KEY).as_deref(), Some("access-1"));
}
