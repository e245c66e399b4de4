#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end session lifecycle against a mock backend: login persists the
//! pair, a later process picks it up, and the session only dies on an
//! explicit authorization rejection, never on a transport failure.

use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;
use tempfile::TempDir;
use voyageview::api::ApiClient;
use voyageview::features::auth::{self, AuthGateway, SessionState, TokenStore};
use voyageview::features::posts;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn gateway(base: &str, dir: &TempDir) -> AuthGateway {
    let api = ApiClient::new(base)
        .expect("client")
        .with_retry_base(Duration::from_millis(1));
    let store = TokenStore::new(dir.path().join("tokens.json"));
    AuthGateway::new(api, store)
}

#[tokio::test]
async fn login_survives_a_restart() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login/"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1",
            "refresh": "R1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile": {"id": 1, "username": "alice", "location": "Lisbon"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");

    // First run: credentials to tokens to a confirmed session.
    {
        let gw = gateway(&server.uri(), &dir);
        gw.initialize().await;
        assert_eq!(gw.snapshot().state, SessionState::Unauthenticated);

        let password = secrecy::SecretString::from("secret".to_string());
        let tokens = auth::client::login(gw.api(), "alice", &password)
            .await
            .expect("tokens");
        gw.login(&tokens.access, &tokens.refresh).await.expect("login");
        assert!(gw.is_authenticated());
    }

    // Second run: the stored pair alone restores the session.
    let gw = gateway(&server.uri(), &dir);
    gw.initialize().await;

    let session = gw.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.user.expect("user").username, "alice");
}

#[tokio::test]
async fn rejected_token_ends_the_session_for_good() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile": {"username": "alice"}
        })))
        .mount(&server)
        .await;

    // The backend revokes the token between profile confirmation and the
    // next protected call.
    Mock::given(method("GET"))
        .and(path("/blog/posts/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "token revoked"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let gw = gateway(&server.uri(), &dir);
    gw.initialize().await;
    gw.login("A1", "R1").await.expect("login");

    let err = posts::client::list(&gw).await.expect_err("error");
    assert!(err.is_auth());

    // Session and store are both gone; the next run starts signed out.
    assert!(!gw.is_authenticated());
    let gw2 = gateway(&server.uri(), &dir);
    gw2.initialize().await;
    assert!(gw2.snapshot().tokens.is_none());
}

#[tokio::test]
async fn unreachable_backend_keeps_the_stored_pair() {
    let dir = TempDir::new().expect("tempdir");
    TokenStore::new(dir.path().join("tokens.json"))
        .save(&auth::TokenPair {
            access: "A1".to_string(),
            refresh: "R1".to_string(),
        })
        .expect("seed");

    // Nothing listens on port 1; resolution fails at the transport layer.
    let gw = gateway("http://127.0.0.1:1", &dir);
    gw.initialize().await;

    let session = gw.snapshot();
    assert_eq!(session.state, SessionState::Unauthenticated);
    assert!(session.tokens.is_some());
    assert!(TokenStore::new(dir.path().join("tokens.json"))
        .load()
        .is_some());
}

#[tokio::test]
async fn logout_notifies_backend_then_clears_locally() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile": {"username": "alice"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .and(body_json(json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let gw = gateway(&server.uri(), &dir);
    gw.initialize().await;
    gw.login("A1", "R1").await.expect("login");

    let tokens = gw.snapshot().tokens.expect("tokens");
    auth::client::notify_logout(gw.api(), &tokens.access, &tokens.refresh)
        .await
        .expect("notify");
    gw.logout();

    assert!(!gw.is_authenticated());
    assert!(TokenStore::new(dir.path().join("tokens.json"))
        .load()
        .is_none());
}
