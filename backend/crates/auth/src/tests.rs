//! Crate-level tests
//!
//! Exercise the full HTTP surface against an in-memory repository:
//! registration and login flows, the session middleware state machine,
//! and the admin gate.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::application::token::{Identity, TokenService};
use crate::domain::entity::{Account, Profile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Role, UserId};
use crate::error::AuthResult;
use crate::presentation::middleware::SessionGate;
use crate::presentation::router::{
    account_router_generic, admin_router_generic, auth_router_generic,
};

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Account>,
    profiles: Vec<Profile>,
}

#[derive(Clone, Default)]
struct MemoryRepo {
    state: Arc<Mutex<MemoryState>>,
}

impl AccountRepository for MemoryRepo {
    async fn create(&self, account: &Account, profile: &Profile) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.accounts.push(account.clone());
        state.profiles.push(profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .find(|a| a.username.canonical() == identifier || a.email.as_str() == identifier)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AuthResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.iter().any(|a| a.email.as_str() == email))
    }

    async fn exists_by_username(&self, canonical: &str) -> AuthResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .any(|a| a.username.canonical() == canonical))
    }

    async fn find_profile(&self, user_id: UserId) -> AuthResult<Option<Profile>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn update_account(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state
            .accounts
            .iter_mut()
            .find(|a| a.user_id == account.user_id)
        {
            *slot = account.clone();
        }
        Ok(())
    }

    async fn update_profile(&self, profile: &Profile) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            *slot = profile.clone();
        }
        Ok(())
    }

    async fn update_password_hash(&self, account: &Account) -> AuthResult<()> {
        self.update_account(account).await
    }

    async fn delete(&self, user_id: UserId) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.accounts.retain(|a| a.user_id != user_id);
        state.profiles.retain(|p| p.user_id != user_id);
        Ok(())
    }

    async fn list_accounts(&self) -> AuthResult<Vec<(Account, Profile)>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .filter_map(|a| {
                state
                    .profiles
                    .iter()
                    .find(|p| p.user_id == a.user_id)
                    .map(|p| (a.clone(), p.clone()))
            })
            .collect())
    }
}

// ============================================================================
// Test harness
// ============================================================================

struct Harness {
    app: Router,
    gate: SessionGate,
}

fn harness() -> Harness {
    harness_with_config(AuthConfig::with_random_secrets())
}

fn harness_with_config(config: AuthConfig) -> Harness {
    let repo = Arc::new(MemoryRepo::default());
    let gate = SessionGate::from_config(config);

    let app = Router::new()
        .nest("/api/v1/auth", auth_router_generic(repo.clone(), &gate))
        .nest("/api/v1/user", account_router_generic(repo.clone(), &gate))
        .nest("/api/v1/admin", admin_router_generic(repo, &gate));

    Harness { app, gate }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn cookie_request(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull `name=value` out of a Set-Cookie header
fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_string)
}

fn register_body(username: &str, email: &str, role: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "username": username,
        "email": email,
        "password": "secret123",
        "firstName": "Test",
        "lastName": "Person",
    });
    if let Some(role) = role {
        body["role"] = serde_json::json!(role);
    }
    body
}

async fn register(harness: &Harness, username: &str, email: &str, role: Option<&str>) -> String {
    let response = harness
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            register_body(username, email, role),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie_pair(&response).expect("register should set a session cookie")
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn register_defaults_to_user_role_and_signs_in() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            register_body("alice", "alice@example.com", None),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie_pair(&response).unwrap();
    assert!(cookie.starts_with("x-auth-token="));

    let body = body_json(response).await;
    assert_eq!(body["role"], "USER");
    assert_eq!(body["username"], "alice");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn register_duplicate_email_rejected() {
    let h = harness();
    register(&h, "alice", "alice@example.com", None).await;

    let response = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            register_body("alice2", "alice@example.com", None),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_embeds_requested_role() {
    let h = harness();
    let cookie = register(&h, "seller", "seller@example.com", Some("SELLER")).await;

    // The role in the token drives authorization; the admin gate must
    // refuse a seller outright.
    let response = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/admin/accounts", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_with_username_or_email() {
    let h = harness();
    register(&h, "alice", "alice@example.com", None).await;

    for identifier in ["alice", "alice@example.com", "ALICE"] {
        let response = h
            .app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/login",
                serde_json::json!({ "identifier": identifier, "password": "secret123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "identifier {identifier}");
        assert!(session_cookie_pair(&response).is_some());
    }
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let h = harness();
    register(&h, "alice", "alice@example.com", None).await;

    let wrong_password = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            serde_json::json!({ "identifier": "alice", "password": "wrongpass1" }),
        ))
        .await
        .unwrap();

    let unknown_user = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            serde_json::json!({ "identifier": "nobody", "password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    // Identical bodies: no existence signal
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_user).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn logout_clears_cookie_unconditionally() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("x-auth-token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

// ============================================================================
// Session middleware state machine
// ============================================================================

#[tokio::test]
async fn protected_route_without_cookie_is_plain_401() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/user/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // No cookie presented, nothing to clear
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn valid_session_reaches_profile() {
    let h = harness();
    let cookie = register(&h, "alice", "alice@example.com", None).await;

    let response = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/user/profile", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn tampered_cookie_is_401_with_clearing_cookie() {
    let h = harness();
    let cookie = register(&h, "alice", "alice@example.com", None).await;
    let tampered = format!("{}x", cookie);

    let response = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/user/profile", &tampered))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn expired_token_is_401_with_clearing_cookie() {
    let config = AuthConfig::with_random_secrets();
    let cookie_secret = config.cookie_secret;
    let token_secret = config.token_secret.clone().unwrap();
    let h = harness_with_config(config);

    // Same secret, TTL in the past
    let expired_issuer = TokenService::new(Some(&token_secret), -60);
    let token = expired_issuer
        .issue(Identity::new(UserId::new(), Role::User))
        .unwrap();
    let sealed = platform::cookie::sign_value(&token, &cookie_secret);
    let cookie = format!("x-auth-token={sealed}");

    let response = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/user/profile", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn token_signed_with_other_secret_rejected() {
    let config = AuthConfig::with_random_secrets();
    let cookie_secret = config.cookie_secret;
    let h = harness_with_config(config);

    // Correctly sealed envelope around a token from a different deployment
    let foreign = TokenService::new(Some(b"other-secret-other-secret-other!"), 3600);
    let token = foreign
        .issue(Identity::new(UserId::new(), Role::Admin))
        .unwrap();
    let sealed = platform::cookie::sign_value(&token, &cookie_secret);
    let cookie = format!("x-auth-token={sealed}");

    let response = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/admin/accounts", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_secret_reports_server_error() {
    let mut config = AuthConfig::with_random_secrets();
    config.token_secret = None;
    let h = harness_with_config(config);

    // Login cannot issue a token
    let register_response = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            register_body("alice", "alice@example.com", None),
        ))
        .await
        .unwrap();
    assert_eq!(
        register_response.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    // And the middleware cannot verify one
    let sealed = platform::cookie::sign_value("some.token.here", &h.gate.config.cookie_secret);
    let response = h
        .app
        .clone()
        .oneshot(cookie_request(
            "GET",
            "/api/v1/user/profile",
            &format!("x-auth-token={sealed}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Admin gate
// ============================================================================

#[tokio::test]
async fn admin_route_requires_admin_role() {
    let h = harness();
    let user_cookie = register(&h, "alice", "alice@example.com", None).await;
    let admin_cookie = register(&h, "boss", "boss@example.com", Some("ADMIN")).await;

    let refused = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/admin/accounts", &user_cookie))
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let allowed = h
        .app
        .clone()
        .oneshot(cookie_request(
            "GET",
            "/api/v1/admin/accounts",
            &admin_cookie,
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let body = body_json(allowed).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_route_without_cookie_is_401_not_403() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Account management
// ============================================================================

#[tokio::test]
async fn password_change_requires_current_password() {
    let h = harness();
    let cookie = register(&h, "alice", "alice@example.com", None).await;

    let wrong = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/user/password")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "currentPassword": "not-the-password",
                        "newPassword": "newsecret1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);

    let right = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/user/password")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "currentPassword": "secret123",
                        "newPassword": "newsecret1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(right.status(), StatusCode::OK);

    // Old password no longer works
    let old_login = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            serde_json::json!({ "identifier": "alice", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(old_login.status(), StatusCode::BAD_REQUEST);

    let new_login = h
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            serde_json::json!({ "identifier": "alice", "password": "newsecret1" }),
        ))
        .await
        .unwrap();
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_update_changes_fields() {
    let h = harness();
    let cookie = register(&h, "alice", "alice@example.com", None).await;

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/user/profile")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "firstName": "Alicia" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["firstName"], "Alicia");
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn delete_account_clears_cookie_and_invalidates_nothing_else() {
    let h = harness();
    let cookie = register(&h, "alice", "alice@example.com", None).await;

    let response = h
        .app
        .clone()
        .oneshot(cookie_request("DELETE", "/api/v1/user/delete", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // Stateless token still verifies, but the account is gone
    let profile = h
        .app
        .clone()
        .oneshot(cookie_request("GET", "/api/v1/user/profile", &cookie))
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::NOT_FOUND);
}
