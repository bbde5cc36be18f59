//! Session Middleware
//!
//! Gatekeeping for protected routes. Verification order is fixed:
//! 1. cookie present
//! 2. envelope signature (cookie secret)
//! 3. token signature and expiry (token secret)
//!
//! A missing cookie is a plain 401. A cookie that fails either signature
//! check gets a 401 *and* a clearing Set-Cookie, so a broken or expired
//! session does not keep knocking. A missing token secret is the server's
//! fault and reports 500 without touching the cookie.
//!
//! On success the caller's [`Identity`] is inserted into request
//! extensions; handlers never re-parse the token.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use kernel::error::app_error::AppError;
use platform::cookie::{delete_cookie_header, extract_cookie, verify_value};

use crate::application::config::AuthConfig;
use crate::application::token::{Identity, TokenError, TokenService};

/// Shared state for the session middleware
///
/// Holds only the config and the token service; the gate never touches
/// the repository.
#[derive(Clone)]
pub struct SessionGate {
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl SessionGate {
    pub fn new(config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self { config, tokens }
    }

    /// Build the gate (and its token service) from a config
    pub fn from_config(config: AuthConfig) -> Self {
        let tokens = TokenService::new(config.token_secret.as_deref(), config.token_ttl_secs);
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }

    /// Run the verification chain against request headers
    fn authenticate(&self, req: &Request<Body>) -> Result<Identity, Response> {
        let Some(sealed) = extract_cookie(req.headers(), &self.config.cookie.name) else {
            return Err(self.unauthorized(false));
        };

        let token = match verify_value(&sealed, &self.config.cookie_secret) {
            Ok(token) => token,
            Err(_) => return Err(self.unauthorized(true)),
        };

        match self.tokens.verify(&token) {
            Ok(identity) => Ok(identity),
            Err(TokenError::MissingSecret) => {
                tracing::error!("Session check failed: token secret not configured");
                Err(AppError::internal("Server configuration error").into_response())
            }
            Err(_) => Err(self.unauthorized(true)),
        }
    }

    fn unauthorized(&self, clear_cookie: bool) -> Response {
        let mut response = AppError::unauthorized("Invalid session token")
            .with_action("Please sign in again")
            .into_response();
        if clear_cookie {
            response
                .headers_mut()
                .insert(header::SET_COOKIE, delete_cookie_header(&self.config.cookie));
        }
        response
    }
}

/// Middleware requiring a valid session
pub async fn require_session(
    gate: SessionGate,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let identity = gate.authenticate(&req)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Middleware requiring a valid session with the admin role
pub async fn require_admin_session(
    gate: SessionGate,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let identity = gate.authenticate(&req)?;

    if !identity.role.is_admin() {
        tracing::warn!(user_id = %identity.id, role = %identity.role, "Admin route refused");
        return Err(AppError::forbidden("Admin access required").into_response());
    }

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
