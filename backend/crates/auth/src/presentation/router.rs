//! Auth Routers
//!
//! Three surfaces:
//! - `auth_router`: public register/login/logout
//! - `account_router`: the caller's own account, behind `require_session`
//! - `admin_router`: account listing, behind `require_admin_session`

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::domain::repository::AccountRepository;
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{SessionGate, require_admin_session, require_session};

fn app_state<R>(repo: Arc<R>, gate: &SessionGate) -> AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    AuthAppState {
        repo,
        config: gate.config.clone(),
        tokens: gate.tokens.clone(),
    }
}

/// Create the public auth router with the PostgreSQL repository
pub fn auth_router(repo: PgAccountRepository, gate: &SessionGate) -> Router {
    auth_router_generic(Arc::new(repo), gate)
}

/// Create the account router with the PostgreSQL repository
pub fn account_router(repo: PgAccountRepository, gate: &SessionGate) -> Router {
    account_router_generic(Arc::new(repo), gate)
}

/// Create the admin router with the PostgreSQL repository
pub fn admin_router(repo: PgAccountRepository, gate: &SessionGate) -> Router {
    admin_router_generic(Arc::new(repo), gate)
}

/// Create a generic public auth router for any repository implementation
pub fn auth_router_generic<R>(repo: Arc<R>, gate: &SessionGate) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .with_state(app_state(repo, gate))
}

/// Create a generic account router, gated by `require_session`
pub fn account_router_generic<R>(repo: Arc<R>, gate: &SessionGate) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let session_gate = gate.clone();

    Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R>).patch(handlers::update_profile::<R>),
        )
        .route("/password", patch(handlers::change_password::<R>))
        .route("/delete", delete(handlers::delete_account::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            require_session(session_gate.clone(), req, next)
        }))
        .with_state(app_state(repo, gate))
}

/// Create a generic admin router, gated by `require_admin_session`
pub fn admin_router_generic<R>(repo: Arc<R>, gate: &SessionGate) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let session_gate = gate.clone();

    Router::new()
        .route("/accounts", get(handlers::list_accounts::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            require_admin_session(session_gate.clone(), req, next)
        }))
        .with_state(app_state(repo, gate))
}
