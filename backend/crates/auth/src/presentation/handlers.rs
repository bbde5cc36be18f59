//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::application::account::{AccountUseCase, UpdateProfileInput};
use crate::application::config::AuthConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::token::{Identity, TokenService};
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, UpdateProfileRequest,
    UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

/// Issue a token for the identity and wrap it into a Set-Cookie value
fn session_cookie(
    config: &AuthConfig,
    tokens: &TokenService,
    identity: Identity,
) -> AuthResult<String> {
    let token = tokens.issue(identity)?;
    let sealed = platform::cookie::sign_value(&token, &config.cookie_secret);
    Ok(config.cookie.build_set_cookie(&sealed))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    let (account, profile) = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
        })
        .await?;

    // Fresh accounts are signed in immediately
    let identity = Identity::new(account.user_id, profile.role);
    let cookie = session_cookie(&state.config, &state.tokens, identity)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from_parts(&account, &profile)),
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /api/v1/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone());

    let (account, profile) = use_case
        .execute(LoginInput {
            identifier: req.identifier,
            password: req.password,
        })
        .await?;

    let identity = Identity::new(account.user_id, profile.role);
    let cookie = session_cookie(&state.config, &state.tokens, identity)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from_parts(&account, &profile)),
    ))
}

/// POST /api/v1/auth/logout
///
/// Stateless sessions have nothing to revoke server-side; logging out is
/// clearing the cookie, and it succeeds whether or not one was presented.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.cookie.build_delete_cookie();

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    )
}

// ============================================================================
// Account (session-protected)
// ============================================================================

/// GET /api/v1/user/profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<Json<UserResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = AccountUseCase::new(state.repo.clone());
    let (account, profile) = use_case.get(identity.id).await?;

    Ok(Json(UserResponse::from_parts(&account, &profile)))
}

/// PATCH /api/v1/user/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = AccountUseCase::new(state.repo.clone());

    let (account, profile) = use_case
        .update(
            identity.id,
            UpdateProfileInput {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(Json(UserResponse::from_parts(&account, &profile)))
}

/// PATCH /api/v1/user/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = AccountUseCase::new(state.repo.clone());
    use_case
        .change_password(identity.id, req.current_password, req.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}

/// DELETE /api/v1/user/delete
pub async fn delete_account<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = AccountUseCase::new(state.repo.clone());
    use_case.delete(identity.id).await?;

    // The session cookie is now orphaned; clear it alongside
    let cookie = state.config.cookie.build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Account deleted")),
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/v1/admin/accounts
pub async fn list_accounts<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = AccountUseCase::new(state.repo.clone());
    let accounts = use_case.list().await?;

    Ok(Json(
        accounts
            .iter()
            .map(|(account, profile)| UserResponse::from_parts(account, profile))
            .collect(),
    ))
}
