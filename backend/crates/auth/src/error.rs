//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Credential failures (unknown identifier, wrong password) collapse into
//! the single `InvalidCredentials` variant so the response never signals
//! which part was wrong.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or policy-violating input
    #[error("{0}")]
    Validation(String),

    /// Email address already registered
    #[error("Email already in use")]
    EmailInUse,

    /// Username already registered
    #[error("Username already in use")]
    UsernameInUse,

    /// Unknown identifier or wrong password (uniform, no enumeration)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, tampered or expired session token
    #[error("Invalid session token")]
    SessionInvalid,

    /// Account record missing
    #[error("Account not found")]
    AccountNotFound,

    /// Signing secret is not configured (server misconfiguration)
    #[error("Token signing secret is not configured")]
    MissingSecret,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    ///
    /// Credential flows report 400 by contract; the middleware produces
    /// its own 401/403 responses for protected-route failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::EmailInUse
            | AuthError::UsernameInUse
            | AuthError::InvalidCredentials => ErrorKind::BadRequest,
            AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::MissingSecret | AuthError::Internal(_) => ErrorKind::InternalServerError,
            AuthError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::MissingSecret => {
                tracing::error!("Token signing secret is not configured");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionInvalid => {
                tracing::debug!("Session token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => AuthError::MissingSecret,
            TokenError::InvalidSignature | TokenError::Expired | TokenError::Malformed => {
                AuthError::SessionInvalid
            }
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}
