//! Commerce Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Commerce-specific result type alias
pub type CommerceResult<T> = Result<T, CommerceError>;

/// Commerce-specific error variants
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Product does not exist
    #[error("Product not found")]
    ProductNotFound,

    /// Order does not exist
    #[error("Order not found")]
    OrderNotFound,

    /// Category does not exist
    #[error("Category not found")]
    CategoryNotFound,

    /// Caller is neither the owner nor an admin
    #[error("You do not have permission to modify this resource")]
    NotOwner,

    /// Caller's role does not permit the operation
    #[error("Seller role required")]
    SellerOnly,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommerceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::Validation(_) => ErrorKind::BadRequest,
            CommerceError::ProductNotFound
            | CommerceError::OrderNotFound
            | CommerceError::CategoryNotFound => ErrorKind::NotFound,
            CommerceError::NotOwner | CommerceError::SellerOnly => ErrorKind::Forbidden,
            CommerceError::Database(_) | CommerceError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            CommerceError::Database(e) => {
                tracing::error!(error = %e, "Commerce database error");
            }
            CommerceError::Internal(msg) => {
                tracing::error!(message = %msg, "Commerce internal error");
            }
            CommerceError::NotOwner | CommerceError::SellerOnly => {
                tracing::warn!(error = %self, "Commerce authorization refused");
            }
            _ => {
                tracing::debug!(error = %self, "Commerce error");
            }
        }
    }
}

impl IntoResponse for CommerceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CommerceError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                CommerceError::Validation(err.message().to_string())
            }
            _ => CommerceError::Internal(err.to_string()),
        }
    }
}
