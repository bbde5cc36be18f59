//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, routers
//!
//! ## Features
//! - Registration / login with username-or-email identifier
//! - Stateless sessions: signed 1-hour identity token, no server-side state
//! - Signed cookie transport (`x-auth-token`) with a secret independent
//!   of the token-signing secret
//! - Role-based access (User, Seller, Admin) plus admin-only gatekeeping
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Login failures never reveal whether the identifier exists
//! - Cookie envelope signature checked before the token is parsed
//! - Any token verification failure actively clears the cookie

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::{Identity, TokenError, TokenService};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::middleware::SessionGate;
pub use presentation::router::{account_router, admin_router, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
