//! Commerce Backend Module
//!
//! Products and orders behind the session middleware. Every route
//! requires a valid session; mutation additionally requires ownership
//! of the touched resource or the admin role, checked against a fresh
//! load of the resource rather than anything client-supplied.
//!
//! - `domain/` - Entities and repository traits
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - DTOs, handlers, routers

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{CommerceError, CommerceResult};
pub use infra::postgres::PgCommerceRepository;
pub use presentation::router::{order_router, product_router};
