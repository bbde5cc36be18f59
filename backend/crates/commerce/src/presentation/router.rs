//! Commerce Routers
//!
//! Both routers are fully gated by `require_session`; role and ownership
//! checks happen in the handlers against fresh loads.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use auth::presentation::middleware::{SessionGate, require_session};

use crate::domain::repository::{CatalogRepository, OrderRepository};
use crate::infra::postgres::PgCommerceRepository;
use crate::presentation::orders;
use crate::presentation::products::{self, CommerceAppState};

/// Create the product router with the PostgreSQL repository
pub fn product_router(repo: PgCommerceRepository, gate: &SessionGate) -> Router {
    product_router_generic(Arc::new(repo), gate)
}

/// Create the order router with the PostgreSQL repository
pub fn order_router(repo: PgCommerceRepository, gate: &SessionGate) -> Router {
    order_router_generic(Arc::new(repo), gate)
}

/// Create a generic product router for any repository implementation
pub fn product_router_generic<R>(repo: Arc<R>, gate: &SessionGate) -> Router
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let session_gate = gate.clone();

    Router::new()
        .route("/", get(products::list_products::<R>))
        .route("/my-products", get(products::my_products::<R>))
        .route("/{id}", get(products::get_product::<R>))
        .route("/add", post(products::add_product::<R>))
        .route("/update/{id}", patch(products::update_product::<R>))
        .route("/discount/{id}", patch(products::add_discount::<R>))
        .route(
            "/delete/discount/{id}",
            patch(products::remove_discount::<R>),
        )
        .route("/delete/{id}", delete(products::delete_product::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            require_session(session_gate.clone(), req, next)
        }))
        .with_state(CommerceAppState { repo })
}

/// Create a generic order router for any repository implementation
pub fn order_router_generic<R>(repo: Arc<R>, gate: &SessionGate) -> Router
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let session_gate = gate.clone();

    Router::new()
        .route("/seller", get(orders::seller_orders::<R>))
        .route("/mine", get(orders::my_orders::<R>))
        .route("/{id}", get(orders::get_order::<R>))
        .route("/update/status/{id}", patch(orders::update_order_status::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            require_session(session_gate.clone(), req, next)
        }))
        .with_state(CommerceAppState { repo })
}
