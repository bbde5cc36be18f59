//! Order Handlers
//!
//! Sellers see and advance orders on their own products; buyers see
//! their purchase history. Status changes re-load both the order and
//! its product before the ownership check.

use axum::Json;
use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use auth::application::token::Identity;
use kernel::id::OrderId;

use crate::domain::entities::Order;
use crate::domain::repository::{CatalogRepository, OrderRepository};
use crate::error::{CommerceError, CommerceResult};
use crate::presentation::dto::{OrderResponse, UpdateOrderStatusRequest};
use crate::presentation::products::{CommerceAppState, ensure_can_mutate};

async fn load_order<R>(repo: &R, id: Uuid) -> CommerceResult<Order>
where
    R: OrderRepository,
{
    repo.find_order(OrderId::from_uuid(id))
        .await?
        .ok_or(CommerceError::OrderNotFound)
}

/// GET /api/v1/order/seller
pub async fn seller_orders<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> CommerceResult<Json<Vec<OrderResponse>>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let orders = state.repo.list_by_seller(identity.id).await?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /api/v1/order/mine
pub async fn my_orders<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> CommerceResult<Json<Vec<OrderResponse>>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let orders = state.repo.list_by_buyer(identity.id).await?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /api/v1/order/{id}
///
/// Visible to the buyer, the product's owner, and admins.
pub async fn get_order<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<OrderResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let order = load_order(state.repo.as_ref(), id).await?;

    if identity.id != order.buyer_id && !identity.role.is_admin() {
        let product = state
            .repo
            .find_product(order.product_id)
            .await?
            .ok_or(CommerceError::ProductNotFound)?;
        ensure_can_mutate(&identity, product.owner_id)?;
    }

    Ok(Json(OrderResponse::from(&order)))
}

/// PATCH /api/v1/order/update/status/{id}
///
/// Only the owner of the ordered product (or an admin) may advance the
/// order; the buyer may not.
pub async fn update_order_status<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> CommerceResult<Json<OrderResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let mut order = load_order(state.repo.as_ref(), id).await?;

    let product = state
        .repo
        .find_product(order.product_id)
        .await?
        .ok_or(CommerceError::ProductNotFound)?;
    ensure_can_mutate(&identity, product.owner_id)?;

    order.set_status(req.status)?;
    state.repo.update_status(&order).await?;

    tracing::info!(order_id = %order.order_id, status = ?order.status, "Order status updated");

    Ok(Json(OrderResponse::from(&order)))
}
