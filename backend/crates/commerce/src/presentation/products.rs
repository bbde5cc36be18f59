//! Product Handlers
//!
//! All routes sit behind `require_session`, so an [`Identity`] is always
//! present in request extensions. Mutation re-loads the product and
//! checks ownership there; nothing trusts IDs from the request body.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use auth::application::token::Identity;
use kernel::id::{CategoryId, ProductId, UserId};

use crate::domain::entities::{Category, Product};
use crate::domain::repository::{CatalogRepository, OrderRepository};
use crate::error::{CommerceError, CommerceResult};
use crate::presentation::dto::{
    AddProductRequest, DiscountRequest, MessageResponse, ProductQuery, ProductResponse,
    UpdateProductRequest,
};

/// Shared state for commerce handlers
#[derive(Clone)]
pub struct CommerceAppState<R>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// Owner-or-admin rule for mutating a resource
///
/// A seller who does not own the resource is refused; the role alone
/// grants nothing.
pub(crate) fn ensure_can_mutate(identity: &Identity, owner_id: UserId) -> CommerceResult<()> {
    if identity.role.is_admin() || identity.id == owner_id {
        Ok(())
    } else {
        Err(CommerceError::NotOwner)
    }
}

async fn load_product<R>(repo: &R, id: Uuid) -> CommerceResult<Product>
where
    R: CatalogRepository,
{
    repo.find_product(ProductId::from_uuid(id))
        .await?
        .ok_or(CommerceError::ProductNotFound)
}

// ============================================================================
// Queries
// ============================================================================

/// GET /api/v1/product
pub async fn list_products<R>(
    State(state): State<CommerceAppState<R>>,
    Query(query): Query<ProductQuery>,
) -> CommerceResult<Json<Vec<ProductResponse>>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let products = state.repo.list_products(&query.into_filter()).await?;

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/v1/product/my-products
pub async fn my_products<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> CommerceResult<Json<Vec<ProductResponse>>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let products = state.repo.list_by_owner(identity.id).await?;

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/v1/product/{id}
pub async fn get_product<R>(
    State(state): State<CommerceAppState<R>>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<ProductResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let product = load_product(state.repo.as_ref(), id).await?;

    Ok(Json(ProductResponse::from(&product)))
}

// ============================================================================
// Mutations
// ============================================================================

/// POST /api/v1/product/add
///
/// Listing a product requires the seller role (admins may too).
pub async fn add_product<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AddProductRequest>,
) -> CommerceResult<impl IntoResponse>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    if !identity.role.is_seller() && !identity.role.is_admin() {
        return Err(CommerceError::SellerOnly);
    }

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(CommerceError::Validation(
            "Product name cannot be empty".to_string(),
        ));
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(CommerceError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }

    let category_id = resolve_category(state.repo.as_ref(), req.category_id, req.category).await?;

    let product = Product::new(identity.id, name, req.description, req.price, category_id);
    state.repo.create_product(&product).await?;

    tracing::info!(product_id = %product.product_id, owner_id = %identity.id, "Product listed");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// Resolve a category reference: by ID, by name (creating on miss), or none
async fn resolve_category<R>(
    repo: &R,
    category_id: Option<Uuid>,
    category_name: Option<String>,
) -> CommerceResult<Option<CategoryId>>
where
    R: CatalogRepository,
{
    if let Some(id) = category_id {
        let id = CategoryId::from_uuid(id);
        repo.find_category(id)
            .await?
            .ok_or(CommerceError::CategoryNotFound)?;
        return Ok(Some(id));
    }

    let Some(name) = category_name else {
        return Ok(None);
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Ok(None);
    }

    if let Some(existing) = repo.find_category_by_name(&name).await? {
        return Ok(Some(existing.category_id));
    }

    let category = Category::new(name);
    repo.create_category(&category).await?;
    Ok(Some(category.category_id))
}

/// PATCH /api/v1/product/update/{id}
pub async fn update_product<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> CommerceResult<Json<ProductResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let mut product = load_product(state.repo.as_ref(), id).await?;
    ensure_can_mutate(&identity, product.owner_id)?;

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CommerceError::Validation(
                "Product name cannot be empty".to_string(),
            ));
        }
        product.name = name;
    }
    if let Some(description) = req.description {
        product.description = Some(description);
    }
    if let Some(price) = req.price {
        if !price.is_finite() || price < 0.0 {
            return Err(CommerceError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }
        // A manual price change resets the discount baseline
        product.price = price;
        product.original_price = price;
    }
    if let Some(category_id) = req.category_id {
        let category_id = CategoryId::from_uuid(category_id);
        state
            .repo
            .find_category(category_id)
            .await?
            .ok_or(CommerceError::CategoryNotFound)?;
        product.category_id = Some(category_id);
    }
    product.updated_at = chrono::Utc::now();

    state.repo.update_product(&product).await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// PATCH /api/v1/product/discount/{id}
pub async fn add_discount<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<DiscountRequest>,
) -> CommerceResult<Json<ProductResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let mut product = load_product(state.repo.as_ref(), id).await?;
    ensure_can_mutate(&identity, product.owner_id)?;

    product.apply_discount(req.percentage)?;
    state.repo.update_product(&product).await?;

    tracing::info!(
        product_id = %product.product_id,
        percentage = req.percentage,
        "Discount applied"
    );

    Ok(Json(ProductResponse::from(&product)))
}

/// PATCH /api/v1/product/delete/discount/{id}
pub async fn remove_discount<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<ProductResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let mut product = load_product(state.repo.as_ref(), id).await?;
    ensure_can_mutate(&identity, product.owner_id)?;

    product.remove_discount();
    state.repo.update_product(&product).await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /api/v1/product/delete/{id}
pub async fn delete_product<R>(
    State(state): State<CommerceAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<MessageResponse>>
where
    R: CatalogRepository + OrderRepository + Clone + Send + Sync + 'static,
{
    let product = load_product(state.repo.as_ref(), id).await?;
    ensure_can_mutate(&identity, product.owner_id)?;

    state.repo.delete_product(product.product_id).await?;

    tracing::info!(product_id = %product.product_id, "Product deleted");

    Ok(Json(MessageResponse::new("Product deleted")))
}
