//! Commerce Repository Traits

use kernel::id::{CategoryId, OrderId, ProductId, UserId};

use crate::domain::entities::{Category, Order, Product};
use crate::error::CommerceResult;

/// Default page size for product listings
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Maximum page size a client may request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Product listing filter with pagination
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// 1-based page number
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        // page and limit are client-supplied; the product must not overflow
        let page = self.page.unwrap_or(1).max(1);
        (page - 1).saturating_mul(self.limit())
    }
}

/// Repository interface for products and categories
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    async fn create_product(&self, product: &Product) -> CommerceResult<()>;

    async fn find_product(&self, product_id: ProductId) -> CommerceResult<Option<Product>>;

    async fn list_products(&self, filter: &ProductFilter) -> CommerceResult<Vec<Product>>;

    async fn list_by_owner(&self, owner_id: UserId) -> CommerceResult<Vec<Product>>;

    async fn update_product(&self, product: &Product) -> CommerceResult<()>;

    async fn delete_product(&self, product_id: ProductId) -> CommerceResult<()>;

    async fn find_category(&self, category_id: CategoryId) -> CommerceResult<Option<Category>>;

    async fn find_category_by_name(&self, name: &str) -> CommerceResult<Option<Category>>;

    async fn create_category(&self, category: &Category) -> CommerceResult<()>;
}

/// Repository interface for orders
///
/// Orders are created by an external checkout flow; this service reads
/// and advances them.
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    async fn find_order(&self, order_id: OrderId) -> CommerceResult<Option<Order>>;

    /// Orders placed against any product the seller owns
    async fn list_by_seller(&self, seller_id: UserId) -> CommerceResult<Vec<Order>>;

    /// The caller's own purchase history
    async fn list_by_buyer(&self, buyer_id: UserId) -> CommerceResult<Vec<Order>>;

    async fn update_status(&self, order: &Order) -> CommerceResult<()>;
}
