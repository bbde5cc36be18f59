//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, OrderId, ProductId, UserId};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{Category, Order, OrderStatus, Product};
use crate::domain::repository::{CatalogRepository, OrderRepository, ProductFilter};
use crate::error::CommerceResult;

/// PostgreSQL-backed commerce repository
#[derive(Clone)]
pub struct PgCommerceRepository {
    pool: PgPool,
}

impl PgCommerceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = r#"
    product_id,
    owner_id,
    name,
    description,
    price,
    original_price,
    category_id,
    created_at,
    updated_at
"#;

impl CatalogRepository for PgCommerceRepository {
    async fn create_product(&self, product: &Product) -> CommerceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id,
                owner_id,
                name,
                description,
                price,
                original_price,
                category_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.owner_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_product(&self, product_id: ProductId) -> CommerceResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn list_products(&self, filter: &ProductFilter) -> CommerceResult<Vec<Product>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
        ));

        if let Some(name) = &filter.name {
            builder.push(" AND name ILIKE ");
            builder.push_bind(format!("%{name}%"));
        }
        if let Some(min) = filter.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min);
        }
        if let Some(max) = filter.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max);
        }

        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(filter.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(filter.offset() as i64);

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> CommerceResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn update_product(&self, product: &Product) -> CommerceResult<()> {
        sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                description = $3,
                price = $4,
                category_id = $5,
                updated_at = $6
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category_id.as_ref().map(|id| *id.as_uuid()))
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_product(&self, product_id: ProductId) -> CommerceResult<()> {
        sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_category(&self, category_id: CategoryId) -> CommerceResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, name FROM categories WHERE category_id = $1",
        )
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn find_category_by_name(&self, name: &str) -> CommerceResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, name FROM categories WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn create_category(&self, category: &Category) -> CommerceResult<()> {
        sqlx::query("INSERT INTO categories (category_id, name) VALUES ($1, $2)")
            .bind(category.category_id.as_uuid())
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

impl OrderRepository for PgCommerceRepository {
    async fn find_order(&self, order_id: OrderId) -> CommerceResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, product_id, buyer_id, status, created_at, updated_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list_by_seller(&self, seller_id: UserId) -> CommerceResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.order_id, o.product_id, o.buyer_id, o.status, o.created_at, o.updated_at
            FROM orders o
            JOIN products p ON p.product_id = o.product_id
            WHERE p.owner_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(seller_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn list_by_buyer(&self, buyer_id: UserId) -> CommerceResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, product_id, buyer_id, status, created_at, updated_at
            FROM orders
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(buyer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn update_status(&self, order: &Order) -> CommerceResult<()> {
        sqlx::query(
            r#"
            UPDATE orders SET
                status = $2,
                updated_at = $3
            WHERE order_id = $1
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.status.as_code())
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    price: f64,
    original_price: f64,
    category_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: ProductId::from_uuid(self.product_id),
            owner_id: UserId::from_uuid(self.owner_id),
            name: self.name,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            category_id: self.category_id.map(CategoryId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    product_id: Uuid,
    buyer_id: Uuid,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> CommerceResult<Order> {
        Ok(Order {
            order_id: OrderId::from_uuid(self.order_id),
            product_id: ProductId::from_uuid(self.product_id),
            buyer_id: UserId::from_uuid(self.buyer_id),
            status: OrderStatus::from_code(self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
