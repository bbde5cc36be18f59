//! Commerce Entities

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Product listing
///
/// `original_price` is fixed at creation; `price` moves when a discount
/// is applied or removed.
#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: ProductId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: f64,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        owner_id: UserId,
        name: String,
        description: Option<String>,
        price: f64,
        category_id: Option<CategoryId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            product_id: ProductId::new(),
            owner_id,
            name,
            description,
            price,
            original_price: price,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a percentage discount against the original price
    pub fn apply_discount(&mut self, percentage: f64) -> Result<(), CommerceError> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(CommerceError::Validation(
                "Discount percentage must be between 0 and 100".to_string(),
            ));
        }
        self.price = self.original_price * (1.0 - percentage / 100.0);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove any discount, restoring the original price
    pub fn remove_discount(&mut self) {
        self.price = self.original_price;
        self.updated_at = Utc::now();
    }

    pub fn has_discount(&self) -> bool {
        self.price < self.original_price
    }
}

/// Product category
#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            category_id: CategoryId::new(),
            name,
        }
    }
}

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_code(&self) -> i16 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Paid => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, CommerceError> {
        match code {
            0 => Ok(OrderStatus::Pending),
            1 => Ok(OrderStatus::Paid),
            2 => Ok(OrderStatus::Shipped),
            3 => Ok(OrderStatus::Delivered),
            4 => Ok(OrderStatus::Cancelled),
            _ => Err(CommerceError::Internal(format!(
                "Unknown order status code: {code}"
            ))),
        }
    }

    /// Delivered and cancelled orders accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Order for a single product
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn set_status(&mut self, status: OrderStatus) -> Result<(), CommerceError> {
        if self.status.is_terminal() {
            return Err(CommerceError::Validation(format!(
                "Order is already {:?} and cannot change status",
                self.status
            )));
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(UserId::new(), "Widget".to_string(), None, 100.0, None)
    }

    #[test]
    fn test_discount_math() {
        let mut p = product();
        p.apply_discount(25.0).unwrap();
        assert!((p.price - 75.0).abs() < f64::EPSILON);
        assert!((p.original_price - 100.0).abs() < f64::EPSILON);
        assert!(p.has_discount());

        p.remove_discount();
        assert!((p.price - 100.0).abs() < f64::EPSILON);
        assert!(!p.has_discount());
    }

    #[test]
    fn test_discount_is_against_original_price() {
        let mut p = product();
        p.apply_discount(50.0).unwrap();
        p.apply_discount(10.0).unwrap();
        // 10% off the original, not off the already-discounted price
        assert!((p.price - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_discount_range_validated() {
        let mut p = product();
        assert!(p.apply_discount(-1.0).is_err());
        assert!(p.apply_discount(101.0).is_err());
        assert!(p.apply_discount(100.0).is_ok());
    }

    #[test]
    fn test_terminal_order_rejects_transitions() {
        let now = Utc::now();
        let mut order = Order {
            order_id: OrderId::new(),
            product_id: ProductId::new(),
            buyer_id: UserId::new(),
            status: OrderStatus::Delivered,
            created_at: now,
            updated_at: now,
        };
        assert!(order.set_status(OrderStatus::Pending).is_err());
    }

    #[test]
    fn test_status_code_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_code(status.as_code()).unwrap(), status);
        }
    }
}
