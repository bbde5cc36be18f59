pub mod entities;
pub mod repository;

pub use entities::{Category, Order, OrderStatus, Product};
pub use repository::{CatalogRepository, OrderRepository, ProductFilter};
