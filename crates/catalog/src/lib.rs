//! `storefront-catalog` — product catalog domain.
//!
//! Owns the product entity, its lifecycle, and the stock-availability rules
//! the cart and checkout layers consult.

pub mod product;

pub use product::{Product, ProductStatus};
