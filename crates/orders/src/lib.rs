//! `storefront-orders` — order history domain.

pub mod order;

pub use order::{Order, OrderStatus};
