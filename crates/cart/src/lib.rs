//! `storefront-cart` — cart aggregate domain.
//!
//! The cart and its line items are status machines: nothing is hard-deleted,
//! so every read must filter by status explicitly.

pub mod cart;
pub mod line_item;
pub mod view;

pub use cart::{Cart, CartStatus};
pub use line_item::{LineItem, LineItemStatus};
pub use view::{CartItemView, CartView};
