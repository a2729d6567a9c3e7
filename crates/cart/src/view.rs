use serde::Serialize;

use storefront_catalog::Product;

use crate::{Cart, LineItem};

/// A line item joined with its product details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub line_item: LineItem,
    pub product: Product,
}

impl CartItemView {
    /// `unit_price × quantity` for this line.
    pub fn line_total(&self) -> u64 {
        self.product.unit_price() * u64::from(self.line_item.quantity())
    }
}

/// The cart joined with its line items — the read shape returned by
/// `GET /cart` and by a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<CartItemView>,
}

impl CartView {
    pub fn total_price(&self) -> u64 {
        self.items.iter().map(CartItemView::line_total).sum()
    }
}
