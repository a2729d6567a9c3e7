//! Storage boundary for the commerce state.
//!
//! The traits here make **no storage assumptions**: the bundled in-memory
//! implementation backs tests/dev, and a SQL backend can slot in behind the
//! same seams. Soft-deleted rows stay in storage; every read filters by
//! status explicitly, so the "active" predicate is visible at each call site.

pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;

use storefront_cart::{Cart, LineItem};
use storefront_catalog::Product;
use storefront_core::{CartId, DomainResult, OrderId, ProductId, UserId};
use storefront_orders::Order;

/// Product persistence + the inventory ledger contract.
///
/// `quantity_available` is the single source of truth for availability.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: Product) -> DomainResult<()>;

    /// Fetch an **active** product; soft-deleted rows are invisible here.
    async fn get_active_product(&self, product_id: ProductId) -> DomainResult<Product>;

    async fn list_active_products(&self) -> DomainResult<Vec<Product>>;

    /// Persist an updated product row (admin updates, soft delete).
    async fn save_product(&self, product: Product) -> DomainResult<()>;

    /// Availability check: fails NotFound for a missing/deleted product and
    /// Insufficient (reporting the exact quantity available) when `qty`
    /// exceeds live stock.
    async fn check_availability(&self, product_id: ProductId, qty: u32) -> DomainResult<Product>;

    /// Atomic conditional decrement: "reduce stock by `qty` where
    /// `quantity_available >= qty`", in one step. The no-op case is an
    /// Insufficient error, never a silent partial update. This is what closes
    /// the read-modify-write over-sell race.
    async fn try_decrement(&self, product_id: ProductId, qty: u32) -> DomainResult<Product>;

    /// Put stock back (admin restock and checkout compensation).
    async fn restock(&self, product_id: ProductId, qty: u32) -> DomainResult<Product>;
}

/// Cart + line-item persistence.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The user's single active cart, if any.
    async fn find_active_cart(&self, user_id: UserId) -> DomainResult<Option<Cart>>;

    async fn insert_cart(&self, cart: Cart) -> DomainResult<()>;

    async fn save_cart(&self, cart: Cart) -> DomainResult<()>;

    /// The one row for this (cart, product) pair, in **any** status — a
    /// Removed row is returned too, so callers can reactivate it.
    async fn find_line_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> DomainResult<Option<LineItem>>;

    /// Insert-or-update by line-item id.
    async fn save_line_item(&self, line_item: LineItem) -> DomainResult<()>;

    async fn active_line_items(&self, cart_id: CartId) -> DomainResult<Vec<LineItem>>;
}

/// Order persistence (append-only: orders are never updated).
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> DomainResult<()>;

    async fn find_order(&self, order_id: OrderId) -> DomainResult<Option<Order>>;

    async fn orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>>;

    async fn all_orders(&self) -> DomainResult<Vec<Order>>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert_product(&self, product: Product) -> DomainResult<()> {
        (**self).insert_product(product).await
    }

    async fn get_active_product(&self, product_id: ProductId) -> DomainResult<Product> {
        (**self).get_active_product(product_id).await
    }

    async fn list_active_products(&self) -> DomainResult<Vec<Product>> {
        (**self).list_active_products().await
    }

    async fn save_product(&self, product: Product) -> DomainResult<()> {
        (**self).save_product(product).await
    }

    async fn check_availability(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        (**self).check_availability(product_id, qty).await
    }

    async fn try_decrement(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        (**self).try_decrement(product_id, qty).await
    }

    async fn restock(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        (**self).restock(product_id, qty).await
    }
}

#[async_trait]
impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    async fn find_active_cart(&self, user_id: UserId) -> DomainResult<Option<Cart>> {
        (**self).find_active_cart(user_id).await
    }

    async fn insert_cart(&self, cart: Cart) -> DomainResult<()> {
        (**self).insert_cart(cart).await
    }

    async fn save_cart(&self, cart: Cart) -> DomainResult<()> {
        (**self).save_cart(cart).await
    }

    async fn find_line_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> DomainResult<Option<LineItem>> {
        (**self).find_line_item(cart_id, product_id).await
    }

    async fn save_line_item(&self, line_item: LineItem) -> DomainResult<()> {
        (**self).save_line_item(line_item).await
    }

    async fn active_line_items(&self, cart_id: CartId) -> DomainResult<Vec<LineItem>> {
        (**self).active_line_items(cart_id).await
    }
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn insert_order(&self, order: Order) -> DomainResult<()> {
        (**self).insert_order(order).await
    }

    async fn find_order(&self, order_id: OrderId) -> DomainResult<Option<Order>> {
        (**self).find_order(order_id).await
    }

    async fn orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        (**self).orders_for_user(user_id).await
    }

    async fn all_orders(&self) -> DomainResult<Vec<Order>> {
        (**self).all_orders().await
    }
}

pub use in_memory::InMemoryStore;
