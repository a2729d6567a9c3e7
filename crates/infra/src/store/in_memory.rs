use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use storefront_cart::{Cart, LineItem};
use storefront_catalog::Product;
use storefront_core::{CartId, DomainError, DomainResult, LineItemId, OrderId, ProductId, UserId};
use storefront_orders::Order;

use super::{CartStore, OrderStore, ProductStore};

/// In-memory commerce store.
///
/// Intended for tests/dev. Not optimized for performance. Rows are never
/// hard-deleted; status transitions are persisted in place and reads filter
/// by status at each call site.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    carts: RwLock<HashMap<CartId, Cart>>,
    line_items: RwLock<HashMap<LineItemId, LineItem>>,
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::storage("lock poisoned")
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert_product(&self, product: Product) -> DomainResult<()> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.insert(product.id_typed(), product);
        Ok(())
    }

    async fn get_active_product(&self, product_id: ProductId) -> DomainResult<Product> {
        let products = self.products.read().map_err(|_| poisoned())?;
        products
            .get(&product_id)
            .filter(|p| p.is_active())
            .cloned()
            .ok_or_else(|| DomainError::not_found("product not found"))
    }

    async fn list_active_products(&self) -> DomainResult<Vec<Product>> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let mut active: Vec<Product> = products.values().filter(|p| p.is_active()).cloned().collect();
        active.sort_by_key(|p| p.created_at());
        Ok(active)
    }

    async fn save_product(&self, product: Product) -> DomainResult<()> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.insert(product.id_typed(), product);
        Ok(())
    }

    async fn check_availability(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let product = products
            .get(&product_id)
            .filter(|p| p.is_active())
            .ok_or_else(|| DomainError::not_found("product not found"))?;
        product.ensure_available(qty)?;
        Ok(product.clone())
    }

    async fn try_decrement(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        // Read-check-write under a single write lock: the in-memory
        // equivalent of `UPDATE .. SET qty = qty - ? WHERE qty >= ?`.
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let product = products
            .get_mut(&product_id)
            .filter(|p| p.is_active())
            .ok_or_else(|| DomainError::not_found("product not found"))?;
        product.decrement(qty, Utc::now())?;
        Ok(product.clone())
    }

    async fn restock(&self, product_id: ProductId, qty: u32) -> DomainResult<Product> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let product = products
            .get_mut(&product_id)
            .filter(|p| p.is_active())
            .ok_or_else(|| DomainError::not_found("product not found"))?;
        product.restock(qty, Utc::now());
        Ok(product.clone())
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn find_active_cart(&self, user_id: UserId) -> DomainResult<Option<Cart>> {
        let carts = self.carts.read().map_err(|_| poisoned())?;
        Ok(carts
            .values()
            .find(|c| c.user_id() == user_id && c.is_active())
            .cloned())
    }

    async fn insert_cart(&self, cart: Cart) -> DomainResult<()> {
        let mut carts = self.carts.write().map_err(|_| poisoned())?;
        // One active cart per user, checked under the write lock.
        if carts
            .values()
            .any(|c| c.user_id() == cart.user_id() && c.is_active())
        {
            return Err(DomainError::conflict("user already has an active cart"));
        }
        carts.insert(cart.id_typed(), cart);
        Ok(())
    }

    async fn save_cart(&self, cart: Cart) -> DomainResult<()> {
        let mut carts = self.carts.write().map_err(|_| poisoned())?;
        carts.insert(cart.id_typed(), cart);
        Ok(())
    }

    async fn find_line_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> DomainResult<Option<LineItem>> {
        let line_items = self.line_items.read().map_err(|_| poisoned())?;
        Ok(line_items
            .values()
            .find(|li| li.cart_id() == cart_id && li.product_id() == product_id)
            .cloned())
    }

    async fn save_line_item(&self, line_item: LineItem) -> DomainResult<()> {
        let mut line_items = self.line_items.write().map_err(|_| poisoned())?;
        line_items.insert(line_item.id_typed(), line_item);
        Ok(())
    }

    async fn active_line_items(&self, cart_id: CartId) -> DomainResult<Vec<LineItem>> {
        let line_items = self.line_items.read().map_err(|_| poisoned())?;
        let mut active: Vec<LineItem> = line_items
            .values()
            .filter(|li| li.cart_id() == cart_id && li.is_active())
            .cloned()
            .collect();
        active.sort_by_key(LineItem::created_at);
        Ok(active)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: Order) -> DomainResult<()> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.insert(order.id_typed(), order);
        Ok(())
    }

    async fn find_order(&self, order_id: OrderId) -> DomainResult<Option<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&order_id).cloned())
    }

    async fn orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut own: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        own.sort_by_key(Order::issued_at);
        Ok(own)
    }

    async fn all_orders(&self) -> DomainResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by_key(Order::issued_at);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product::create(ProductId::new(), "B-1", "Widget", 100, stock, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn try_decrement_rejects_oversell_and_leaves_stock_unchanged() {
        let store = InMemoryStore::new();
        let p = product(2);
        let id = p.id_typed();
        store.insert_product(p).await.unwrap();

        let err = store.try_decrement(id, 3).await.unwrap_err();
        assert_eq!(err, DomainError::insufficient(2));
        assert_eq!(store.get_active_product(id).await.unwrap().quantity_available(), 2);
    }

    #[tokio::test]
    async fn deleted_products_are_invisible_to_active_reads() {
        let store = InMemoryStore::new();
        let mut p = product(5);
        let id = p.id_typed();
        store.insert_product(p.clone()).await.unwrap();

        p.mark_deleted(Utc::now()).unwrap();
        store.save_product(p).await.unwrap();

        assert!(matches!(
            store.get_active_product(id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(store.list_active_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_active_cart_for_same_user_is_rejected() {
        let store = InMemoryStore::new();
        let user = UserId::new();
        let now = Utc::now();

        store.insert_cart(Cart::new(CartId::new(), user, now)).await.unwrap();
        let err = store
            .insert_cart(Cart::new(CartId::new(), user, now))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
