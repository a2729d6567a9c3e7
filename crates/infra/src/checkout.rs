//! Purchase workflow: convert a user's active cart into a finalized order.
//!
//! The workflow is a small saga. Per-line-item stock decrements run
//! concurrently and are joined before anything is finalized; on partial
//! failure the succeeded items are compensated (stock restored, line items
//! reverted), so stock is never left decremented without a matching order.

use chrono::Utc;
use futures::future::join_all;

use storefront_cart::{CartItemView, CartView};
use storefront_core::{DomainError, DomainResult, OrderId, UserId};
use storefront_orders::Order;

use crate::cart_service::load_cart_view;
use crate::store::{CartStore, OrderStore, ProductStore};

/// Confirmation payload of a successful purchase: the cart snapshot (now in
/// purchased state, carrying the line items/products loaded at workflow
/// start) plus the issued order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PurchaseReceipt {
    pub cart: CartView,
    pub order: Order,
}

/// Checkout orchestrator, generic over the storage backend.
#[derive(Debug)]
pub struct PurchaseWorkflow<S> {
    store: S,
}

impl<S> PurchaseWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> PurchaseWorkflow<S>
where
    S: ProductStore + CartStore + OrderStore,
{
    /// Purchase the user's active cart.
    ///
    /// Fails NotFound("no cart") without an active cart. An empty cart is
    /// accepted and yields a zero-total order. Stock is rechecked here via
    /// the atomic conditional decrement — availability can change between
    /// cart mutation and purchase.
    pub async fn purchase(&self, user_id: UserId) -> DomainResult<PurchaseReceipt> {
        // 1) Load the active cart joined with its active line items.
        let cart = self
            .store
            .find_active_cart(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("no cart"))?;
        let view = load_cart_view(&self.store, cart).await?;

        // Wall clock at workflow start.
        let issued_at = Utc::now();

        // 2) + 3) Per-item decrement + purchase marking, fired concurrently
        // and joined: all independent sub-updates must succeed.
        let results = join_all(view.items.iter().map(|item| self.purchase_item(item))).await;

        if let Some(first_err) = results.iter().find_map(|r| r.as_ref().err()) {
            let err = first_err.clone();
            self.compensate(&view.items, &results).await;
            return Err(err);
        }

        let mut total: u64 = 0;
        let mut purchased_items = Vec::with_capacity(results.len());
        for (result, item) in results.into_iter().zip(view.items) {
            // Barrier passed: every result is Ok here.
            let (line_item, line_total) = result?;
            total += line_total;
            purchased_items.push(CartItemView {
                line_item,
                product: item.product,
            });
        }

        // 4) Mark the cart purchased.
        let now = Utc::now();
        let mut cart = view.cart;
        cart.mark_purchased(now)?;
        self.store.save_cart(cart.clone()).await?;

        // 5) Issue the immutable order record.
        let order = Order::issue(OrderId::new(), user_id, cart.id_typed(), total, issued_at, now);
        self.store.insert_order(order.clone()).await?;

        tracing::info!(
            user_id = %user_id,
            order_id = %order.id_typed(),
            total_price = total,
            items = purchased_items.len(),
            "cart purchased"
        );

        // 6) The purchased cart snapshot is the confirmation payload.
        Ok(PurchaseReceipt {
            cart: CartView {
                cart,
                items: purchased_items,
            },
            order,
        })
    }

    /// One line item's share of the purchase: conditional stock decrement,
    /// then the purchased status transition. If the transition cannot be
    /// persisted after the decrement went through, the decrement is undone
    /// before the error surfaces.
    async fn purchase_item(
        &self,
        item: &CartItemView,
    ) -> DomainResult<(storefront_cart::LineItem, u64)> {
        let product_id = item.line_item.product_id();
        let qty = item.line_item.quantity();

        self.store.try_decrement(product_id, qty).await?;

        let mut line_item = item.line_item.clone();
        let persisted = match line_item.mark_purchased(Utc::now()) {
            Ok(()) => self.store.save_line_item(line_item.clone()).await,
            Err(e) => Err(e),
        };

        if let Err(e) = persisted {
            if let Err(undo) = self.store.restock(product_id, qty).await {
                tracing::warn!(product_id = %product_id, "restock compensation failed: {undo}");
            }
            return Err(e);
        }

        Ok((line_item, item.line_total()))
    }

    /// Roll back the items whose decrement already went through.
    async fn compensate(
        &self,
        items: &[CartItemView],
        results: &[DomainResult<(storefront_cart::LineItem, u64)>],
    ) {
        for (item, result) in items.iter().zip(results) {
            if result.is_err() {
                continue;
            }
            let product_id = item.line_item.product_id();
            let qty = item.line_item.quantity();

            if let Err(e) = self.store.restock(product_id, qty).await {
                tracing::warn!(product_id = %product_id, "restock compensation failed: {e}");
            }
            let mut line_item = item.line_item.clone();
            line_item.revert_to_active(Utc::now());
            if let Err(e) = self.store.save_line_item(line_item).await {
                tracing::warn!(product_id = %product_id, "line item compensation failed: {e}");
            }
        }
    }
}
