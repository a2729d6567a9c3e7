//! Cart aggregate operations (application-level orchestration).
//!
//! Every mutation consults the inventory ledger before touching the cart.
//! The per-user state machine is: no-cart → active → purchased; once a cart
//! is purchased, the next add lazily creates a fresh active cart.
//!
//! This module contains no IO itself; it composes the store traits.

use chrono::Utc;

use storefront_cart::{Cart, CartItemView, CartView, LineItem};
use storefront_core::{CartId, DomainError, DomainResult, LineItemId, ProductId, UserId};

use crate::store::{CartStore, ProductStore};

/// Cart mutation/read service, generic over the storage backend.
#[derive(Debug)]
pub struct CartService<S> {
    store: S,
}

impl<S> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> CartService<S>
where
    S: ProductStore + CartStore,
{
    /// Put `qty` of a product into the user's active cart.
    ///
    /// - fails NotFound if no active product matches;
    /// - fails Insufficient if `qty` exceeds live stock;
    /// - fails Conflict if the product is already in the cart (active item);
    /// - reactivates a previously removed line item instead of duplicating it.
    pub async fn add_line_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        qty: u32,
    ) -> DomainResult<CartItemView> {
        let product = self.store.check_availability(product_id, qty).await?;
        let now = Utc::now();

        // Lazily create the active cart on first add.
        let cart = match self.store.find_active_cart(user_id).await? {
            Some(cart) => cart,
            None => {
                let cart = Cart::new(CartId::new(), user_id, now);
                self.store.insert_cart(cart.clone()).await?;
                cart
            }
        };

        let line_item = match self.store.find_line_item(cart.id_typed(), product_id).await? {
            Some(existing) if existing.is_active() => {
                return Err(DomainError::conflict("already in the cart"));
            }
            Some(mut removed) => {
                // Same row identity, fresh quantity.
                removed.reactivate(qty, now)?;
                self.store.save_line_item(removed.clone()).await?;
                removed
            }
            None => {
                let line_item = LineItem::new(LineItemId::new(), cart.id_typed(), product_id, qty, now)?;
                self.store.save_line_item(line_item.clone()).await?;
                line_item
            }
        };

        Ok(CartItemView { line_item, product })
    }

    /// Set the quantity of an item already in the cart.
    ///
    /// Zero is the removal-by-quantity path: the line item transitions to
    /// removed. Any positive quantity is re-validated against live stock.
    pub async fn update_line_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        qty: u32,
    ) -> DomainResult<()> {
        let cart = self
            .store
            .find_active_cart(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("no cart"))?;

        let mut line_item = self
            .store
            .find_line_item(cart.id_typed(), product_id)
            .await?
            .filter(LineItem::is_active)
            .ok_or_else(|| DomainError::not_found("not in cart"))?;

        if qty > 0 {
            self.store.check_availability(product_id, qty).await?;
        }

        line_item.set_quantity(qty, Utc::now())?;
        self.store.save_line_item(line_item).await
    }

    /// Remove an item from the cart (status transition, not a row delete).
    ///
    /// Fails NotFound for a missing or already-removed item.
    pub async fn remove_line_item(&self, user_id: UserId, product_id: ProductId) -> DomainResult<()> {
        let cart = self
            .store
            .find_active_cart(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("no cart"))?;

        let mut line_item = self
            .store
            .find_line_item(cart.id_typed(), product_id)
            .await?
            .filter(LineItem::is_active)
            .ok_or_else(|| DomainError::not_found("not in cart"))?;

        line_item.remove(Utc::now())?;
        self.store.save_line_item(line_item).await
    }

    /// The user's active cart joined with its active line items and their
    /// product details.
    pub async fn get_cart(&self, user_id: UserId) -> DomainResult<CartView> {
        let cart = self
            .store
            .find_active_cart(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("no cart"))?;

        load_cart_view(&self.store, cart).await
    }
}

/// Join a cart with its active line items and products.
pub(crate) async fn load_cart_view<S>(store: &S, cart: Cart) -> DomainResult<CartView>
where
    S: ProductStore + CartStore,
{
    let line_items = store.active_line_items(cart.id_typed()).await?;

    let mut items = Vec::with_capacity(line_items.len());
    for line_item in line_items {
        let product = store.get_active_product(line_item.product_id()).await?;
        items.push(CartItemView { line_item, product });
    }

    Ok(CartView { cart, items })
}
