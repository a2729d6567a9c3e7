use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CartId, DomainError, DomainResult, Entity, LineItemId, ProductId};

/// Line item lifecycle.
///
/// `Removed` preserves row identity for re-add and audit: a later add of the
/// same product reactivates the row instead of inserting a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemStatus {
    Active,
    Removed,
    Purchased,
}

/// One product's presence in a cart.
///
/// Invariant: at most one non-`Removed` line item per (cart, product) pair;
/// quantity is positive while `Active` and zero once `Removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: u32,
    status: LineItemStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LineItem {
    pub fn new(
        id: LineItemId,
        cart_id: CartId,
        product_id: ProductId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self {
            id,
            cart_id,
            product_id,
            quantity,
            status: LineItemStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> LineItemId {
        self.id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn status(&self) -> LineItemStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, LineItemStatus::Active)
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.status, LineItemStatus::Removed)
    }

    /// Re-add a previously removed item: status back to `Active` with a fresh
    /// quantity, same row identity.
    pub fn reactivate(&mut self, quantity: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_removed() {
            return Err(DomainError::conflict("already in the cart"));
        }
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        self.status = LineItemStatus::Active;
        self.quantity = quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Update the quantity in place. Zero is the removal-by-quantity path:
    /// the item transitions to `Removed` with quantity reset to 0.
    pub fn set_quantity(&mut self, quantity: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::not_found("not in cart"));
        }
        if quantity == 0 {
            self.status = LineItemStatus::Removed;
        }
        self.quantity = quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Explicit removal. Fails NotFound for an already-removed item rather
    /// than succeeding silently.
    pub fn remove(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::not_found("not in cart"));
        }
        self.status = LineItemStatus::Removed;
        self.quantity = 0;
        self.updated_at = now;
        Ok(())
    }

    pub fn mark_purchased(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::not_found("not in cart"));
        }
        self.status = LineItemStatus::Purchased;
        self.updated_at = now;
        Ok(())
    }

    /// Compensation path: undo `mark_purchased` after a failed checkout.
    pub fn revert_to_active(&mut self, now: DateTime<Utc>) {
        self.status = LineItemStatus::Active;
        self.updated_at = now;
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
