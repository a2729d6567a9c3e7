use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CartId, DomainError, DomainResult, Entity, UserId};

/// Cart lifecycle: created lazily on first add, purchased exactly once.
///
/// Invariant: at most one `Active` cart per user at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Active,
    Purchased,
}

/// A user's in-progress cart. Exclusively owns its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    user_id: UserId,
    status: CartStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: CartId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            status: CartStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> CartStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, CartStatus::Active)
    }

    /// Transition to `Purchased`. Only an active cart can be purchased, and
    /// only once.
    pub fn mark_purchased(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::conflict("cart is already purchased"));
        }
        self.status = CartStatus::Purchased;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
