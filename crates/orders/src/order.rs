use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CartId, Entity, OrderId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
}

/// Immutable snapshot produced by a successful purchase: issued exactly once,
/// never updated. Holds a non-owning reference to the originating cart for
/// historical display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    cart_id: CartId,
    /// Sum of line-item `unit_price × quantity` at purchase time.
    total_price: u64,
    issued_at: DateTime<Utc>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    pub fn issue(
        id: OrderId,
        user_id: UserId,
        cart_id: CartId,
        total_price: u64,
        issued_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            cart_id,
            total_price,
            issued_at,
            status: OrderStatus::Active,
            created_at: now,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
