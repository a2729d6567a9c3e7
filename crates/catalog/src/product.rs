use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

/// Product lifecycle status.
///
/// Deletion is a status transition, never a row removal; every query must
/// filter on `Active` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Deleted,
}

/// Catalog product. Stock (`quantity_available`) is the single source of
/// truth for availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    batch_number: String,
    name: String,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
    quantity_available: u32,
    status: ProductStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(
        id: ProductId,
        batch_number: impl Into<String>,
        name: impl Into<String>,
        unit_price: u64,
        quantity_available: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if unit_price == 0 {
            return Err(DomainError::validation("unit_price must be positive"));
        }

        Ok(Self {
            id,
            batch_number: batch_number.into(),
            name,
            unit_price,
            quantity_available,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn batch_number(&self) -> &str {
        &self.batch_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn quantity_available(&self) -> u32 {
        self.quantity_available
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ProductStatus::Active)
    }

    /// Availability check: `requested` must not exceed live stock.
    ///
    /// The error reports the exact quantity available at check time.
    pub fn ensure_available(&self, requested: u32) -> DomainResult<()> {
        if requested == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if requested > self.quantity_available {
            return Err(DomainError::insufficient(self.quantity_available));
        }
        Ok(())
    }

    /// Reduce stock by `qty`. Stock cannot go negative; callers recheck at
    /// decrement time, not only at add-to-cart time.
    pub fn decrement(&mut self, qty: u32, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_available(qty)?;
        self.quantity_available -= qty;
        self.updated_at = now;
        Ok(())
    }

    pub fn restock(&mut self, qty: u32, now: DateTime<Utc>) {
        self.quantity_available = self.quantity_available.saturating_add(qty);
        self.updated_at = now;
    }

    /// Admin update of the mutable attributes. `None` leaves a field as-is.
    pub fn update(
        &mut self,
        name: Option<String>,
        unit_price: Option<u64>,
        batch_number: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(price) = unit_price {
            if price == 0 {
                return Err(DomainError::validation("unit_price must be positive"));
            }
            self.unit_price = price;
        }
        if let Some(batch) = batch_number {
            self.batch_number = batch;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::not_found("product not found"));
        }
        self.status = ProductStatus::Deleted;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(stock: u32) -> Product {
        Product::create(ProductId::new(), "B-100", "Widget", 250, stock, Utc::now()).unwrap()
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Product::create(ProductId::new(), "B-1", "  ", 100, 5, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_zero_price() {
        let err = Product::create(ProductId::new(), "B-1", "Widget", 0, 5, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn availability_reports_exact_stock() {
        let p = product(3);
        assert_eq!(p.ensure_available(4), Err(DomainError::insufficient(3)));
        assert_eq!(p.ensure_available(3), Ok(()));
    }

    #[test]
    fn decrement_reduces_stock_and_guards_oversell() {
        let mut p = product(5);
        p.decrement(3, Utc::now()).unwrap();
        assert_eq!(p.quantity_available(), 2);
        assert_eq!(p.decrement(3, Utc::now()), Err(DomainError::insufficient(2)));
        assert_eq!(p.quantity_available(), 2);
    }

    #[test]
    fn deleted_product_is_not_active() {
        let mut p = product(5);
        p.mark_deleted(Utc::now()).unwrap();
        assert!(!p.is_active());
        assert!(matches!(
            p.mark_deleted(Utc::now()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn update_leaves_unset_fields_alone() {
        let mut p = product(5);
        p.update(None, Some(999), None, Utc::now()).unwrap();
        assert_eq!(p.unit_price(), 999);
        assert_eq!(p.name(), "Widget");
        assert_eq!(p.batch_number(), "B-100");
    }

    proptest! {
        #[test]
        fn over_requesting_always_reports_available(stock in 0u32..1000, extra in 1u32..1000) {
            let p = product(stock);
            prop_assert_eq!(
                p.ensure_available(stock + extra),
                Err(DomainError::insufficient(stock))
            );
        }

        #[test]
        fn decrement_never_oversells(stock in 1u32..1000, qty in 1u32..2000) {
            let mut p = product(stock);
            let before = p.quantity_available();
            match p.decrement(qty, Utc::now()) {
                Ok(()) => prop_assert_eq!(p.quantity_available(), before - qty),
                Err(_) => prop_assert_eq!(p.quantity_available(), before),
            }
        }
    }
}
