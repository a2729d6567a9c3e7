//! Infrastructure layer: storage boundary + application services.

pub mod cart_service;
pub mod checkout;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use cart_service::CartService;
pub use checkout::PurchaseWorkflow;
pub use store::{CartStore, InMemoryStore, OrderStore, ProductStore};
