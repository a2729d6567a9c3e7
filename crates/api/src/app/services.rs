use std::sync::Arc;

use storefront_infra::store::InMemoryStore;
use storefront_infra::{CartService, PurchaseWorkflow};

/// Wired application services shared across handlers.
///
/// The store is shared behind one `Arc` so the cart service, the checkout
/// workflow, and direct catalog/order reads all observe the same state.
pub struct AppServices {
    pub store: Arc<InMemoryStore>,
    pub carts: CartService<Arc<InMemoryStore>>,
    pub checkout: PurchaseWorkflow<Arc<InMemoryStore>>,
}

pub fn build_services() -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    let carts = CartService::new(store.clone());
    let checkout = PurchaseWorkflow::new(store.clone());
    AppServices {
        store,
        carts,
        checkout,
    }
}
