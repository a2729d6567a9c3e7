//! Integration tests for the cart + checkout pipeline against the in-memory
//! store.
//!
//! Verifies:
//! - cart mutations validate against live inventory and leave state untouched
//!   on failure
//! - line-item row identity survives remove/re-add
//! - a purchase decrements stock, finalizes statuses, and issues one order
//! - partial purchase failures are compensated (no stock leak)
//! - concurrent purchases cannot over-sell

use std::sync::Arc;

use chrono::Utc;

use storefront_cart::{CartStatus, LineItemStatus};
use storefront_catalog::Product;
use storefront_core::{DomainError, ProductId, UserId};

use crate::cart_service::CartService;
use crate::checkout::PurchaseWorkflow;
use crate::store::{CartStore, InMemoryStore, OrderStore, ProductStore};

type Store = Arc<InMemoryStore>;

fn setup() -> (Store, CartService<Store>, PurchaseWorkflow<Store>) {
    let store: Store = Arc::new(InMemoryStore::new());
    let carts = CartService::new(store.clone());
    let checkout = PurchaseWorkflow::new(store.clone());
    (store, carts, checkout)
}

async fn seed_product(store: &Store, unit_price: u64, stock: u32) -> ProductId {
    let product =
        Product::create(ProductId::new(), "B-1024", "Widget", unit_price, stock, Utc::now()).unwrap();
    let id = product.id_typed();
    store.insert_product(product).await.unwrap();
    id
}

#[tokio::test]
async fn first_add_creates_cart_lazily_with_product_embedded() {
    let (store, carts, _) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    let item = carts.add_line_item(user, product_id, 3).await.unwrap();
    assert_eq!(item.line_item.quantity(), 3);
    assert!(item.line_item.is_active());

    let view = carts.get_cart(user).await.unwrap();
    assert_eq!(view.cart.status(), CartStatus::Active);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product.id_typed(), product_id);
    assert_eq!(view.items[0].line_item.quantity(), 3);
}

#[tokio::test]
async fn add_beyond_stock_fails_insufficient_and_leaves_state_unchanged() {
    let (store, carts, _) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 4).await;

    let err = carts.add_line_item(user, product_id, 5).await.unwrap_err();
    assert_eq!(err, DomainError::insufficient(4));

    // No cart was created, no stock was touched.
    assert!(matches!(
        carts.get_cart(user).await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(
        store.get_active_product(product_id).await.unwrap().quantity_available(),
        4
    );
}

#[tokio::test]
async fn add_unknown_product_fails_not_found() {
    let (_, carts, _) = setup();
    let err = carts
        .add_line_item(UserId::new(), ProductId::new(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_add_conflicts_and_re_add_after_remove_reuses_the_row() {
    let (store, carts, _) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    let first = carts.add_line_item(user, product_id, 2).await.unwrap();
    let err = carts.add_line_item(user, product_id, 1).await.unwrap_err();
    assert_eq!(err, DomainError::conflict("already in the cart"));

    carts.remove_line_item(user, product_id).await.unwrap();
    let re_added = carts.add_line_item(user, product_id, 5).await.unwrap();

    // Same row identity, not a duplicate.
    assert_eq!(re_added.line_item.id_typed(), first.line_item.id_typed());
    assert_eq!(re_added.line_item.quantity(), 5);
}

#[tokio::test]
async fn update_to_zero_removes_and_delete_afterwards_is_not_found() {
    let (store, carts, _) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    carts.add_line_item(user, product_id, 1).await.unwrap();
    carts.update_line_item(user, product_id, 5).await.unwrap();
    carts.update_line_item(user, product_id, 0).await.unwrap();

    // Exactly one row, removed, quantity 0.
    let cart = store.find_active_cart(user).await.unwrap().unwrap();
    let row = store
        .find_line_item(cart.id_typed(), product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status(), LineItemStatus::Removed);
    assert_eq!(row.quantity(), 0);

    let err = carts.remove_line_item(user, product_id).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("not in cart"));

    // Indistinguishable from never having been added.
    let view = carts.get_cart(user).await.unwrap();
    assert!(view.items.is_empty());
}

#[tokio::test]
async fn update_without_cart_or_item_reports_which_is_missing() {
    let (store, carts, _) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    let err = carts.update_line_item(user, product_id, 1).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("no cart"));

    let other = seed_product(&store, 100, 10).await;
    carts.add_line_item(user, other, 1).await.unwrap();
    let err = carts.update_line_item(user, product_id, 1).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("not in cart"));
}

#[tokio::test]
async fn purchase_totals_decrements_and_finalizes_statuses() {
    let (store, carts, checkout) = setup();
    let user = UserId::new();
    let product_a = seed_product(&store, 100, 10).await;
    let product_b = seed_product(&store, 50, 10).await;

    carts.add_line_item(user, product_a, 2).await.unwrap();
    carts.add_line_item(user, product_b, 1).await.unwrap();

    let receipt = checkout.purchase(user).await.unwrap();
    assert_eq!(receipt.order.total_price(), 250);
    assert_eq!(receipt.cart.cart.status(), CartStatus::Purchased);
    assert!(receipt
        .cart
        .items
        .iter()
        .all(|i| i.line_item.status() == LineItemStatus::Purchased));

    assert_eq!(
        store.get_active_product(product_a).await.unwrap().quantity_available(),
        8
    );
    assert_eq!(
        store.get_active_product(product_b).await.unwrap().quantity_available(),
        9
    );

    let orders = store.orders_for_user(user).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].cart_id(), receipt.cart.cart.id_typed());
}

#[tokio::test]
async fn second_purchase_fails_not_found_because_no_active_cart_remains() {
    let (store, carts, checkout) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    carts.add_line_item(user, product_id, 1).await.unwrap();
    checkout.purchase(user).await.unwrap();

    let err = checkout.purchase(user).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("no cart"));
}

#[tokio::test]
async fn purchase_after_purchase_starts_a_fresh_cart() {
    let (store, carts, checkout) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    carts.add_line_item(user, product_id, 1).await.unwrap();
    let first = checkout.purchase(user).await.unwrap();

    // Next add lazily creates a brand new active cart.
    carts.add_line_item(user, product_id, 2).await.unwrap();
    let view = carts.get_cart(user).await.unwrap();
    assert_ne!(view.cart.id_typed(), first.cart.cart.id_typed());
    assert_eq!(view.items[0].line_item.quantity(), 2);
}

#[tokio::test]
async fn empty_cart_purchase_yields_a_zero_total_order() {
    let (store, carts, checkout) = setup();
    let user = UserId::new();
    let product_id = seed_product(&store, 100, 10).await;

    // Active cart with zero active line items.
    carts.add_line_item(user, product_id, 1).await.unwrap();
    carts.update_line_item(user, product_id, 0).await.unwrap();

    let receipt = checkout.purchase(user).await.unwrap();
    assert_eq!(receipt.order.total_price(), 0);
    assert!(receipt.cart.items.is_empty());
    assert_eq!(
        store.get_active_product(product_id).await.unwrap().quantity_available(),
        10
    );
}

#[tokio::test]
async fn purchase_with_stale_availability_fails_and_compensates() {
    let (store, carts, checkout) = setup();
    let user = UserId::new();
    let product_a = seed_product(&store, 100, 10).await;
    let product_b = seed_product(&store, 50, 3).await;

    carts.add_line_item(user, product_a, 2).await.unwrap();
    carts.add_line_item(user, product_b, 3).await.unwrap();

    // Availability changed between cart mutation and purchase.
    store.try_decrement(product_b, 2).await.unwrap();

    let err = checkout.purchase(user).await.unwrap_err();
    assert_eq!(err, DomainError::insufficient(1));

    // Product A's decrement was rolled back; nothing was finalized.
    assert_eq!(
        store.get_active_product(product_a).await.unwrap().quantity_available(),
        10
    );
    assert_eq!(
        store.get_active_product(product_b).await.unwrap().quantity_available(),
        1
    );
    let view = carts.get_cart(user).await.unwrap();
    assert_eq!(view.items.len(), 2);
    assert!(view.items.iter().all(|i| i.line_item.is_active()));
    assert!(store.orders_for_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_purchases_of_the_last_unit_have_exactly_one_winner() {
    let (store, carts, checkout) = setup();
    let user_a = UserId::new();
    let user_b = UserId::new();
    let product_id = seed_product(&store, 100, 1).await;

    carts.add_line_item(user_a, product_id, 1).await.unwrap();
    carts.add_line_item(user_b, product_id, 1).await.unwrap();

    let (a, b) = tokio::join!(checkout.purchase(user_a), checkout.purchase(user_b));

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one purchase may win the last unit");

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert_eq!(loser, DomainError::insufficient(0));
    assert_eq!(
        store.get_active_product(product_id).await.unwrap().quantity_available(),
        0
    );
    assert_eq!(store.all_orders().await.unwrap().len(), 1);
}
