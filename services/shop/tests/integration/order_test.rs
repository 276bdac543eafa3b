use rust_decimal_macros::dec;
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::pagination::{PAGE_SIZE, PageRequest};
use oderly_domain::user::UserRole;
use oderly_shop::domain::repository::{CartRepository, OrderRepository};
use oderly_shop::domain::types::{Address, OrderDraft, OrderFilter, User};
use oderly_shop::error::ShopServiceError;
use oderly_shop::usecase::cart::AddToCartUseCase;
use oderly_shop::usecase::order::{
    CancelOrderUseCase, ChangeOrderStatusUseCase, GetOrderUseCase, ListOrdersUseCase,
    PlaceOrderOutcome, PlaceOrderUseCase,
};

use crate::helpers::{Faults, InMemoryStore, seed_product, seed_shopper, seed_user};

type PlaceOrder = PlaceOrderUseCase<InMemoryStore, InMemoryStore, InMemoryStore>;

fn place_usecase(store: &InMemoryStore) -> PlaceOrder {
    PlaceOrderUseCase {
        carts: store.clone(),
        addresses: store.clone(),
        orders: store.clone(),
    }
}

async fn add_to_cart(store: &InMemoryStore, user_id: Uuid, product_id: Uuid, quantity: i32) {
    AddToCartUseCase {
        carts: store.clone(),
        products: store.clone(),
    }
    .execute(user_id, product_id, quantity)
    .await
    .unwrap();
}

async fn place(store: &InMemoryStore, user: &User) -> Uuid {
    match place_usecase(store).execute(user).await.unwrap() {
        PlaceOrderOutcome::Placed(detail) => detail.order.id,
        PlaceOrderOutcome::EmptyCart => panic!("expected an order"),
    }
}

// ── Placement ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_place_order_from_cart_and_clear_it() {
    let store = InMemoryStore::new();
    let (user, address) = seed_shopper(&store).await;
    let a = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let b = seed_product(&store, "Notebook", dec!(5.00)).await;
    add_to_cart(&store, user.id, a.id, 2).await;
    add_to_cart(&store, user.id, b.id, 1).await;

    let PlaceOrderOutcome::Placed(detail) = place_usecase(&store).execute(&user).await.unwrap()
    else {
        panic!("expected an order");
    };

    assert_eq!(detail.order.net_amount, dec!(25.00));
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.address, address.formatted());

    let mut lines: Vec<_> = detail
        .products
        .iter()
        .map(|p| (p.product_id, p.quantity, p.unit_price))
        .collect();
    lines.sort();
    let mut expected = vec![(a.id, 2, dec!(10.00)), (b.id, 1, dec!(5.00))];
    expected.sort();
    assert_eq!(lines, expected);

    let tables = store.snapshot();
    assert!(tables.cart_items.is_empty());
    assert_eq!(tables.orders.len(), 1);
    assert_eq!(tables.order_products.len(), 2);
    assert_eq!(tables.order_events.len(), 1);
    assert_eq!(tables.order_events[0].status, OrderStatus::Pending);
    assert_eq!(tables.order_events[0].order_id, detail.order.id);
}

#[tokio::test]
async fn should_report_empty_cart_without_writing() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;

    for _ in 0..2 {
        let outcome = place_usecase(&store).execute(&user).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::EmptyCart));
    }

    let tables = store.snapshot();
    assert!(tables.orders.is_empty());
    assert!(tables.order_events.is_empty());
}

#[tokio::test]
async fn should_not_place_second_order_from_consumed_cart() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 1).await;

    place(&store, &user).await;
    let outcome = place_usecase(&store).execute(&user).await.unwrap();

    assert!(matches!(outcome, PlaceOrderOutcome::EmptyCart));
    assert_eq!(store.snapshot().orders.len(), 1);
}

#[tokio::test]
async fn should_leave_no_trace_when_cart_clear_fails() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 3).await;
    let before = store.snapshot();

    store.inject(Faults {
        fail_cart_clear: true,
        ..Default::default()
    });
    let err = place_usecase(&store).execute(&user).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::Internal(_)));

    let after = store.snapshot();
    assert!(after.orders.is_empty());
    assert!(after.order_products.is_empty());
    assert!(after.order_events.is_empty());
    assert_eq!(after.cart_items, before.cart_items);
}

#[tokio::test]
async fn should_roll_back_when_cart_shrinks_during_placement() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let a = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let b = seed_product(&store, "Notebook", dec!(5.00)).await;
    add_to_cart(&store, user.id, a.id, 1).await;
    add_to_cart(&store, user.id, b.id, 1).await;

    store.inject(Faults {
        steal_cart_item: true,
        ..Default::default()
    });
    let err = place_usecase(&store).execute(&user).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::Internal(_)));

    let tables = store.snapshot();
    assert!(tables.orders.is_empty());
    assert_eq!(tables.cart_items.len(), 2);
}

/// Price the current cart into a draft without placing it.
async fn price_cart(store: &InMemoryStore, user: &User, address: &Address) -> OrderDraft {
    let lines = store.list_lines(user.id).await.unwrap();
    OrderDraft::from_cart(user.id, address, &lines)
}

#[tokio::test]
async fn should_refuse_draft_when_line_added_after_pricing() {
    let store = InMemoryStore::new();
    let (user, address) = seed_shopper(&store).await;
    let lamp = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let notebook = seed_product(&store, "Notebook", dec!(5.00)).await;
    add_to_cart(&store, user.id, lamp.id, 1).await;
    let draft = price_cart(&store, &user, &address).await;

    add_to_cart(&store, user.id, notebook.id, 4).await;
    let err = store.place(&draft).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::Internal(_)));

    let tables = store.snapshot();
    assert!(tables.orders.is_empty());
    assert!(tables.order_events.is_empty());
    assert_eq!(tables.cart_items.len(), 2);
}

#[tokio::test]
async fn should_refuse_draft_when_quantity_grew_after_pricing() {
    let store = InMemoryStore::new();
    let (user, address) = seed_shopper(&store).await;
    let lamp = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, lamp.id, 1).await;
    let draft = price_cart(&store, &user, &address).await;

    add_to_cart(&store, user.id, lamp.id, 2).await;
    let err = store.place(&draft).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::Internal(_)));

    let tables = store.snapshot();
    assert!(tables.orders.is_empty());
    assert_eq!(tables.cart_items.len(), 1);
    assert_eq!(tables.cart_items[0].quantity, 3);
}

#[tokio::test]
async fn should_reject_order_total_beyond_storable_amount() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 2).await;
    store.set_product_price(product.id, dec!(9999999999999999.99));

    let err = place_usecase(&store).execute(&user).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));

    let tables = store.snapshot();
    assert!(tables.orders.is_empty());
    assert_eq!(tables.cart_items.len(), 1);
}

#[tokio::test]
async fn should_keep_price_snapshot_after_catalog_change() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 2).await;
    let order_id = place(&store, &user).await;

    store.set_product_price(product.id, dec!(99.99));

    let detail = GetOrderUseCase {
        orders: store.clone(),
    }
    .execute(&user, order_id)
    .await
    .unwrap();
    assert_eq!(detail.order.net_amount, dec!(20.00));
    assert_eq!(detail.products[0].unit_price, dec!(10.00));
}

#[tokio::test]
async fn should_require_owned_shipping_address() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 1).await;

    let err = place_usecase(&store).execute(&user).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::AddressNotFound));
    assert_eq!(store.snapshot().cart_items.len(), 1);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_walk_forward_and_record_every_event() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 1).await;
    let order_id = place(&store, &user).await;

    let change = ChangeOrderStatusUseCase {
        orders: store.clone(),
    };
    for status in [
        OrderStatus::Accepted,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        let order = change.execute(order_id, status).await.unwrap();
        assert_eq!(order.status, status);
    }

    let detail = GetOrderUseCase {
        orders: store.clone(),
    }
    .execute(&user, order_id)
    .await
    .unwrap();
    let history: Vec<_> = detail.events.iter().map(|e| e.status).collect();
    assert_eq!(
        history,
        vec![
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ]
    );
}

#[tokio::test]
async fn should_reject_any_move_out_of_terminal_status() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, user.id, product.id, 1).await;
    let order_id = place(&store, &user).await;

    CancelOrderUseCase {
        orders: store.clone(),
    }
    .execute(&user, order_id)
    .await
    .unwrap();
    let events_after_cancel = store.snapshot().order_events.len();

    let change = ChangeOrderStatusUseCase {
        orders: store.clone(),
    };
    for status in OrderStatus::ALL {
        let err = change.execute(order_id, status).await.unwrap_err();
        assert!(matches!(err, ShopServiceError::InvalidStatusTransition));
    }
    let err = CancelOrderUseCase {
        orders: store.clone(),
    }
    .execute(&user, order_id)
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::InvalidStatusTransition));

    let tables = store.snapshot();
    assert_eq!(tables.order_events.len(), events_after_cancel);
    assert_eq!(tables.orders[0].status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn should_hide_orders_from_other_users() {
    let store = InMemoryStore::new();
    let (owner, _) = seed_shopper(&store).await;
    let (stranger, _) = seed_shopper(&store).await;
    let admin = seed_user(&store, UserRole::Admin).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_to_cart(&store, owner.id, product.id, 1).await;
    let order_id = place(&store, &owner).await;

    let get = GetOrderUseCase {
        orders: store.clone(),
    };
    let err = get.execute(&stranger, order_id).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::OrderNotFound));
    assert!(get.execute(&admin, order_id).await.is_ok());

    let err = CancelOrderUseCase {
        orders: store.clone(),
    }
    .execute(&stranger, order_id)
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::OrderNotFound));
    assert_eq!(store.snapshot().orders[0].status, OrderStatus::Pending);
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_bound_pages_and_filter_by_owner_and_status() {
    let store = InMemoryStore::new();
    let (user, _) = seed_shopper(&store).await;
    let (other, _) = seed_shopper(&store).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;

    let mut placed = Vec::new();
    for _ in 0..7 {
        add_to_cart(&store, user.id, product.id, 1).await;
        placed.push(place(&store, &user).await);
    }
    add_to_cart(&store, other.id, product.id, 1).await;
    place(&store, &other).await;
    CancelOrderUseCase {
        orders: store.clone(),
    }
    .execute(&user, placed[0])
    .await
    .unwrap();

    let list = ListOrdersUseCase {
        orders: store.clone(),
    };
    let mine = OrderFilter {
        user_id: Some(user.id),
        status: None,
    };
    let first = list.execute(mine, PageRequest::new(1)).await.unwrap();
    let second = list.execute(mine, PageRequest::new(2)).await.unwrap();
    assert_eq!(first.len(), PAGE_SIZE as usize);
    assert_eq!(second.len(), 2);
    assert!(first.iter().chain(&second).all(|o| o.user_id == user.id));
    assert!(first.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let everything = list
        .execute(OrderFilter::default(), PageRequest::new(1))
        .await
        .unwrap();
    assert!(everything.len() <= PAGE_SIZE as usize);

    let cancelled = list
        .execute(
            OrderFilter {
                user_id: None,
                status: Some(OrderStatus::Cancelled),
            },
            PageRequest::new(1),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, placed[0]);
}
