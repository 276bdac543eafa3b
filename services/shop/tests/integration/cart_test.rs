use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use oderly_domain::user::UserRole;
use oderly_shop::domain::types::{CartLine, MAX_QUANTITY};
use oderly_shop::error::ShopServiceError;
use oderly_shop::usecase::cart::{
    AddToCartUseCase, ChangeQuantityUseCase, GetCartUseCase, RemoveCartItemUseCase,
};
use oderly_shop::usecase::product::DeleteProductUseCase;

use crate::helpers::{InMemoryStore, seed_product, seed_user};

fn add_usecase(store: &InMemoryStore) -> AddToCartUseCase<InMemoryStore, InMemoryStore> {
    AddToCartUseCase {
        carts: store.clone(),
        products: store.clone(),
    }
}

async fn cart_of(store: &InMemoryStore, user_id: Uuid) -> Vec<CartLine> {
    GetCartUseCase {
        carts: store.clone(),
    }
    .execute(user_id)
    .await
    .unwrap()
}

#[tokio::test]
async fn should_accumulate_quantity_for_same_product() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;

    let first = add_usecase(&store).execute(user.id, product.id, 2).await.unwrap();
    let second = add_usecase(&store).execute(user.id, product.id, 3).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 5);
    let lines = cart_of(&store, user.id).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_total(), dec!(50.00));
}

#[tokio::test]
async fn should_price_cart_at_current_catalog_price() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_usecase(&store).execute(user.id, product.id, 2).await.unwrap();

    store.set_product_price(product.id, dec!(12.50));

    let total: Decimal = cart_of(&store, user.id)
        .await
        .iter()
        .map(CartLine::line_total)
        .sum();
    assert_eq!(total, dec!(25.00));
}

#[tokio::test]
async fn should_reject_non_positive_quantity_and_unknown_product() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;

    for quantity in [0, -1] {
        let err = add_usecase(&store)
            .execute(user.id, product.id, quantity)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopServiceError::ValidationFailed(_)));
    }
    let err = add_usecase(&store)
        .execute(user.id, Uuid::now_v7(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::ProductNotFound));
    assert!(store.snapshot().cart_items.is_empty());
}

#[tokio::test]
async fn should_not_touch_another_users_cart_item() {
    let store = InMemoryStore::new();
    let owner = seed_user(&store, UserRole::User).await;
    let intruder = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let item = add_usecase(&store).execute(owner.id, product.id, 1).await.unwrap();

    let err = ChangeQuantityUseCase {
        carts: store.clone(),
    }
    .execute(intruder.id, item.id, 9)
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::CartItemNotFound));

    let err = RemoveCartItemUseCase {
        carts: store.clone(),
    }
    .execute(intruder.id, item.id)
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::CartItemNotFound));

    let lines = cart_of(&store, owner.id).await;
    assert_eq!(lines[0].item.quantity, 1);
}

#[tokio::test]
async fn should_change_and_remove_own_cart_item() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let item = add_usecase(&store).execute(user.id, product.id, 1).await.unwrap();

    let changed = ChangeQuantityUseCase {
        carts: store.clone(),
    }
    .execute(user.id, item.id, 4)
    .await
    .unwrap();
    assert_eq!(changed.quantity, 4);

    RemoveCartItemUseCase {
        carts: store.clone(),
    }
    .execute(user.id, item.id)
    .await
    .unwrap();
    assert!(cart_of(&store, user.id).await.is_empty());
}

#[tokio::test]
async fn should_drop_cart_lines_of_deleted_product() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_usecase(&store).execute(user.id, product.id, 1).await.unwrap();

    DeleteProductUseCase {
        products: store.clone(),
    }
    .execute(product.id)
    .await
    .unwrap();

    assert!(cart_of(&store, user.id).await.is_empty());
}

#[tokio::test]
async fn should_refuse_accumulating_past_quantity_limit() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    add_usecase(&store)
        .execute(user.id, product.id, MAX_QUANTITY - 1)
        .await
        .unwrap();

    let err = add_usecase(&store)
        .execute(user.id, product.id, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));

    let err = add_usecase(&store)
        .execute(user.id, product.id, i32::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));

    let lines = cart_of(&store, user.id).await;
    assert_eq!(lines[0].item.quantity, MAX_QUANTITY - 1);
}
