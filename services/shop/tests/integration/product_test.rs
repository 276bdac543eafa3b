use std::collections::BTreeSet;

use rust_decimal_macros::dec;

use oderly_domain::pagination::{PAGE_SIZE, PageRequest};
use oderly_shop::domain::types::ProductPatch;
use oderly_shop::error::ShopServiceError;
use oderly_shop::usecase::product::{
    CreateProductInput, CreateProductUseCase, ListProductsUseCase, SearchProductsUseCase,
    UpdateProductUseCase,
};

use crate::helpers::{InMemoryStore, seed_product};

#[tokio::test]
async fn should_search_name_description_and_tags_case_insensitively() {
    let store = InMemoryStore::new();
    let lamp = CreateProductUseCase {
        products: store.clone(),
    }
    .execute(CreateProductInput {
        name: "Desk lamp".into(),
        description: "Warm light for late nights".into(),
        price: dec!(19.99),
        tags: BTreeSet::from(["Lighting".to_owned(), "office".to_owned()]),
    })
    .await
    .unwrap();
    seed_product(&store, "Notebook", dec!(4.50)).await;

    let search = SearchProductsUseCase {
        products: store.clone(),
    };
    for query in ["LAMP", "late night", "lighting"] {
        let hits = search.execute(query, PageRequest::new(1)).await.unwrap();
        assert_eq!(hits.len(), 1, "query {query:?}");
        assert_eq!(hits[0].id, lamp.id);
    }

    let err = search.execute("   ", PageRequest::new(1)).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));
}

#[tokio::test]
async fn should_count_all_and_return_one_page() {
    let store = InMemoryStore::new();
    for i in 0..8 {
        seed_product(&store, &format!("Product {i}"), dec!(1.00)).await;
    }

    let page = ListProductsUseCase {
        products: store.clone(),
    }
    .execute(PageRequest::new(1))
    .await
    .unwrap();
    assert_eq!(page.count, 8);
    assert_eq!(page.products.len(), PAGE_SIZE as usize);
    assert_eq!(page.products[0].name, "Product 7");
}

#[tokio::test]
async fn should_reject_invalid_price_on_update() {
    let store = InMemoryStore::new();
    let product = seed_product(&store, "Desk lamp", dec!(10.00)).await;
    let update = UpdateProductUseCase {
        products: store.clone(),
    };

    for price in [dec!(0), dec!(-1.00), dec!(1.999), dec!(10000000000.00)] {
        let err = update
            .execute(
                product.id,
                ProductPatch {
                    price: Some(price),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopServiceError::ValidationFailed(_)));
    }

    let updated = update
        .execute(
            product.id,
            ProductPatch {
                price: Some(dec!(12.50)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, dec!(12.50));
    assert_eq!(updated.name, "Desk lamp");
}

#[tokio::test]
async fn should_reject_price_too_large_to_store() {
    let store = InMemoryStore::new();
    let err = CreateProductUseCase {
        products: store.clone(),
    }
    .execute(CreateProductInput {
        name: "Gold desk".into(),
        description: "Solid gold".into(),
        price: dec!(10000000000.00),
        tags: BTreeSet::new(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));
    assert!(store.snapshot().products.is_empty());
}
