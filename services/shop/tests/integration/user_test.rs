use uuid::Uuid;

use oderly_domain::pagination::{PAGE_SIZE, PageRequest};
use oderly_domain::user::UserRole;
use oderly_shop::domain::repository::UserRepository;
use oderly_shop::domain::types::UserPatch;
use oderly_shop::error::ShopServiceError;
use oderly_shop::usecase::address::{
    CreateAddressInput, CreateAddressUseCase, DeleteAddressUseCase,
};
use oderly_shop::usecase::user::{
    ChangeRoleUseCase, GetUserUseCase, ListUsersUseCase, UpdateProfileUseCase,
};

use crate::helpers::{InMemoryStore, seed_address, seed_shopper, seed_user};

fn update_usecase(store: &InMemoryStore) -> UpdateProfileUseCase<InMemoryStore, InMemoryStore> {
    UpdateProfileUseCase {
        users: store.clone(),
        addresses: store.clone(),
    }
}

#[tokio::test]
async fn should_set_own_addresses_on_profile() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let home = seed_address(&store, user.id).await;
    let office = seed_address(&store, user.id).await;

    let updated = update_usecase(&store)
        .execute(
            &user,
            UserPatch {
                shipping_address_id: Some(home.id),
                billing_address_id: Some(office.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.shipping_address_id, Some(home.id));
    assert_eq!(updated.billing_address_id, Some(office.id));
}

#[tokio::test]
async fn should_refuse_someone_elses_address_without_writing() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let (_, foreign) = seed_shopper(&store).await;

    let err = update_usecase(&store)
        .execute(
            &user,
            UserPatch {
                username: Some("renamed".into()),
                shipping_address_id: Some(foreign.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::AddressNotOwned));

    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored, user);
}

#[tokio::test]
async fn should_report_unknown_address_and_empty_patch() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;

    let err = update_usecase(&store)
        .execute(
            &user,
            UserPatch {
                billing_address_id: Some(Uuid::now_v7()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::AddressNotFound));

    let err = update_usecase(&store)
        .execute(&user, UserPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::ValidationFailed(_)));
}

#[tokio::test]
async fn should_unlink_deleted_shipping_address() {
    let store = InMemoryStore::new();
    let (user, address) = seed_shopper(&store).await;

    DeleteAddressUseCase {
        addresses: store.clone(),
    }
    .execute(user.id, address.id)
    .await
    .unwrap();

    let detail = GetUserUseCase {
        users: store.clone(),
        addresses: store.clone(),
    }
    .execute(user.id)
    .await
    .unwrap();
    assert!(detail.addresses.is_empty());
    assert_eq!(detail.user.shipping_address_id, None);
}

#[tokio::test]
async fn should_name_the_blank_address_field() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;

    let err = CreateAddressUseCase {
        addresses: store.clone(),
    }
    .execute(
        user.id,
        CreateAddressInput {
            street: "742 Evergreen Terrace".into(),
            city: "Springfield".into(),
            state: "OR".into(),
            zip_code: "  ".into(),
            country: "USA".into(),
        },
    )
    .await
    .unwrap_err();

    let ShopServiceError::ValidationFailed(message) = err else {
        panic!("expected a validation error");
    };
    assert!(message.contains("zipCode"));
}

#[tokio::test]
async fn should_promote_user_and_list_one_page() {
    let store = InMemoryStore::new();
    let mut users = Vec::new();
    for _ in 0..7 {
        users.push(seed_user(&store, UserRole::User).await);
    }

    let promoted = ChangeRoleUseCase {
        users: store.clone(),
    }
    .execute(users[0].id, UserRole::Admin)
    .await
    .unwrap();
    assert!(promoted.role.is_admin());

    let list = ListUsersUseCase {
        users: store.clone(),
    };
    let first = list.execute(PageRequest::new(1)).await.unwrap();
    let second = list.execute(PageRequest::new(2)).await.unwrap();
    assert_eq!(first.len(), PAGE_SIZE as usize);
    assert_eq!(second.len(), 2);

    let err = ChangeRoleUseCase {
        users: store.clone(),
    }
    .execute(Uuid::now_v7(), UserRole::Admin)
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::UserNotFound));
}
