use axum::http::HeaderMap;
use uuid::Uuid;

use oderly_auth_types::bearer::bearer_token;
use oderly_domain::user::UserRole;
use oderly_shop::domain::types::AuthContext;
use oderly_shop::error::ShopServiceError;
use oderly_shop::usecase::auth::{
    AuthenticateUseCase, LoginInput, LoginUseCase, SignupInput, SignupUseCase,
};
use oderly_testing::auth::{MockAuth, TEST_JWT_SECRET};

use crate::helpers::{InMemoryStore, seed_user};

fn authenticate(store: &InMemoryStore) -> AuthenticateUseCase<InMemoryStore> {
    AuthenticateUseCase {
        users: store.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

async fn resolve(
    store: &InMemoryStore,
    headers: &HeaderMap,
) -> Result<AuthContext, ShopServiceError> {
    let token = bearer_token(headers).map_err(|_| ShopServiceError::Unauthorized)?;
    authenticate(store).execute(token.as_deref()).await
}

#[tokio::test]
async fn should_sign_up_log_in_and_authenticate_with_issued_token() {
    let store = InMemoryStore::new();
    let user = SignupUseCase {
        users: store.clone(),
    }
    .execute(SignupInput {
        username: "jane".into(),
        email: "jane@example.com".into(),
        phone: None,
        password: "hunter22".into(),
    })
    .await
    .unwrap();

    let login = LoginUseCase {
        users: store.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
    .execute(LoginInput {
        email: "jane@example.com".into(),
        password: "hunter22".into(),
    })
    .await
    .unwrap();
    assert_eq!(login.user.id, user.id);

    let ctx = authenticate(&store)
        .execute(Some(&login.access_token))
        .await
        .unwrap();
    assert_eq!(ctx.user().map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn should_take_role_from_store_not_token() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;

    let ctx = resolve(&store, &MockAuth::admin(user.id).headers())
        .await
        .unwrap();
    let AuthContext::AuthenticatedAs(resolved) = ctx else {
        panic!("expected an authenticated caller");
    };
    assert_eq!(resolved.role, UserRole::User);
}

#[tokio::test]
async fn should_be_anonymous_without_header() {
    let store = InMemoryStore::new();
    let ctx = resolve(&store, &HeaderMap::new()).await.unwrap();
    assert_eq!(ctx, AuthContext::Anonymous);
}

#[tokio::test]
async fn should_reject_token_for_unknown_user() {
    let store = InMemoryStore::new();
    let err = resolve(&store, &MockAuth::user(Uuid::now_v7()).headers())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopServiceError::Unauthorized));
}

#[tokio::test]
async fn should_reject_token_signed_with_other_secret() {
    let store = InMemoryStore::new();
    let user = seed_user(&store, UserRole::User).await;
    let token = MockAuth::user(user.id).token();

    let err = AuthenticateUseCase {
        users: store.clone(),
        jwt_secret: "another-secret".into(),
    }
    .execute(Some(&token))
    .await
    .unwrap_err();
    assert!(matches!(err, ShopServiceError::Unauthorized));
}

#[tokio::test]
async fn should_refuse_duplicate_email() {
    let store = InMemoryStore::new();
    let signup = SignupUseCase {
        users: store.clone(),
    };
    let input = || SignupInput {
        username: "jane".into(),
        email: "jane@example.com".into(),
        phone: None,
        password: "hunter22".into(),
    };
    signup.execute(input()).await.unwrap();

    let err = signup.execute(input()).await.unwrap_err();
    assert!(matches!(err, ShopServiceError::UserAlreadyExists));
}
