use axum::{
    Json,
    extract::{RawQuery, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oderly_domain::pagination::PageRequest;
use oderly_domain::user::UserRole;

use crate::domain::types::{User, UserPatch};
use crate::error::ShopServiceError;
use crate::handlers::address::AddressResponse;
use crate::handlers::extract::{AdminUser, CurrentUser, PathParam, Payload, parse_query};
use crate::state::AppState;
use crate::usecase::user::{
    ChangeRoleUseCase, GetUserUseCase, ListUsersUseCase, UpdateProfileUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role: user.role,
            shipping_address_id: user.shipping_address_id,
            billing_address_id: user.billing_address_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── PUT /user ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
}

pub async fn update_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Payload(body): Payload<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ShopServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
        addresses: state.address_repo(),
    };
    let updated = usecase
        .execute(
            &user,
            UserPatch {
                username: body.username,
                shipping_address_id: body.shipping_address_id,
                billing_address_id: body.billing_address_id,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

// ── PUT /user/changeRole/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

pub async fn change_role(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    Payload(body): Payload<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ShopServiceError> {
    let usecase = ChangeRoleUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(id, body.role).await?;
    Ok(Json(user.into()))
}

// ── GET /user/listUsers ──────────────────────────────────────────────────────

pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<UserResponse>>, ShopServiceError> {
    let page: PageRequest = parse_query(raw_query.as_deref())?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /user/listUser/{id} ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub addresses: Vec<AddressResponse>,
}

pub async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<UserDetailResponse>, ShopServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        addresses: state.address_repo(),
    };
    let found = usecase.execute(id).await?;
    Ok(Json(UserDetailResponse {
        user: found.user.into(),
        addresses: found
            .addresses
            .into_iter()
            .map(AddressResponse::from)
            .collect(),
    }))
}
