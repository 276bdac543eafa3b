use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Address;
use crate::error::ShopServiceError;
use crate::handlers::extract::{CurrentUser, PathParam, Payload};
use crate::state::AppState;
use crate::usecase::address::{
    CreateAddressInput, CreateAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub formatted_address: String,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            formatted_address: address.formatted(),
            id: address.id,
            user_id: address.user_id,
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
            created_at: address.created_at,
        }
    }
}

// ── POST /user/address ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

pub async fn create_address(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Payload(body): Payload<CreateAddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), ShopServiceError> {
    let usecase = CreateAddressUseCase {
        addresses: state.address_repo(),
    };
    let address = usecase
        .execute(
            user.id,
            CreateAddressInput {
                street: body.street,
                city: body.city,
                state: body.state,
                zip_code: body.zip_code,
                country: body.country,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

// ── GET /user/address ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AddressListResponse {
    pub addresses: Vec<AddressResponse>,
}

pub async fn list_addresses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AddressListResponse>, ShopServiceError> {
    let usecase = ListAddressesUseCase {
        addresses: state.address_repo(),
    };
    let addresses = usecase.execute(user.id).await?;
    Ok(Json(AddressListResponse {
        addresses: addresses.into_iter().map(AddressResponse::from).collect(),
    }))
}

// ── DELETE /user/address/{id} ────────────────────────────────────────────────

pub async fn delete_address(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ShopServiceError> {
    let usecase = DeleteAddressUseCase {
        addresses: state.address_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
