use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{CartItem, CartLine};
use crate::error::ShopServiceError;
use crate::handlers::extract::{CurrentUser, PathParam, Payload};
use crate::handlers::product::ProductResponse;
use crate::state::AppState;
use crate::usecase::cart::{
    AddToCartUseCase, ChangeQuantityUseCase, GetCartUseCase, RemoveCartItemUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: Uuid,
    pub quantity: i32,
    pub line_total: Decimal,
    pub product: ProductResponse,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            line_total: line.line_total(),
            id: line.item.id,
            quantity: line.item.quantity,
            product: line.product.into(),
        }
    }
}

// ── POST /cart/create ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

pub async fn add_to_cart(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Payload(body): Payload<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), ShopServiceError> {
    let usecase = AddToCartUseCase {
        carts: state.cart_repo(),
        products: state.product_repo(),
    };
    let item = usecase
        .execute(user.id, body.product_id, body.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

// ── GET /cart/getCart ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total: Decimal,
}

pub async fn get_cart(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>, ShopServiceError> {
    let usecase = GetCartUseCase {
        carts: state.cart_repo(),
    };
    let lines = usecase.execute(user.id).await?;
    let total = lines.iter().map(CartLine::line_total).sum();
    Ok(Json(CartResponse {
        items: lines.into_iter().map(CartLineResponse::from).collect(),
        total,
    }))
}

// ── PUT /cart/{id}/change ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangeQuantityRequest {
    pub quantity: i32,
}

pub async fn change_quantity(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    Payload(body): Payload<ChangeQuantityRequest>,
) -> Result<Json<CartItemResponse>, ShopServiceError> {
    let usecase = ChangeQuantityUseCase {
        carts: state.cart_repo(),
    };
    let item = usecase.execute(user.id, id, body.quantity).await?;
    Ok(Json(item.into()))
}

// ── DELETE /cart/delete/{id} ─────────────────────────────────────────────────

pub async fn remove_cart_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ShopServiceError> {
    let usecase = RemoveCartItemUseCase {
        carts: state.cart_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
