use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::pagination::PageRequest;

use crate::domain::types::{Order, OrderDetail, OrderEvent, OrderFilter, OrderProduct};
use crate::error::ShopServiceError;
use crate::handlers::extract::{AdminUser, CurrentUser, PathParam, Payload, parse_query};
use crate::state::AppState;
use crate::usecase::order::{
    CancelOrderUseCase, ChangeOrderStatusUseCase, GetOrderUseCase, ListOrdersUseCase,
    PlaceOrderOutcome, PlaceOrderUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub net_amount: Decimal,
    pub address: String,
    pub status: OrderStatus,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            net_amount: order.net_amount,
            address: order.address,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl From<OrderProduct> for OrderProductResponse {
    fn from(line: OrderProduct) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEventResponse {
    pub id: Uuid,
    pub status: OrderStatus,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<OrderEvent> for OrderEventResponse {
    fn from(event: OrderEvent) -> Self {
        Self {
            id: event.id,
            status: event.status,
            created_at: event.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub products: Vec<OrderProductResponse>,
    pub events: Vec<OrderEventResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            products: detail.products.into_iter().map(Into::into).collect(),
            events: detail.events.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
}

impl OrderListQuery {
    fn page(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1))
    }
}

async fn list_orders(
    state: &AppState,
    user_id: Option<Uuid>,
    raw_query: Option<&str>,
) -> Result<Json<Vec<OrderResponse>>, ShopServiceError> {
    let query: OrderListQuery = parse_query(raw_query)?;
    let usecase = ListOrdersUseCase {
        orders: state.order_repo(),
    };
    let filter = OrderFilter {
        user_id,
        status: query.status,
    };
    let orders = usecase.execute(filter, query.page()).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// ── POST /orders/create ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub async fn create_order(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, ShopServiceError> {
    let usecase = PlaceOrderUseCase {
        carts: state.cart_repo(),
        addresses: state.address_repo(),
        orders: state.order_repo(),
    };
    let response = match usecase.execute(&user).await? {
        PlaceOrderOutcome::EmptyCart => Json(MessageResponse {
            message: "no items in cart",
        })
        .into_response(),
        PlaceOrderOutcome::Placed(detail) => {
            (StatusCode::CREATED, Json(OrderDetailResponse::from(detail))).into_response()
        }
    };
    Ok(response)
}

// ── GET /orders/getAll ───────────────────────────────────────────────────────

pub async fn list_my_orders(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<OrderResponse>>, ShopServiceError> {
    list_orders(&state, Some(user.id), raw_query.as_deref()).await
}

// ── GET /orders/get/{id} ─────────────────────────────────────────────────────

pub async fn get_order(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<OrderDetailResponse>, ShopServiceError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let detail = usecase.execute(&user, id).await?;
    Ok(Json(detail.into()))
}

// ── PUT /orders/cancel/{id} ──────────────────────────────────────────────────

pub async fn cancel_order(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<OrderResponse>, ShopServiceError> {
    let usecase = CancelOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(&user, id).await?;
    Ok(Json(order.into()))
}

// ── GET /orders ──────────────────────────────────────────────────────────────

pub async fn list_all_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<OrderResponse>>, ShopServiceError> {
    list_orders(&state, None, raw_query.as_deref()).await
}

// ── PUT /orders/status/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: OrderStatus,
}

pub async fn change_order_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    Payload(body): Payload<ChangeStatusRequest>,
) -> Result<Json<OrderResponse>, ShopServiceError> {
    let usecase = ChangeOrderStatusUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(id, body.status).await?;
    Ok(Json(order.into()))
}

// ── GET /orders/orderByUser/{id} ─────────────────────────────────────────────

pub async fn list_user_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<OrderResponse>>, ShopServiceError> {
    list_orders(&state, Some(user_id), raw_query.as_deref()).await
}
