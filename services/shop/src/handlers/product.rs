use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oderly_domain::pagination::PageRequest;

use crate::domain::types::{Product, ProductPatch};
use crate::error::ShopServiceError;
use crate::handlers::extract::{AdminUser, CurrentUser, PathParam, Payload, parse_query};
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, SearchProductsUseCase, UpdateProductUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub tags: Vec<String>,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "oderly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            tags: product.tags.into_iter().collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

// ── POST /products/create ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

pub async fn create_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Payload(body): Payload<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ShopServiceError> {
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name,
            description: body.description,
            price: body.price,
            tags: body.tags,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── GET /products/get ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProductListResponse {
    pub count: u64,
    pub products: Vec<ProductResponse>,
}

pub async fn list_products(
    _user: CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ProductListResponse>, ShopServiceError> {
    let page: PageRequest = parse_query(raw_query.as_deref())?;
    let usecase = ListProductsUseCase {
        products: state.product_repo(),
    };
    let listing = usecase.execute(page).await?;
    Ok(Json(ProductListResponse {
        count: listing.count,
        products: listing
            .products
            .into_iter()
            .map(ProductResponse::from)
            .collect(),
    }))
}

// ── GET /products/get/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    _user: CurrentUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<ProductResponse>, ShopServiceError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase.execute(id).await?;
    Ok(Json(product.into()))
}

// ── PUT /products/update/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub tags: Option<BTreeSet<String>>,
}

pub async fn update_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    Payload(body): Payload<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ShopServiceError> {
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(
            id,
            ProductPatch {
                name: body.name,
                description: body.description,
                price: body.price,
                tags: body.tags,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

// ── DELETE /products/delete/{id} ─────────────────────────────────────────────

pub async fn delete_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ShopServiceError> {
    let usecase = DeleteProductUseCase {
        products: state.product_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /products/search ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

pub async fn search_products(
    _user: CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ProductResponse>>, ShopServiceError> {
    let query: SearchQuery = parse_query(raw_query.as_deref())?;
    let usecase = SearchProductsUseCase {
        products: state.product_repo(),
    };
    let page = PageRequest::new(query.page.unwrap_or(1));
    let products = usecase.execute(&query.q, page).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}
