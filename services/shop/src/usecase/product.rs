use std::collections::BTreeSet;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use oderly_domain::pagination::PageRequest;

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductPatch, validate_price, validate_product_text};
use crate::error::ShopServiceError;

fn check_name(name: &str) -> Result<(), ShopServiceError> {
    if validate_product_text(name) {
        Ok(())
    } else {
        Err(ShopServiceError::validation(
            "name must be at least 4 characters",
        ))
    }
}

fn check_description(description: &str) -> Result<(), ShopServiceError> {
    if validate_product_text(description) {
        Ok(())
    } else {
        Err(ShopServiceError::validation(
            "description must be at least 4 characters",
        ))
    }
}

fn check_price(price: Decimal) -> Result<(), ShopServiceError> {
    if validate_price(price) {
        Ok(())
    } else {
        Err(ShopServiceError::validation(
            "price must be positive, at most 99999999.99, with at most 2 decimal places",
        ))
    }
}

fn normalize_tags(tags: BTreeSet<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().replace(',', " "))
        .filter(|t| !t.is_empty())
        .collect()
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub tags: BTreeSet<String>,
}

pub struct CreateProductUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> CreateProductUseCase<R> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, ShopServiceError> {
        check_name(&input.name)?;
        check_description(&input.description)?;
        check_price(input.price)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            tags: normalize_tags(input.tags),
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await?;
        Ok(product)
    }
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ProductPage {
    /// Total number of products in the catalog.
    pub count: u64,
    pub products: Vec<Product>,
}

pub struct ListProductsUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> ListProductsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<ProductPage, ShopServiceError> {
        let count = self.products.count().await?;
        let products = self.products.list(page.clamped()).await?;
        Ok(ProductPage { count, products })
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Product, ShopServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(ShopServiceError::ProductNotFound)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> UpdateProductUseCase<R> {
    /// Partial update. Orders placed earlier keep the price they were placed at.
    pub async fn execute(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Product, ShopServiceError> {
        if patch.is_empty() {
            return Err(ShopServiceError::validation("no fields to update"));
        }
        if let Some(ref name) = patch.name {
            check_name(name)?;
        }
        if let Some(ref description) = patch.description {
            check_description(description)?;
        }
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        let patch = ProductPatch {
            tags: patch.tags.map(normalize_tags),
            ..patch
        };
        self.products
            .update(id, &patch)
            .await?
            .ok_or(ShopServiceError::ProductNotFound)
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> DeleteProductUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ShopServiceError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(ShopServiceError::ProductNotFound)
        }
    }
}

// ── SearchProducts ───────────────────────────────────────────────────────────

pub struct SearchProductsUseCase<R: ProductRepository> {
    pub products: R,
}

impl<R: ProductRepository> SearchProductsUseCase<R> {
    pub async fn execute(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Product>, ShopServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ShopServiceError::validation("search query must not be empty"));
        }
        self.products.search(query, page.clamped()).await
    }
}
