use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel as _, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, LikeExpr},
};
use uuid::Uuid;

use oderly_domain::pagination::PageRequest;
use oderly_shop_schema::products;

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductPatch, join_tags, split_tags};
use crate::error::ShopServiceError;

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn create(&self, product: &Product) -> Result<(), ShopServiceError> {
        products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            tags: Set(join_tags(&product.tags)),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ShopServiceError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Product>, ShopServiceError> {
        let models = products::Entity::find()
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn count(&self) -> Result<u64, ShopServiceError> {
        let count = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;
        Ok(count)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, ShopServiceError> {
        let Some(model) = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(description.clone());
        }
        if let Some(price) = patch.price {
            am.price = Set(price);
        }
        if let Some(ref tags) = patch.tags {
            am.tags = Set(join_tags(tags));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update product")?;
        Ok(Some(product_from_model(model)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ShopServiceError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }

    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Product>, ShopServiceError> {
        let pattern = contains_pattern(query);
        let matches = |column: products::Column| {
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };
        let models = products::Entity::find()
            .filter(
                Condition::any()
                    .add(matches(products::Column::Name))
                    .add(matches(products::Column::Description))
                    .add(matches(products::Column::Tags)),
            )
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("search products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }
}

/// Lowercased `%query%` with LIKE metacharacters escaped by `\`.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(super) fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        tags: split_tags(&model.tags),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
