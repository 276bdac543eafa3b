use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use oderly_shop_schema::{cart_items, products};

use super::product::product_from_model;
use crate::domain::repository::CartRepository;
use crate::domain::types::{CartItem, CartLine};
use crate::error::ShopServiceError;

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn add(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, ShopServiceError> {
        let now = Utc::now();
        let model = cart_items::Entity::insert(cart_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([cart_items::Column::UserId, cart_items::Column::ProductId])
                .value(
                    cart_items::Column::Quantity,
                    Expr::col((cart_items::Entity, cart_items::Column::Quantity)).add(quantity),
                )
                .value(cart_items::Column::UpdatedAt, Expr::value(now))
                .to_owned(),
        )
        .exec_with_returning(&self.db)
        .await
        .context("upsert cart item")?;
        Ok(cart_item_from_model(model))
    }

    async fn find_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, ShopServiceError> {
        let model = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
            .context("find cart item")?;
        Ok(model.map(cart_item_from_model))
    }

    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, ShopServiceError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .find_also_related(products::Entity)
            .order_by_asc(cart_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list cart lines")?;
        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| {
                product.map(|product| CartLine {
                    item: cart_item_from_model(item),
                    product: product_from_model(product),
                })
            })
            .collect())
    }

    async fn update_quantity(
        &self,
        id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, ShopServiceError> {
        let models = cart_items::Entity::update_many()
            .col_expr(cart_items::Column::Quantity, Expr::value(quantity))
            .col_expr(cart_items::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(cart_items::Column::Id.eq(id))
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .context("update cart item quantity")?;
        Ok(models.into_iter().next().map(cart_item_from_model))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, ShopServiceError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::Id.eq(id))
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete cart item")?;
        Ok(result.rows_affected > 0)
    }
}

pub(super) fn cart_item_from_model(model: cart_items::Model) -> CartItem {
    CartItem {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
