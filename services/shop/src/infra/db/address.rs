use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use oderly_shop_schema::addresses;

use crate::domain::repository::AddressRepository;
use crate::domain::types::Address;
use crate::error::ShopServiceError;

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

impl AddressRepository for DbAddressRepository {
    async fn create(&self, address: &Address) -> Result<(), ShopServiceError> {
        addresses::ActiveModel {
            id: Set(address.id),
            user_id: Set(address.user_id),
            street: Set(address.street.clone()),
            city: Set(address.city.clone()),
            state: Set(address.state.clone()),
            zip_code: Set(address.zip_code.clone()),
            country: Set(address.country.clone()),
            created_at: Set(address.created_at),
        }
        .insert(&self.db)
        .await
        .context("create address")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, ShopServiceError> {
        let model = addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(address_from_model))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, ShopServiceError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_asc(addresses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list addresses by user")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, ShopServiceError> {
        let result = addresses::Entity::delete_many()
            .filter(addresses::Column::Id.eq(id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete address")?;
        Ok(result.rows_affected > 0)
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        street: model.street,
        city: model.city,
        state: model.state,
        zip_code: model.zip_code,
        country: model.country,
        created_at: model.created_at,
    }
}
