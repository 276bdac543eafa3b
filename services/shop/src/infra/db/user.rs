use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, IntoActiveModel as _,
    QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use oderly_domain::pagination::PageRequest;
use oderly_domain::user::UserRole;
use oderly_shop_schema::users;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserPatch};
use crate::error::ShopServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ShopServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ShopServiceError> {
        use sea_orm::{ColumnTrait, QueryFilter};
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &User) -> Result<(), ShopServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            shipping_address_id: Set(user.shipping_address_id),
            billing_address_id: Set(user.billing_address_id),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(ShopServiceError::UserAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &UserPatch,
    ) -> Result<Option<User>, ShopServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for profile update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref username) = patch.username {
            am.username = Set(username.clone());
        }
        if let Some(address_id) = patch.shipping_address_id {
            am.shipping_address_id = Set(Some(address_id));
        }
        if let Some(address_id) = patch.billing_address_id {
            am.billing_address_id = Set(Some(address_id));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user profile")?;
        Ok(Some(user_from_model(model)?))
    }

    async fn update_role(
        &self,
        id: Uuid,
        role: UserRole,
    ) -> Result<Option<User>, ShopServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for role update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.role = Set(role.as_str().to_owned());
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user role")?;
        Ok(Some(user_from_model(model)?))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ShopServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<_>>()?)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has unknown role", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        role,
        shipping_address_id: model.shipping_address_id,
        billing_address_id: model.billing_address_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
