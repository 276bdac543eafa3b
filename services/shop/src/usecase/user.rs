use uuid::Uuid;

use oderly_domain::pagination::PageRequest;
use oderly_domain::user::UserRole;

use crate::domain::repository::{AddressRepository, UserRepository};
use crate::domain::types::{Address, User, UserPatch, validate_username};
use crate::error::ShopServiceError;

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<U: UserRepository, A: AddressRepository> {
    pub users: U,
    pub addresses: A,
}

impl<U: UserRepository, A: AddressRepository> UpdateProfileUseCase<U, A> {
    /// Every referenced address must exist and belong to `user` before
    /// anything is written.
    pub async fn execute(&self, user: &User, patch: UserPatch) -> Result<User, ShopServiceError> {
        if patch.is_empty() {
            return Err(ShopServiceError::validation("no fields to update"));
        }
        if let Some(ref username) = patch.username {
            if !validate_username(username) {
                return Err(ShopServiceError::validation(
                    "username must be at least 4 characters",
                ));
            }
        }
        for address_id in [patch.shipping_address_id, patch.billing_address_id]
            .into_iter()
            .flatten()
        {
            self.owned_address(user.id, address_id).await?;
        }

        let patch = UserPatch {
            username: patch.username.map(|u| u.trim().to_owned()),
            ..patch
        };
        self.users
            .update_profile(user.id, &patch)
            .await?
            .ok_or(ShopServiceError::UserNotFound)
    }

    async fn owned_address(&self, user_id: Uuid, id: Uuid) -> Result<Address, ShopServiceError> {
        let address = self
            .addresses
            .find_by_id(id)
            .await?
            .ok_or(ShopServiceError::AddressNotFound)?;
        if address.user_id != user_id {
            return Err(ShopServiceError::AddressNotOwned);
        }
        Ok(address)
    }
}

// ── ChangeRole ───────────────────────────────────────────────────────────────

pub struct ChangeRoleUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ChangeRoleUseCase<U> {
    pub async fn execute(&self, id: Uuid, role: UserRole) -> Result<User, ShopServiceError> {
        let user = self
            .users
            .update_role(id, role)
            .await?
            .ok_or(ShopServiceError::UserNotFound)?;
        tracing::info!(user_id = %id, role = %role, "user role changed");
        Ok(user)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, ShopServiceError> {
        self.users.list(page.clamped()).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct UserWithAddresses {
    pub user: User,
    pub addresses: Vec<Address>,
}

pub struct GetUserUseCase<U: UserRepository, A: AddressRepository> {
    pub users: U,
    pub addresses: A,
}

impl<U: UserRepository, A: AddressRepository> GetUserUseCase<U, A> {
    pub async fn execute(&self, id: Uuid) -> Result<UserWithAddresses, ShopServiceError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ShopServiceError::UserNotFound)?;
        let addresses = self.addresses.list_by_user(id).await?;
        Ok(UserWithAddresses { user, addresses })
    }
}
