use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::AddressRepository;
use crate::domain::types::Address;
use crate::error::ShopServiceError;

// ── CreateAddress ────────────────────────────────────────────────────────────

pub struct CreateAddressInput {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

pub struct CreateAddressUseCase<R: AddressRepository> {
    pub addresses: R,
}

impl<R: AddressRepository> CreateAddressUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateAddressInput,
    ) -> Result<Address, ShopServiceError> {
        let fields = [
            ("street", &input.street),
            ("city", &input.city),
            ("state", &input.state),
            ("zipCode", &input.zip_code),
            ("country", &input.country),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ShopServiceError::validation(format!(
                "{name} must not be empty"
            )));
        }

        let address = Address {
            id: Uuid::now_v7(),
            user_id,
            street: input.street.trim().to_owned(),
            city: input.city.trim().to_owned(),
            state: input.state.trim().to_owned(),
            zip_code: input.zip_code.trim().to_owned(),
            country: input.country.trim().to_owned(),
            created_at: Utc::now(),
        };
        self.addresses.create(&address).await?;
        Ok(address)
    }
}

// ── ListAddresses ────────────────────────────────────────────────────────────

pub struct ListAddressesUseCase<R: AddressRepository> {
    pub addresses: R,
}

impl<R: AddressRepository> ListAddressesUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Address>, ShopServiceError> {
        self.addresses.list_by_user(user_id).await
    }
}

// ── DeleteAddress ────────────────────────────────────────────────────────────

pub struct DeleteAddressUseCase<R: AddressRepository> {
    pub addresses: R,
}

impl<R: AddressRepository> DeleteAddressUseCase<R> {
    /// Only the owner can delete; someone else's address reads as missing.
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), ShopServiceError> {
        if self.addresses.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(ShopServiceError::AddressNotFound)
        }
    }
}
