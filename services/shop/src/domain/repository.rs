#![allow(async_fn_in_trait)]

use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::pagination::PageRequest;
use oderly_domain::user::UserRole;

use crate::domain::types::{
    Address, CartItem, CartLine, Order, OrderDetail, OrderDraft, OrderEvent, OrderFilter,
    Product, ProductPatch, User, UserPatch,
};
use crate::error::ShopServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ShopServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ShopServiceError>;

    /// Insert a new account. A duplicate email is [`ShopServiceError::UserAlreadyExists`].
    async fn create(&self, user: &User) -> Result<(), ShopServiceError>;

    /// Apply `patch`, returning the updated user or `None` if it does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        patch: &UserPatch,
    ) -> Result<Option<User>, ShopServiceError>;

    async fn update_role(&self, id: Uuid, role: UserRole)
    -> Result<Option<User>, ShopServiceError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ShopServiceError>;
}

/// Repository for user addresses.
pub trait AddressRepository: Send + Sync {
    async fn create(&self, address: &Address) -> Result<(), ShopServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, ShopServiceError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, ShopServiceError>;

    /// Delete an address owned by `user_id`. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, ShopServiceError>;
}

/// Repository for the product catalog.
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<(), ShopServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ShopServiceError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Product>, ShopServiceError>;
    async fn count(&self) -> Result<u64, ShopServiceError>;

    /// Apply `patch`, returning the updated product or `None` if it does not exist.
    async fn update(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, ShopServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ShopServiceError>;

    /// Case-insensitive substring match over name, description and tags.
    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Product>, ShopServiceError>;
}

/// Repository for cart items.
pub trait CartRepository: Send + Sync {
    /// Add `quantity` of a product, accumulating onto an existing line.
    async fn add(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, ShopServiceError>;

    /// The line holding `product_id` in `user_id`'s cart, if any.
    async fn find_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, ShopServiceError>;

    /// Every cart item of `user_id` joined with its product.
    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, ShopServiceError>;

    /// Set the quantity of a line owned by `user_id`. `None` if no such line.
    async fn update_quantity(
        &self,
        id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, ShopServiceError>;

    /// Delete a line owned by `user_id`. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, ShopServiceError>;
}

/// Repository for orders, their line items and event history.
pub trait OrderRepository: Send + Sync {
    /// Persist the order, its line items and creation event, and delete the
    /// cart items it was priced from, all in one transaction.
    ///
    /// The owner's cart is re-read under lock first. Fails without writing
    /// anything unless it still holds exactly `draft.cart_items`, with the
    /// same quantities.
    async fn place(&self, draft: &OrderDraft) -> Result<(), ShopServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, ShopServiceError>;

    /// Order with line items and events, events oldest first.
    async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, ShopServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, ShopServiceError>;

    /// Move an order from `from` to `to` and append the matching event in one
    /// transaction. Returns `None`, writing nothing, when the stored status
    /// is no longer `from`.
    async fn transition_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderEvent>, ShopServiceError>;
}
