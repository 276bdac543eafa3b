use uuid::Uuid;

use crate::domain::repository::{CartRepository, ProductRepository};
use crate::domain::types::{CartItem, CartLine, MAX_QUANTITY, validate_quantity};
use crate::error::ShopServiceError;

fn check_quantity(quantity: i32) -> Result<(), ShopServiceError> {
    if validate_quantity(quantity) {
        Ok(())
    } else {
        Err(ShopServiceError::validation(format!(
            "quantity must be between 1 and {MAX_QUANTITY}"
        )))
    }
}

// ── AddToCart ────────────────────────────────────────────────────────────────

pub struct AddToCartUseCase<C: CartRepository, P: ProductRepository> {
    pub carts: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> AddToCartUseCase<C, P> {
    /// Adding a product already in the cart accumulates its quantity; the
    /// accumulated quantity is held to the same bound as a single add.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, ShopServiceError> {
        check_quantity(quantity)?;
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(ShopServiceError::ProductNotFound);
        }
        if let Some(existing) = self.carts.find_item(user_id, product_id).await? {
            check_quantity(existing.quantity.checked_add(quantity).unwrap_or(i32::MAX))?;
        }
        self.carts.add(user_id, product_id, quantity).await
    }
}

// ── GetCart ──────────────────────────────────────────────────────────────────

pub struct GetCartUseCase<C: CartRepository> {
    pub carts: C,
}

impl<C: CartRepository> GetCartUseCase<C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<CartLine>, ShopServiceError> {
        self.carts.list_lines(user_id).await
    }
}

// ── ChangeQuantity ───────────────────────────────────────────────────────────

pub struct ChangeQuantityUseCase<C: CartRepository> {
    pub carts: C,
}

impl<C: CartRepository> ChangeQuantityUseCase<C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, ShopServiceError> {
        check_quantity(quantity)?;
        self.carts
            .update_quantity(id, user_id, quantity)
            .await?
            .ok_or(ShopServiceError::CartItemNotFound)
    }
}

// ── RemoveCartItem ───────────────────────────────────────────────────────────

pub struct RemoveCartItemUseCase<C: CartRepository> {
    pub carts: C,
}

impl<C: CartRepository> RemoveCartItemUseCase<C> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), ShopServiceError> {
        if self.carts.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(ShopServiceError::CartItemNotFound)
        }
    }
}
