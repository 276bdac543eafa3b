use anyhow::anyhow;
use tracing::info;
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::pagination::PageRequest;

use crate::domain::repository::{AddressRepository, CartRepository, OrderRepository};
use crate::domain::types::{
    Order, OrderDetail, OrderDraft, OrderFilter, User, validate_order_total,
};
use crate::error::ShopServiceError;

/// Whether `user` may see `order`: its owner or an admin.
fn visible_to(order: &Order, user: &User) -> bool {
    order.user_id == user.id || user.role.is_admin()
}

/// Compare-and-set `order` to `to`, appending one event.
async fn transition<O: OrderRepository>(
    orders: &O,
    order: Order,
    to: OrderStatus,
) -> Result<Order, ShopServiceError> {
    if !order.status.can_transition_to(to) {
        return Err(ShopServiceError::InvalidStatusTransition);
    }
    let event = orders
        .transition_status(order.id, order.status, to)
        .await?
        .ok_or_else(|| anyhow!("order {} status changed concurrently", order.id))?;
    info!(
        order_id = %order.id,
        from = %order.status,
        to = %to,
        "order status changed"
    );
    Ok(Order {
        status: to,
        updated_at: event.created_at,
        ..order
    })
}

// ── PlaceOrder ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PlaceOrderOutcome {
    /// Nothing in the cart; nothing was written.
    EmptyCart,
    Placed(OrderDetail),
}

pub struct PlaceOrderUseCase<C: CartRepository, A: AddressRepository, O: OrderRepository> {
    pub carts: C,
    pub addresses: A,
    pub orders: O,
}

impl<C, A, O> PlaceOrderUseCase<C, A, O>
where
    C: CartRepository,
    A: AddressRepository,
    O: OrderRepository,
{
    /// Turn `user`'s cart into a PENDING order shipped to their shipping
    /// address, clearing the cart in the same transaction.
    pub async fn execute(&self, user: &User) -> Result<PlaceOrderOutcome, ShopServiceError> {
        let lines = self.carts.list_lines(user.id).await?;
        if lines.is_empty() {
            return Ok(PlaceOrderOutcome::EmptyCart);
        }

        let address_id = user
            .shipping_address_id
            .ok_or(ShopServiceError::AddressNotFound)?;
        let address = self
            .addresses
            .find_by_id(address_id)
            .await?
            .filter(|a| a.user_id == user.id)
            .ok_or(ShopServiceError::AddressNotFound)?;

        let draft = OrderDraft::from_cart(user.id, &address, &lines);
        if !validate_order_total(draft.order.net_amount) {
            return Err(ShopServiceError::validation("order total is too large"));
        }
        self.orders.place(&draft).await?;
        info!(
            order_id = %draft.order.id,
            user_id = %user.id,
            net_amount = %draft.order.net_amount,
            lines = draft.products.len(),
            "order placed"
        );

        Ok(PlaceOrderOutcome::Placed(OrderDetail {
            order: draft.order,
            products: draft.products,
            events: vec![draft.event],
        }))
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    pub async fn execute(&self, caller: &User, id: Uuid) -> Result<OrderDetail, ShopServiceError> {
        self.orders
            .find_detail(id)
            .await?
            .filter(|detail| visible_to(&detail.order, caller))
            .ok_or(ShopServiceError::OrderNotFound)
    }
}

// ── ListOrders ───────────────────────────────────────────────────────────────

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    /// At most one page, newest first.
    pub async fn execute(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, ShopServiceError> {
        self.orders.list(filter, page.clamped()).await
    }
}

// ── CancelOrder ──────────────────────────────────────────────────────────────

pub struct CancelOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CancelOrderUseCase<O> {
    pub async fn execute(&self, caller: &User, id: Uuid) -> Result<Order, ShopServiceError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .filter(|order| visible_to(order, caller))
            .ok_or(ShopServiceError::OrderNotFound)?;
        transition(&self.orders, order, OrderStatus::Cancelled).await
    }
}

// ── ChangeOrderStatus ────────────────────────────────────────────────────────

pub struct ChangeOrderStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ChangeOrderStatusUseCase<O> {
    pub async fn execute(&self, id: Uuid, to: OrderStatus) -> Result<Order, ShopServiceError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(ShopServiceError::OrderNotFound)?;
        transition(&self.orders, order, to).await
    }
}
