use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::user::UserRole;

// ── Users & addresses ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: UserRole,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who is calling, as resolved from the bearer token against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    AuthenticatedAs(User),
}

impl AuthContext {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::AuthenticatedAs(user) => Some(user),
        }
    }
}

/// Fields a user may change on their own account. `None` leaves the field
/// as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.shipping_address_id.is_none()
            && self.billing_address_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl Address {
    /// Single-line form frozen into orders.
    pub fn formatted(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub tags: Option<BTreeSet<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.tags.is_none()
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(tags) = &self.tags {
            product.tags = tags.clone();
        }
    }
}

/// Flatten a tag set into the stored comma-separated form.
pub fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Rebuild a tag set from its stored form, dropping empty segments.
pub fn split_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart item joined with its product at the current price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.item.quantity)
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub net_amount: Decimal,
    /// Formatted shipping address at placement time.
    pub address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderProduct {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn new(order_id: Uuid, status: OrderStatus) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id,
            status,
            created_at: Utc::now(),
        }
    }
}

/// An order with its line items and chronological event history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub products: Vec<OrderProduct>,
    pub events: Vec<OrderEvent>,
}

/// Everything written when a cart becomes an order.
///
/// `cart_items` are the cart rows the order was priced from. The store must
/// find exactly these rows, with these quantities, when it clears them, or
/// write nothing.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order: Order,
    pub products: Vec<OrderProduct>,
    pub event: OrderEvent,
    pub cart_items: Vec<CartItem>,
}

impl OrderDraft {
    /// Snapshot `lines` into a PENDING order shipped to `address`.
    pub fn from_cart(user_id: Uuid, address: &Address, lines: &[CartLine]) -> Self {
        let now = Utc::now();
        let order_id = Uuid::now_v7();
        let net_amount = lines.iter().map(CartLine::line_total).sum();
        let products = lines
            .iter()
            .map(|line| OrderProduct {
                id: Uuid::now_v7(),
                order_id,
                product_id: line.product.id,
                quantity: line.item.quantity,
                unit_price: line.product.price,
            })
            .collect();
        Self {
            order: Order {
                id: order_id,
                user_id,
                net_amount,
                address: address.formatted(),
                status: OrderStatus::Pending,
                created_at: now,
                updated_at: now,
            },
            products,
            event: OrderEvent::new(order_id, OrderStatus::Pending),
            cart_items: lines.iter().map(|line| line.item.clone()).collect(),
        }
    }

    /// Whether `current`, the owner's cart as it stands now, is exactly the
    /// cart this draft was priced from: same rows, same quantities.
    pub fn matches_cart<'a>(&self, current: impl IntoIterator<Item = &'a CartItem>) -> bool {
        let mut priced: Vec<(Uuid, i32)> =
            self.cart_items.iter().map(|i| (i.id, i.quantity)).collect();
        let mut now: Vec<(Uuid, i32)> =
            current.into_iter().map(|i| (i.id, i.quantity)).collect();
        priced.sort_unstable();
        now.sort_unstable();
        priced == now
    }

    pub fn cart_item_ids(&self) -> Vec<Uuid> {
        self.cart_items.iter().map(|i| i.id).collect()
    }
}

/// Listing filter. `user_id: None` spans every user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

// ── Validation ───────────────────────────────────────────────────────────────

pub const MIN_USERNAME_LEN: usize = 4;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PRODUCT_TEXT_LEN: usize = 4;
pub const MAX_PRICE_SCALE: u32 = 2;
/// Largest unit price, in cents (99,999,999.99).
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;
/// Largest order total, in cents. Matches the `NUMERIC(18, 2)` column.
pub const MAX_ORDER_TOTAL_CENTS: i64 = 999_999_999_999_999_999;
pub const MAX_QUANTITY: i32 = 10_000;

/// `local@domain.tld` with no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_username(username: &str) -> bool {
    username.trim().chars().count() >= MIN_USERNAME_LEN
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn validate_product_text(text: &str) -> bool {
    text.trim().chars().count() >= MIN_PRODUCT_TEXT_LEN
}

/// Strictly positive, at most [`MAX_PRICE_CENTS`], with at most two
/// fractional digits.
pub fn validate_price(price: Decimal) -> bool {
    price > Decimal::ZERO
        && price <= Decimal::new(MAX_PRICE_CENTS, 2)
        && price.normalize().scale() <= MAX_PRICE_SCALE
}

pub fn validate_order_total(total: Decimal) -> bool {
    total <= Decimal::new(MAX_ORDER_TOTAL_CENTS, 2)
}

pub fn validate_quantity(quantity: i32) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}
