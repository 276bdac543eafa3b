//! sea-orm entities for the shop service.

pub mod addresses;
pub mod cart_items;
pub mod order_events;
pub mod order_products;
pub mod orders;
pub mod products;
pub mod users;
