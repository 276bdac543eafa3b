use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_addresses;
mod m20260101_000003_link_user_addresses;
mod m20260101_000004_create_products;
mod m20260101_000005_create_cart_items;
mod m20260101_000006_create_orders;
mod m20260101_000007_create_order_products;
mod m20260101_000008_create_order_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_addresses::Migration),
            Box::new(m20260101_000003_link_user_addresses::Migration),
            Box::new(m20260101_000004_create_products::Migration),
            Box::new(m20260101_000005_create_cart_items::Migration),
            Box::new(m20260101_000006_create_orders::Migration),
            Box::new(m20260101_000007_create_order_products::Migration),
            Box::new(m20260101_000008_create_order_events::Migration),
        ]
    }
}
