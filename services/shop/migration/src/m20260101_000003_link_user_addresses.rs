use sea_orm_migration::prelude::*;

const FK_SHIPPING: &str = "fk_users_shipping_address_id";
const FK_BILLING: &str = "fk_users_billing_address_id";

/// Address links on `users` are added after `addresses` exists; deleting an
/// address clears the link instead of failing.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SHIPPING)
                    .from(Users::Table, Users::ShippingAddressId)
                    .to(Addresses::Table, Addresses::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BILLING)
                    .from(Users::Table, Users::BillingAddressId)
                    .to(Addresses::Table, Addresses::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BILLING)
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SHIPPING)
                    .table(Users::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    ShippingAddressId,
    BillingAddressId,
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
}
