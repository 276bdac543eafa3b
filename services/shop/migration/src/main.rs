use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(oderly_shop_migration::Migrator).await;
}
