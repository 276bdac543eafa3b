use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use oderly_core::tracing::init_tracing;
use oderly_shop::config::ShopConfig;
use oderly_shop::router::build_router;
use oderly_shop::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,sqlx=warn");

    let config = ShopConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.shop_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("shop service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
