use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pos_catalog::api::create_api_router;
use pos_catalog::build_catalog;
use pos_catalog::config::AppConfig;
use pos_catalog::entities::setup_schema;
use pos_catalog::store::connect;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let db = connect(&config.database_url).await?;
    setup_schema(&db).await?;
    let shared_db = Arc::new(db);

    let (catalog, assets) = build_catalog(&config, shared_db);
    let app = create_api_router(catalog, assets);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Catalog listening");
    axum::serve(listener, app).await?;

    Ok(())
}
