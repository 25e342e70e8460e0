pub mod assets;
pub mod error;
pub mod product;

use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::assets::LocalAssetStore;
use crate::catalog::ProductCatalog;
use crate::middleware::logging::logging_middleware;

use assets::asset_router;
use product::product_router;

pub fn create_api_router(catalog: Arc<ProductCatalog>, assets: Arc<LocalAssetStore>) -> Router {
    Router::new()
        .merge(product_router(catalog))
        .merge(asset_router(assets))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
