//! Point-of-sale product catalog: products with GST-derived pricing, a
//! generated barcode and an optional photo kept in an object store.

pub mod api;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod pricing;
pub mod store;

use std::sync::Arc;

use crate::assets::LocalAssetStore;
use crate::catalog::ProductCatalog;
use crate::config::AppConfig;
use crate::store::SeaOrmProductStore;

/// Builds the catalog and the local asset store from configuration around an
/// already connected database.
pub fn build_catalog(
    config: &AppConfig,
    db: Arc<sea_orm::DatabaseConnection>,
) -> (Arc<ProductCatalog>, Arc<LocalAssetStore>) {
    let assets = Arc::new(LocalAssetStore::new(
        config.upload_dir.clone(),
        config.public_asset_url.clone(),
    ));
    let store = Arc::new(SeaOrmProductStore::new(db));
    let catalog = ProductCatalog::new(store, assets.clone())
        .with_max_image_bytes(config.file_size_limit);

    (Arc::new(catalog), assets)
}
