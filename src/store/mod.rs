mod database;

pub use database::{connect, SeaOrmProductStore};

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::entities::product::{self, PrimaryUnit, ProductType};

#[derive(Clone, Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(String),
    #[error("Product {0} disappeared while being written")]
    Vanished(i32),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        Self::Db(err.to_string())
    }
}

/// Everything the catalog writes about a product. The store owns `id`,
/// `created_at` and `updated_at`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductRecord {
    pub item_name: String,
    pub sell_price: f64,
    pub product_type: ProductType,
    pub primary_unit: Option<PrimaryUnit>,
    pub custom_unit: Option<String>,
    pub gst_enabled: bool,
    pub gst_percentage: i32,
    pub gst_amount: f64,
    pub total_price: f64,
    pub barcode: String,
    pub image_url: String,
}

impl From<product::Model> for ProductRecord {
    fn from(model: product::Model) -> Self {
        Self {
            item_name: model.item_name,
            sell_price: model.sell_price,
            product_type: model.product_type,
            primary_unit: model.primary_unit,
            custom_unit: model.custom_unit,
            gst_enabled: model.gst_enabled,
            gst_percentage: model.gst_percentage,
            gst_amount: model.gst_amount,
            total_price: model.total_price,
            barcode: model.barcode,
            image_url: model.image_url,
        }
    }
}

/// Persistence of product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, record: ProductRecord) -> Result<product::Model, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<product::Model>, StoreError>;

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<product::Model>, StoreError>;

    async fn update(&self, id: i32, record: ProductRecord) -> Result<product::Model, StoreError>;

    /// Removes the record and returns its last state, `None` if it was absent.
    async fn delete(&self, id: i32) -> Result<Option<product::Model>, StoreError>;

    /// All records, most recently created first.
    async fn list_all(&self) -> Result<Vec<product::Model>, StoreError>;
}
