use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::product::{self, Entity as ProductEntity};
use crate::store::{ProductRecord, ProductStore, StoreError};

/// Opens a connection pool. In-memory sqlite databases live inside a single
/// connection, so the pool is pinned to one.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    Database::connect(options).await
}

#[derive(Clone)]
pub struct SeaOrmProductStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn apply(active: &mut product::ActiveModel, record: ProductRecord) {
    active.item_name = Set(record.item_name);
    active.sell_price = Set(record.sell_price);
    active.product_type = Set(record.product_type);
    active.primary_unit = Set(record.primary_unit);
    active.custom_unit = Set(record.custom_unit);
    active.gst_enabled = Set(record.gst_enabled);
    active.gst_percentage = Set(record.gst_percentage);
    active.gst_amount = Set(record.gst_amount);
    active.total_price = Set(record.total_price);
    active.barcode = Set(record.barcode);
    active.image_url = Set(record.image_url);
}

#[async_trait]
impl ProductStore for SeaOrmProductStore {
    async fn insert(&self, record: ProductRecord) -> Result<product::Model, StoreError> {
        let now = Utc::now();
        let mut new_product = product::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply(&mut new_product, record);

        Ok(new_product.insert(&*self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<product::Model>, StoreError> {
        Ok(ProductEntity::find_by_id(id).one(&*self.db).await?)
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<product::Model>, StoreError> {
        Ok(ProductEntity::find()
            .filter(product::Column::Barcode.eq(barcode))
            .one(&*self.db)
            .await?)
    }

    async fn update(&self, id: i32, record: ProductRecord) -> Result<product::Model, StoreError> {
        let txn = self.db.begin().await?;

        let existing = match ProductEntity::find_by_id(id).one(&txn).await? {
            Some(model) => model,
            None => {
                let _ = txn.rollback().await;
                return Err(StoreError::Vanished(id));
            }
        };

        let mut active: product::ActiveModel = existing.into();
        apply(&mut active, record);
        active.updated_at = Set(Utc::now());

        match active.update(&txn).await {
            Ok(updated) => {
                txn.commit().await?;
                Ok(updated)
            }
            Err(err) => {
                let _ = txn.rollback().await;
                Err(err.into())
            }
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<product::Model>, StoreError> {
        let txn = self.db.begin().await?;

        let existing = match ProductEntity::find_by_id(id).one(&txn).await? {
            Some(model) => model,
            None => {
                let _ = txn.rollback().await;
                return Ok(None);
            }
        };

        let active: product::ActiveModel = existing.clone().into();
        match active.delete(&txn).await {
            Ok(_) => {
                txn.commit().await?;
                Ok(Some(existing))
            }
            Err(err) => {
                let _ = txn.rollback().await;
                Err(err.into())
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<product::Model>, StoreError> {
        Ok(ProductEntity::find()
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .all(&*self.db)
            .await?)
    }
}
