//! Product lifecycle: validation, image assets, pricing and persistence,
//! in that order for every write.

mod barcode;
mod input;
mod media;

pub use barcode::generate_barcode;
pub use input::{ProductFields, ValidProduct};
pub use media::{asset_key_from_url, ImageUpload, DEFAULT_MAX_IMAGE_BYTES, KEY_PREFIX};

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::assets::{AssetDeletion, AssetError, AssetStore};
use crate::entities::product;
use crate::error::CatalogError;
use crate::pricing;
use crate::store::{ProductRecord, ProductStore, StoreError};
use input::ProductInput;

const BARCODE_ATTEMPTS: usize = 5;

pub struct ProductCatalog {
    store: Arc<dyn ProductStore>,
    assets: Arc<dyn AssetStore>,
    max_image_bytes: usize,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn ProductStore>, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            assets,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    pub async fn create(
        &self,
        fields: ProductFields,
        image: Option<ImageUpload>,
    ) -> Result<product::Model, CatalogError> {
        let valid = ProductInput::for_create(fields).into_valid()?;
        if let Some(image) = &image {
            image.check(self.max_image_bytes)?;
        }

        let barcode = self.allocate_barcode().await?;

        let uploaded = match image {
            Some(image) => Some(self.upload(image).await?),
            None => None,
        };
        let image_url = uploaded
            .as_ref()
            .map(|(_, url)| url.clone())
            .unwrap_or_default();

        match self.store.insert(build_record(valid, barcode, image_url)).await {
            Ok(created) => {
                info!(
                    product_id = created.id,
                    barcode = %created.barcode,
                    has_image = !created.image_url.is_empty(),
                    "Product created"
                );
                Ok(created)
            }
            Err(err) => {
                if let Some((key, _)) = uploaded {
                    self.discard_upload(&key).await;
                }
                Err(err.into())
            }
        }
    }

    /// Merges `fields` over the stored product. A new image replaces the
    /// previous one, which is deleted first.
    pub async fn update(
        &self,
        id: i32,
        fields: ProductFields,
        image: Option<ImageUpload>,
    ) -> Result<product::Model, CatalogError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let valid = ProductInput::for_update(fields, &existing).into_valid()?;
        if let Some(image) = &image {
            image.check(self.max_image_bytes)?;
        }

        let mut image_url = existing.image_url.clone();
        let mut uploaded_key = None;
        let mut prior_released = false;

        if let Some(image) = image {
            if !existing.image_url.is_empty() {
                match self.release_asset(&existing.image_url).await {
                    Ok(()) => prior_released = true,
                    Err(err) => {
                        warn!(product_id = id, error = %err, "Keeping stale asset after failed delete");
                    }
                }
            }

            match self.upload(image).await {
                Ok((key, url)) => {
                    image_url = url;
                    uploaded_key = Some(key);
                }
                Err(err) => {
                    if prior_released {
                        self.clear_image_url(existing).await;
                    }
                    return Err(err);
                }
            }
        }

        let record = build_record(valid, existing.barcode.clone(), image_url);
        match self.store.update(id, record).await {
            Ok(updated) => {
                info!(product_id = updated.id, "Product updated");
                Ok(updated)
            }
            Err(err) => {
                if let Some(key) = uploaded_key {
                    self.discard_upload(&key).await;
                }
                match err {
                    StoreError::Vanished(id) => Err(CatalogError::NotFound(id)),
                    other => {
                        if prior_released {
                            self.clear_image_url(existing).await;
                        }
                        Err(other.into())
                    }
                }
            }
        }
    }

    /// Removes the product and its photo. A failed photo delete is logged
    /// and does not stop the record removal.
    pub async fn delete(&self, id: i32) -> Result<product::Model, CatalogError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if !existing.image_url.is_empty() {
            if let Err(err) = self.release_asset(&existing.image_url).await {
                warn!(product_id = id, error = %err, "Deleting product despite asset cleanup failure");
            }
        }

        let deleted = self
            .store
            .delete(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        info!(product_id = id, "Product deleted");

        Ok(deleted)
    }

    pub async fn get(&self, id: i32) -> Result<product::Model, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<product::Model>, CatalogError> {
        Ok(self.store.list_all().await?)
    }

    async fn allocate_barcode(&self) -> Result<String, CatalogError> {
        for attempt in 1..=BARCODE_ATTEMPTS {
            let candidate = generate_barcode();
            match self.store.find_by_barcode(&candidate).await? {
                None => return Ok(candidate),
                Some(taken) => warn!(
                    attempt,
                    barcode = %candidate,
                    product_id = taken.id,
                    "Barcode already assigned, drawing again"
                ),
            }
        }
        Err(StoreError::Unavailable(format!(
            "no free barcode after {} attempts",
            BARCODE_ATTEMPTS
        ))
        .into())
    }

    async fn upload(&self, image: ImageUpload) -> Result<(String, String), CatalogError> {
        let key = image.fresh_key();
        let url = self
            .assets
            .put(&key, image.bytes, &image.content_type)
            .await
            .map_err(|err| {
                error!(key = %key, error = %err, "Asset upload failed");
                CatalogError::AssetUpload(err)
            })?;
        Ok((key, url))
    }

    async fn release_asset(&self, image_url: &str) -> Result<(), CatalogError> {
        let Some(key) = asset_key_from_url(image_url) else {
            return Err(CatalogError::AssetDelete(AssetError::InvalidKey(
                image_url.to_owned(),
            )));
        };
        match self.assets.delete(&key).await {
            Ok(AssetDeletion::Deleted) => Ok(()),
            Ok(AssetDeletion::NotFound) => {
                warn!(key = %key, "Asset was already gone");
                Ok(())
            }
            Err(err) => Err(CatalogError::AssetDelete(err)),
        }
    }

    /// Compensation for an upload whose record never got persisted.
    async fn discard_upload(&self, key: &str) {
        match self.assets.delete(key).await {
            Ok(_) => info!(key = %key, "Rolled back asset upload"),
            Err(err) => error!(key = %key, error = %err, "Failed to roll back asset upload"),
        }
    }

    /// Keeps the record from pointing at an asset that was already deleted.
    async fn clear_image_url(&self, existing: product::Model) {
        let id = existing.id;
        let mut record = ProductRecord::from(existing);
        record.image_url = String::new();
        if let Err(err) = self.store.update(id, record).await {
            error!(product_id = id, error = %err, "Failed to clear image url after asset loss");
        }
    }
}

fn build_record(valid: ValidProduct, barcode: String, image_url: String) -> ProductRecord {
    let pricing = pricing::compute(valid.sell_price, valid.gst_enabled);
    ProductRecord {
        item_name: valid.item_name,
        sell_price: valid.sell_price,
        product_type: valid.product_type,
        primary_unit: valid.primary_unit,
        custom_unit: valid.custom_unit,
        gst_enabled: valid.gst_enabled,
        gst_percentage: pricing.gst_percentage,
        gst_amount: pricing.gst_amount,
        total_price: pricing.total_price,
        barcode,
        image_url,
    }
}
