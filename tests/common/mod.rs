#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pos_catalog::assets::{AssetDeletion, AssetError, AssetStore};
use pos_catalog::catalog::{ImageUpload, ProductCatalog, ProductFields};
use pos_catalog::entities::{product, setup_schema};
use pos_catalog::store::{connect, ProductRecord, ProductStore, SeaOrmProductStore, StoreError};

pub const CDN_BASE: &str = "https://cdn.example.test";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetOp {
    Put(String),
    Delete(String),
}

/// In-memory asset store that records every call and can be told to fail.
#[derive(Default)]
pub struct FakeAssetStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    ops: Mutex<Vec<AssetOp>>,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeAssetStore {
    pub fn ops(&self) -> Vec<AssetOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetStore for FakeAssetStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AssetError> {
        self.ops.lock().unwrap().push(AssetOp::Put(key.to_owned()));
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AssetError::Unavailable("put refused".to_owned()));
        }
        self.objects.lock().unwrap().insert(key.to_owned(), bytes);
        Ok(format!("{}/{}", CDN_BASE, key))
    }

    async fn delete(&self, key: &str) -> Result<AssetDeletion, AssetError> {
        self.ops.lock().unwrap().push(AssetOp::Delete(key.to_owned()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AssetError::Unavailable("delete refused".to_owned()));
        }
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(AssetDeletion::Deleted),
            None => Ok(AssetDeletion::NotFound),
        }
    }
}

/// Record store that delegates to sqlite but can refuse writes.
pub struct FlakyStore {
    inner: SeaOrmProductStore,
    fail_insert: AtomicBool,
    refused_updates: AtomicUsize,
}

impl FlakyStore {
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Refuses the next `count` updates, then lets them through again.
    pub fn refuse_updates(&self, count: usize) {
        self.refused_updates.store(count, Ordering::SeqCst);
    }

    fn take_refusal(&self) -> bool {
        self.refused_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ProductStore for FlakyStore {
    async fn insert(&self, record: ProductRecord) -> Result<product::Model, StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("insert refused".to_owned()));
        }
        self.inner.insert(record).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<product::Model>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<product::Model>, StoreError> {
        self.inner.find_by_barcode(barcode).await
    }

    async fn update(&self, id: i32, record: ProductRecord) -> Result<product::Model, StoreError> {
        if self.take_refusal() {
            return Err(StoreError::Unavailable("update refused".to_owned()));
        }
        self.inner.update(id, record).await
    }

    async fn delete(&self, id: i32) -> Result<Option<product::Model>, StoreError> {
        self.inner.delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<product::Model>, StoreError> {
        self.inner.list_all().await
    }
}

pub struct Harness {
    pub catalog: ProductCatalog,
    pub assets: Arc<FakeAssetStore>,
    pub store: Arc<FlakyStore>,
}

pub async fn harness() -> Harness {
    let db = connect("sqlite::memory:").await.expect("Failed to open sqlite");
    setup_schema(&db).await.expect("Failed to create schema");

    let store = Arc::new(FlakyStore {
        inner: SeaOrmProductStore::new(Arc::new(db)),
        fail_insert: AtomicBool::new(false),
        refused_updates: AtomicUsize::new(0),
    });
    let assets = Arc::new(FakeAssetStore::default());
    let catalog = ProductCatalog::new(store.clone(), assets.clone());

    Harness {
        catalog,
        assets,
        store,
    }
}

pub fn fields(name: &str, price: f64, gst_enabled: bool) -> ProductFields {
    ProductFields {
        item_name: Some(name.to_owned()),
        sell_price: Some(price),
        gst_enabled: Some(gst_enabled.to_string()),
        ..Default::default()
    }
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

/// Key of an asset published by [`FakeAssetStore`].
pub fn key_of(url: &str) -> String {
    url.trim_start_matches(CDN_BASE)
        .trim_start_matches('/')
        .to_owned()
}
