// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! In-memory context implementation for the SafeKart sessions.
//!
//! [`InMemoryContext`] implements every adapter of [`crate::adapters`] over
//! shared in-memory storage, seeded with the demo data set: three orders, the
//! six verified catalog products, a camera that always detects
//! [`DEMO_CAMERA_PAYLOAD`] and a decoder that reads [`DEMO_UPLOAD_PAYLOAD`]
//! from any non-empty image. Clones share their storage.

mod orders;
mod products;
mod svg;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};

use async_trait::async_trait;
use safekart_model::{
    EncodedPayload, OrderId, OrderRecord, Product, Verdict, VerificationRequest,
};
use thiserror::Error;

use crate::{
    adapters::*,
    config::{DEMO_CAMERA_PAYLOAD, DEMO_UPLOAD_PAYLOAD},
};

pub type OrderStorage = Arc<RwLock<HashMap<OrderId, OrderRecord>>>;
pub type ProductStorage = Arc<RwLock<Vec<Product>>>;
pub type PreferenceStorage = Arc<RwLock<HashMap<String, String>>>;
pub type ExportStorage = Arc<RwLock<Vec<Export>>>;
pub type VerdictStorage = Arc<RwLock<HashMap<String, Verdict>>>;

#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("something went wrong: {error}")]
    AdapterError { error: String },
    #[error("camera access was refused")]
    CameraDenied,
    #[error("camera is in use by another scan")]
    CameraInUse,
    #[error("image is unreadable")]
    UnreadableImage,
}

/// Something handed to the export sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Copied(String),
    Downloaded { filename: String, bytes: Vec<u8> },
}

#[derive(Debug)]
struct CameraState {
    allowed: AtomicBool,
    in_use: AtomicBool,
    acquisitions: AtomicUsize,
    releases: AtomicUsize,
    payload: RwLock<Option<String>>,
}

#[derive(Clone)]
pub struct InMemoryContext {
    orders: OrderStorage,
    products: ProductStorage,
    preferences: PreferenceStorage,
    exports: ExportStorage,
    verdicts: VerdictStorage,
    camera: Arc<CameraState>,
    /// makes the order store, catalog and verification service fail
    unavailable: Arc<AtomicBool>,
    order_latency: Arc<RwLock<Duration>>,
}

impl InMemoryContext {
    /// An empty context: no orders, no products, camera allowed
    pub fn new() -> Self {
        InMemoryContext {
            orders: Default::default(),
            products: Default::default(),
            preferences: Default::default(),
            exports: Default::default(),
            verdicts: Default::default(),
            camera: Arc::new(CameraState {
                allowed: AtomicBool::new(true),
                in_use: AtomicBool::new(false),
                acquisitions: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
                payload: RwLock::new(Some(DEMO_CAMERA_PAYLOAD.to_string())),
            }),
            unavailable: Arc::new(AtomicBool::new(false)),
            order_latency: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// A context seeded with the demo orders and catalog
    pub fn demo() -> Self {
        let context = Self::new();
        for record in orders::demo_orders() {
            context.insert_order(record);
        }
        *context.products.write().unwrap() = products::demo_products();
        context
    }

    pub fn with_camera_permission(self, allowed: bool) -> Self {
        self.set_camera_permission(allowed);
        self
    }

    /// Simulates the user changing the OS camera setting
    pub fn set_camera_permission(&self, allowed: bool) {
        self.camera.allowed.store(allowed, Ordering::SeqCst);
    }

    /// Sets what the camera detects; `None` means nothing is ever detected
    pub fn set_camera_payload(&self, payload: Option<&str>) {
        *self.camera.payload.write().unwrap() = payload.map(str::to_string);
    }

    pub fn camera_acquisitions(&self) -> usize {
        self.camera.acquisitions.load(Ordering::SeqCst)
    }

    pub fn camera_releases(&self) -> usize {
        self.camera.releases.load(Ordering::SeqCst)
    }

    pub fn camera_in_use(&self) -> bool {
        self.camera.in_use.load(Ordering::SeqCst)
    }

    pub fn insert_order(&self, record: OrderRecord) {
        self.orders
            .write()
            .unwrap()
            .insert(record.order_id.clone(), record);
    }

    /// Delays every order store answer by `latency`
    pub fn set_order_latency(&self, latency: Duration) {
        *self.order_latency.write().unwrap() = latency;
    }

    /// Makes the verification service answer `Counterfeit` for `barcode`
    pub fn flag_counterfeit(&self, barcode: &str, reason: &str) {
        self.verdicts.write().unwrap().insert(
            barcode.to_string(),
            Verdict::Counterfeit {
                reason: reason.to_string(),
            },
        );
    }

    /// Makes the remote collaborators (orders, catalog, verification) fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn exports(&self) -> Vec<Export> {
        self.exports.read().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), InMemoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(InMemoryError::AdapterError {
                error: "service unavailable".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera handle of [`InMemoryContext`]
#[derive(Debug)]
pub struct InMemoryCamera {
    camera: Arc<CameraState>,
    payload: Option<String>,
}

impl CameraHandle for InMemoryCamera {
    fn detected_payload(&self) -> Option<String> {
        self.payload.clone()
    }

    fn release(&self) {
        self.camera.releases.fetch_add(1, Ordering::SeqCst);
        self.camera.in_use.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl CameraProvider for InMemoryContext {
    type Handle = InMemoryCamera;
    type AdapterError = InMemoryError;

    async fn request_video(&self) -> Result<Self::Handle, Self::AdapterError> {
        if !self.camera.allowed.load(Ordering::SeqCst) {
            return Err(InMemoryError::CameraDenied);
        }
        if self.camera.in_use.swap(true, Ordering::SeqCst) {
            return Err(InMemoryError::CameraInUse);
        }
        self.camera.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryCamera {
            camera: self.camera.clone(),
            payload: self.camera.payload.read().unwrap().clone(),
        })
    }
}

#[async_trait]
impl ImageDecoder for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn decode(&self, image: &[u8]) -> Result<String, Self::AdapterError> {
        if image.is_empty() {
            return Err(InMemoryError::UnreadableImage);
        }
        Ok(DEMO_UPLOAD_PAYLOAD.to_string())
    }
}

#[async_trait]
impl VerificationService for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn verify(&self, request: &VerificationRequest) -> Result<Verdict, Self::AdapterError> {
        self.check_available()?;
        Ok(self
            .verdicts
            .read()
            .unwrap()
            .get(request.barcode.trim())
            .cloned()
            .unwrap_or(Verdict::Authentic))
    }
}

#[async_trait]
impl OrderStore for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn find_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, Self::AdapterError> {
        let latency = *self.order_latency.read().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.check_available()?;
        Ok(self.orders.read().unwrap().get(order_id).cloned())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn products(&self) -> Result<Vec<Product>, Self::AdapterError> {
        self.check_available()?;
        Ok(self.products.read().unwrap().clone())
    }
}

impl PayloadEncoder for InMemoryContext {
    fn encode(&self, text: &str) -> EncodedPayload {
        EncodedPayload::new(text, svg::MEDIA_TYPE, svg::render(text))
    }
}

impl ExportSink for InMemoryContext {
    type AdapterError = InMemoryError;

    fn copy_text(&self, text: &str) -> Result<(), Self::AdapterError> {
        self.exports
            .write()
            .unwrap()
            .push(Export::Copied(text.to_string()));
        Ok(())
    }

    fn download(&self, filename: &str, bytes: &[u8]) -> Result<(), Self::AdapterError> {
        self.exports.write().unwrap().push(Export::Downloaded {
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

impl PreferenceStore for InMemoryContext {
    type AdapterError = InMemoryError;

    fn preference(&self, key: &str) -> Result<Option<String>, Self::AdapterError> {
        Ok(self.preferences.read().unwrap().get(key).cloned())
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<(), Self::AdapterError> {
        self.preferences
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
