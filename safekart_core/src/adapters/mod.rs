// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Context adapters for the SafeKart sessions.
//!
//! Every external collaborator of a session (camera, image decoder, order
//! store, authenticity service, encoder, clipboard, preferences) is reached
//! through one of these traits. A session is generic over a context type
//! implementing the adapters it needs, so the demo data set
//! ([`crate::context::memory::InMemoryContext`]) and a production backend
//! satisfy the same contract.

mod camera;
mod catalog;
mod decoder;
mod encoder;
mod export;
mod order;
mod preference;
mod verifier;

pub use camera::{CameraHandle, CameraProvider};
pub use catalog::ProductCatalog;
pub use decoder::ImageDecoder;
pub use encoder::PayloadEncoder;
pub use export::ExportSink;
pub use order::OrderStore;
pub use preference::PreferenceStore;
pub use verifier::VerificationService;
