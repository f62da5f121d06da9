// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # SafeKart sessions
//!
//! State machines governing the asynchronous, fallible workflows of the
//! SafeKart storefront:
//!
//! - [`permission::PermissionGate`]: requests and tracks camera access.
//! - [`scan::ScanSession`]: camera or file scan attempts.
//! - [`verification::VerificationSession`]: product attribute validation and
//!   timed settlement.
//! - [`timeline::OrderTimeline`]: order resolution and timeline views.
//! - [`codegen::CodeGenerationSession`]: text to encoded payload.
//! - [`catalog::CatalogSearch`] and [`theme::ThemePreference`]: trusted catalog
//!   search and the persisted theme.
//!
//! Every external collaborator is reached through the traits of [`adapters`].
//! A session is generic over a context implementing the adapters it needs; the
//! `in_memory` feature provides [`context::memory::InMemoryContext`], backed by
//! the demo data set.
//!
//! ## Getting started
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> safekart_core::Result<()> {
//! use safekart_core::{
//!     config::SessionTimings, context::memory::InMemoryContext, timeline::OrderTimeline,
//! };
//!
//! let timeline = OrderTimeline::new(InMemoryContext::demo(), SessionTimings::immediate());
//! let lookup = timeline.lookup("sk123456789").await?;
//! assert!(lookup.record().is_some());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod catalog;
pub mod codegen;
pub mod config;
#[cfg(feature = "in_memory")]
pub mod context;
mod error;
pub mod permission;
pub mod scan;
pub mod theme;
pub mod timeline;
pub mod verification;

pub use error::{Error, Result};
