// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # SafeKart data model
//!
//! Plain values exchanged between the SafeKart sessions and whatever UI layer
//! drives them. Nothing in here owns behaviour beyond small derived views; the
//! state machines live in `safekart_core`.
//!

mod catalog;
mod order;
mod payload;
mod scan;
mod theme;
mod verification;

pub use catalog::Product;
pub use order::{OrderId, OrderRecord, OrderStatusStep, StepStatus};
pub use payload::EncodedPayload;
pub use scan::{ScanResult, ScanSource};
pub use theme::{Theme, THEME_PREFERENCE_KEY};
pub use verification::{
    RejectReason, RequestField, ValidationError, Verdict, VerificationOutcome,
    VerificationRequest,
};
