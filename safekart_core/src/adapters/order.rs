// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use safekart_model::{OrderId, OrderRecord};

/// Resolves order identifiers to records.
///
/// # Example
///
/// For example code see [crate::context::memory::InMemoryContext]
#[async_trait]
pub trait OrderStore {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Retrieves the record of `order_id`.
    ///
    /// `order_id` is already canonical. An unknown order is `Ok(None)`, not an
    /// error.
    async fn find_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, Self::AdapterError>;
}
