// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use safekart_model::Product;

/// Source of the trusted inventory
#[async_trait]
pub trait ProductCatalog {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Returns every product of the inventory, in display order.
    async fn products(&self) -> Result<Vec<Product>, Self::AdapterError>;
}
