// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

/// Extracts a code payload from an uploaded image
#[async_trait]
pub trait ImageDecoder {
    /// Defines the user-specified error type.
    ///
    /// Any error is reported to the caller as a decode failure.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Decodes `image`, an opaque blob as picked by the user, into payload text.
    async fn decode(&self, image: &[u8]) -> Result<String, Self::AdapterError>;
}
