// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use safekart_model::{Verdict, VerificationRequest};

/// Remote authenticity check consulted once a request passed local validation
#[async_trait]
pub trait VerificationService {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Returns the verdict for an already validated request.
    async fn verify(&self, request: &VerificationRequest) -> Result<Verdict, Self::AdapterError>;
}
