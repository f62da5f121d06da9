// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

/// Small persistent key/value store for user preferences
pub trait PreferenceStore {
    /// Defines the user-specified error type.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    fn preference(&self, key: &str) -> Result<Option<String>, Self::AdapterError>;

    fn set_preference(&self, key: &str, value: &str) -> Result<(), Self::AdapterError>;
}
