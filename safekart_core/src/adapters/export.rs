// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

/// Write-only sink for clipboard copies and file downloads.
///
/// Exports are best-effort: sessions log a failing export and carry on.
pub trait ExportSink {
    /// Defines the user-specified error type.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    fn copy_text(&self, text: &str) -> Result<(), Self::AdapterError>;

    fn download(&self, filename: &str, bytes: &[u8]) -> Result<(), Self::AdapterError>;
}
