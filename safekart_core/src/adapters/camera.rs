// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

/// Acquires the video capability.
///
/// # Example
///
/// For example code see [crate::context::memory::InMemoryContext]
#[async_trait]
pub trait CameraProvider {
    /// Releasable handle on an acquired camera
    type Handle: CameraHandle + Send + Sync + 'static;

    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Any error returned by [`CameraProvider::request_video`] is reported as a
    /// refused permission.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Prompts for (or reuses) camera access and returns a handle on success.
    ///
    /// The latency of this call is opaque: it may wait on the user answering a
    /// permission prompt.
    async fn request_video(&self) -> Result<Self::Handle, Self::AdapterError>;
}

/// An acquired camera.
///
/// The sessions call [`CameraHandle::release`] exactly once per acquired
/// handle, on whichever exit path comes first.
pub trait CameraHandle {
    /// Payload decoded from the frames seen so far, if any
    fn detected_payload(&self) -> Option<String>;

    /// Stops the video tracks and gives the device back
    fn release(&self);
}
