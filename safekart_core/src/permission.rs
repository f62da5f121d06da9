// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Camera permission tracking
//!
//! The [`PermissionGate`] remembers whether camera access was granted and keeps
//! the active capability so repeated requests reuse it instead of prompting
//! again. A refused request leaves the gate `Denied`, but the next request
//! still asks the provider: the user may have changed the OS settings since.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::{CameraHandle, CameraProvider},
    Error, Result,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Unrequested,
    Granted,
    Denied,
}

pub struct PermissionGate<E>
where
    E: CameraProvider,
{
    provider: E,
    inner: Mutex<GateInner<E::Handle>>,
}

struct GateInner<H> {
    state: PermissionState,
    active: Option<Arc<H>>,
}

impl<E> PermissionGate<E>
where
    E: CameraProvider,
{
    pub fn new(provider: E) -> Self {
        Self {
            provider,
            inner: Mutex::new(GateInner {
                state: PermissionState::Unrequested,
                active: None,
            }),
        }
    }

    pub fn state(&self) -> PermissionState {
        self.inner.lock().unwrap().state
    }

    /// Whether a capability is currently held
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().active.is_some()
    }

    /// Requests camera access.
    ///
    /// Returns the active handle without prompting when one is already held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if the provider refuses access, the
    /// gate is then `Denied`.
    pub async fn request(&self) -> Result<Arc<E::Handle>> {
        if let Some(active) = self.inner.lock().unwrap().active.clone() {
            return Ok(active);
        }

        match self.provider.request_video().await {
            Ok(handle) => {
                let handle = Arc::new(handle);
                let mut inner = self.inner.lock().unwrap();
                inner.state = PermissionState::Granted;
                if let Some(active) = inner.active.clone() {
                    // a concurrent request won the race, keep its handle
                    drop(inner);
                    handle.release();
                    return Ok(active);
                }
                inner.active = Some(handle.clone());
                debug!("Camera permission granted");
                Ok(handle)
            }
            Err(err) => {
                self.inner.lock().unwrap().state = PermissionState::Denied;
                warn!("Camera permission denied: {err}");
                Err(Error::PermissionDenied {
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Releases `handle` if it is the active capability.
    ///
    /// Returns whether the handle was released by this call; a handle is only
    /// ever released once.
    pub fn release(&self, handle: &Arc<E::Handle>) -> bool {
        let released = {
            let mut inner = self.inner.lock().unwrap();
            match &inner.active {
                Some(active) if Arc::ptr_eq(active, handle) => inner.active.take(),
                _ => None,
            }
        };
        match released {
            Some(handle) => {
                handle.release();
                debug!("Camera capability released");
                true
            }
            None => false,
        }
    }
}
