// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Scan sessions
//!
//! A [`ScanSession`] runs one scan attempt at a time, either from the camera or
//! from an uploaded image:
//!
//! ```text
//! Idle -> AwaitingPermission -> Scanning -> Succeeded | Failed
//! Idle -> Scanning (file upload) -> Succeeded | Failed
//! ```
//!
//! `Succeeded` and `Failed` stay until [`ScanSession::reset`]. A camera scan
//! can be abandoned with [`ScanSession::cancel_scan`] while `Scanning`; the
//! pending detection then finds its epoch stale and does nothing.
//!
//! The camera capability is released exactly once per acquisition, on
//! whichever of success, failure or cancellation comes first.

use std::sync::Arc;

use log::{debug, info, warn};
use safekart_model::{ScanResult, ScanSource};
use safekart_session::{
    epoch::Epoch,
    machine::Machine,
    settlement,
    state::SessionState,
    Superseded,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    adapters::{CameraHandle, CameraProvider, ExportSink, ImageDecoder},
    config::SessionTimings,
    permission::{PermissionGate, PermissionState},
    Error, Result,
};

const NO_CODE_DETECTED: &str = "no code detected within the detection window";

/// Why a scan attempt ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanFailure {
    PermissionDenied { reason: String },
    DecodeError { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    AwaitingPermission,
    Scanning { source: ScanSource },
    Succeeded { result: ScanResult },
    Failed { failure: ScanFailure },
}

impl SessionState for ScanState {
    fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::AwaitingPermission => "awaiting_permission",
            ScanState::Scanning { .. } => "scanning",
            ScanState::Succeeded { .. } => "succeeded",
            ScanState::Failed { .. } => "failed",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Succeeded { .. } | ScanState::Failed { .. })
    }
}

pub struct ScanSession<E>
where
    E: CameraProvider,
{
    shared: Arc<Shared<E>>,
}

struct Shared<E>
where
    E: CameraProvider,
{
    decoder: E,
    gate: PermissionGate<E>,
    timings: SessionTimings,
    /// The extra slot holds the camera while a camera scan is running
    machine: Machine<ScanState, Option<Arc<E::Handle>>>,
}

impl<E> ScanSession<E>
where
    E: CameraProvider + ImageDecoder + Clone + Send + Sync + 'static,
{
    pub fn new(context: E, timings: SessionTimings) -> Self {
        Self {
            shared: Arc::new(Shared {
                gate: PermissionGate::new(context.clone()),
                decoder: context,
                timings,
                machine: Machine::new("scan session", ScanState::Idle),
            }),
        }
    }

    pub fn state(&self) -> ScanState {
        self.shared.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.shared.machine.subscribe()
    }

    pub fn permission(&self) -> PermissionState {
        self.shared.gate.state()
    }

    /// The result of the last successful attempt, until the session is reset
    pub fn result(&self) -> Option<ScanResult> {
        match self.state() {
            ScanState::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    /// Starts a camera scan and waits for it to settle.
    ///
    /// The attempt runs on a task owned by the session: dropping the returned
    /// future does not abandon it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the session is `Idle`.
    /// - [`Error::PermissionDenied`] if camera access is refused.
    /// - [`Error::DecodeError`] if nothing was detected in the window.
    /// - [`Error::Superseded`] if the scan was cancelled meanwhile.
    pub async fn start_camera_scan(&self) -> Result<ScanResult> {
        let epoch = {
            let mut machine = self.shared.machine.lock();
            machine.ensure("start a camera scan", |state| *state == ScanState::Idle)?;
            let epoch = machine.advance();
            machine.transition(ScanState::AwaitingPermission);
            epoch
        };

        let shared = self.shared.clone();
        settlement::spawn(async move { shared.run_camera_scan(epoch).await })
            .outcome()
            .await?
    }

    /// Abandons the running scan and returns to `Idle`, releasing the camera.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the session is `Scanning`.
    pub fn cancel_scan(&self) -> Result<()> {
        let camera = {
            let mut machine = self.shared.machine.lock();
            machine.ensure("cancel a scan", |state| {
                matches!(state, ScanState::Scanning { .. })
            })?;
            machine.advance();
            machine.transition(ScanState::Idle);
            machine.take()
        };
        if let Some(camera) = camera {
            self.shared.gate.release(&camera);
        }
        info!("Scan cancelled");
        Ok(())
    }

    /// Decodes an uploaded image. No permission is needed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the session is `Idle`.
    /// - [`Error::DecodeError`] if the decoder could not extract a payload.
    /// - [`Error::Superseded`] if the scan was cancelled meanwhile.
    pub async fn submit_image(&self, image: Vec<u8>) -> Result<ScanResult> {
        let epoch = {
            let mut machine = self.shared.machine.lock();
            machine.ensure("submit an image", |state| *state == ScanState::Idle)?;
            let epoch = machine.advance();
            machine.transition(ScanState::Scanning {
                source: ScanSource::FileUpload,
            });
            epoch
        };

        let shared = self.shared.clone();
        settlement::spawn(async move {
            tokio::time::sleep(shared.timings.image_decode).await;
            let decoded = shared
                .decoder
                .decode(&image)
                .await
                .map_err(|err| err.to_string());
            shared.finish_decode(epoch, decoded)
        })
        .outcome()
        .await?
    }

    /// Clears the result of a finished attempt and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the session is `Succeeded` or `Failed`.
    pub fn reset(&self) -> Result<()> {
        let mut machine = self.shared.machine.lock();
        machine.ensure("reset", |state| state.is_terminal())?;
        machine.advance();
        machine.transition(ScanState::Idle);
        Ok(())
    }

    /// Copies the scanned payload to `sink`. A failing sink is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the session is `Succeeded`.
    pub fn copy_result<S>(&self, sink: &S) -> Result<()>
    where
        S: ExportSink,
    {
        let state = self.state();
        state.ensure("copy the result", |state| {
            matches!(state, ScanState::Succeeded { .. })
        })?;
        if let ScanState::Succeeded { result } = state {
            if let Err(err) = sink.copy_text(result.payload()) {
                warn!("Could not copy the scan result: {err}");
            }
        }
        Ok(())
    }
}

impl<E> Shared<E>
where
    E: CameraProvider + Send + Sync + 'static,
{
    async fn run_camera_scan(&self, epoch: Epoch) -> Option<Result<ScanResult>> {
        let camera = match self.gate.request().await {
            Ok(camera) => camera,
            Err(err) => {
                let mut machine = self.machine.lock();
                if !machine.is_current(epoch) {
                    return None;
                }
                let reason = match &err {
                    Error::PermissionDenied { reason } => reason.clone(),
                    other => other.to_string(),
                };
                machine.transition(ScanState::Failed {
                    failure: ScanFailure::PermissionDenied { reason },
                });
                return Some(Err(err));
            }
        };

        {
            let mut machine = self.machine.lock();
            if !machine.is_current(epoch) {
                drop(machine);
                self.gate.release(&camera);
                return Some(Err(Superseded.into()));
            }
            *machine = Some(camera);
            machine.transition(ScanState::Scanning {
                source: ScanSource::Camera,
            });
        }

        tokio::time::sleep(self.timings.detection_window).await;
        self.finish_detection(epoch)
    }

    fn finish_detection(&self, epoch: Epoch) -> Option<Result<ScanResult>> {
        let (outcome, camera) = {
            let mut machine = self.machine.lock();
            if !machine.is_current(epoch) {
                warn!("Discarding stale camera detection");
                return None;
            }
            let camera = machine.take();
            let detected = camera.as_ref().and_then(|camera| camera.detected_payload());
            let outcome = match detected {
                Some(payload) => {
                    let result = ScanResult::captured_now(payload, ScanSource::Camera);
                    machine.transition(ScanState::Succeeded {
                        result: result.clone(),
                    });
                    Ok(result)
                }
                None => {
                    machine.transition(ScanState::Failed {
                        failure: ScanFailure::DecodeError {
                            reason: NO_CODE_DETECTED.to_string(),
                        },
                    });
                    Err(Error::DecodeError {
                        reason: NO_CODE_DETECTED.to_string(),
                    })
                }
            };
            (outcome, camera)
        };
        if let Some(camera) = camera {
            self.gate.release(&camera);
        }
        Some(outcome)
    }

    fn finish_decode(
        &self,
        epoch: Epoch,
        decoded: std::result::Result<String, String>,
    ) -> Option<Result<ScanResult>> {
        let mut machine = self.machine.lock();
        if !machine.is_current(epoch) {
            warn!("Discarding stale image decode");
            return None;
        }
        match decoded {
            Ok(payload) => {
                let result = ScanResult::captured_now(payload, ScanSource::FileUpload);
                debug!("Decoded uploaded image: {}", result.payload());
                machine.transition(ScanState::Succeeded {
                    result: result.clone(),
                });
                Some(Ok(result))
            }
            Err(reason) => {
                machine.transition(ScanState::Failed {
                    failure: ScanFailure::DecodeError {
                        reason: reason.clone(),
                    },
                });
                Some(Err(Error::DecodeError { reason }))
            }
        }
    }
}
