// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Code generation sessions
//!
//! Turns text into an [`EncodedPayload`] and keeps the last one around for
//! export. The encoding itself is the [`PayloadEncoder`]'s business; the
//! session only paces it by [`SessionTimings::encode_delay`].

use std::sync::Arc;

use log::{info, warn};
use safekart_model::EncodedPayload;
use safekart_session::{
    epoch::Epoch, machine::Machine, settlement, state::SessionState, InvalidTransition,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    adapters::{ExportSink, PayloadEncoder},
    config::SessionTimings,
    Error, Result,
};

/// File name offered for a downloaded payload
pub const DOWNLOAD_FILENAME: &str = "qrcode.svg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    Generating,
    Generated { payload: EncodedPayload },
}

impl SessionState for GenerationState {
    fn name(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Generating => "generating",
            GenerationState::Generated { .. } => "generated",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Generated { .. })
    }
}

pub struct CodeGenerationSession<E> {
    shared: Arc<Shared<E>>,
}

struct Shared<E> {
    encoder: E,
    timings: SessionTimings,
    machine: Machine<GenerationState>,
}

impl<E> CodeGenerationSession<E>
where
    E: PayloadEncoder + Send + Sync + 'static,
{
    pub fn new(encoder: E, timings: SessionTimings) -> Self {
        Self {
            shared: Arc::new(Shared {
                encoder,
                timings,
                machine: Machine::new("code generation session", GenerationState::Idle),
            }),
        }
    }

    pub fn state(&self) -> GenerationState {
        self.shared.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.shared.machine.subscribe()
    }

    pub fn last_payload(&self) -> Option<EncodedPayload> {
        match self.state() {
            GenerationState::Generated { payload } => Some(payload),
            _ => None,
        }
    }

    /// Encodes `source_text`, replacing the previous payload.
    ///
    /// The text is encoded as given; it is only trimmed to decide whether it
    /// is blank.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if the text is blank. The session is left as is.
    /// - [`Error::InvalidState`] if a generation is already running.
    /// - [`Error::Superseded`] if the session was reset meanwhile.
    pub async fn generate(&self, source_text: &str) -> Result<EncodedPayload> {
        if source_text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let epoch = {
            let mut machine = self.shared.machine.lock();
            machine.ensure("generate", |state| *state != GenerationState::Generating)?;
            let epoch = machine.advance();
            machine.transition(GenerationState::Generating);
            epoch
        };

        let shared = self.shared.clone();
        let source_text = source_text.to_string();
        let payload = settlement::spawn(async move {
            tokio::time::sleep(shared.timings.encode_delay).await;
            let payload = shared.encoder.encode(&source_text);
            shared.store(epoch, payload)
        })
        .outcome()
        .await?;
        Ok(payload)
    }

    /// Clears the last payload and abandons a running generation
    pub fn reset(&self) {
        let mut machine = self.shared.machine.lock();
        machine.advance();
        machine.transition(GenerationState::Idle);
    }

    /// Copies the source text of the last payload to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if nothing was generated.
    pub fn copy_source<S>(&self, sink: &S) -> Result<()>
    where
        S: ExportSink,
    {
        let payload = self.exportable("copy the source text")?;
        if let Err(err) = sink.copy_text(&payload.source_text) {
            warn!("Could not copy the source text: {err}");
        }
        Ok(())
    }

    /// Offers the last payload as [`DOWNLOAD_FILENAME`] to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if nothing was generated.
    pub fn download<S>(&self, sink: &S) -> Result<()>
    where
        S: ExportSink,
    {
        let payload = self.exportable("download the code")?;
        if let Err(err) = sink.download(DOWNLOAD_FILENAME, &payload.bytes) {
            warn!("Could not download the code: {err}");
        }
        Ok(())
    }

    fn exportable(&self, operation: &'static str) -> Result<EncodedPayload> {
        match self.state() {
            GenerationState::Generated { payload } => Ok(payload),
            other => Err(InvalidTransition {
                operation,
                state: other.name(),
            }
            .into()),
        }
    }
}

impl<E> Shared<E> {
    fn store(&self, epoch: Epoch, payload: EncodedPayload) -> Option<EncodedPayload> {
        let mut machine = self.machine.lock();
        if !machine.is_current(epoch) {
            warn!("Discarding stale encoded payload");
            return None;
        }
        info!("Generated code for {} bytes of text", payload.source_text.len());
        machine.transition(GenerationState::Generated {
            payload: payload.clone(),
        });
        Some(payload)
    }
}
