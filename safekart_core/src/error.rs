// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced by the SafeKart sessions
//!

use std::{result::Result as StdResult, time::Duration};

use safekart_model::ValidationError;
use safekart_session::{InvalidTransition, Superseded};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("camera permission denied: {reason}")]
    PermissionDenied { reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no code could be decoded: {reason}")]
    DecodeError { reason: String },
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidTransition),
    #[error("input is empty")]
    EmptyInput,
    #[error("timeline of order {order_id} is inconsistent: {detail}")]
    DataIntegrity { order_id: String, detail: String },
    #[error("order lookup did not answer within {timeout:?}")]
    LookupTimeout { timeout: Duration },
    #[error(transparent)]
    Superseded(#[from] Superseded),
    #[error("Error from adapter.\nCaused by: {source_error}")]
    AdapterError { source_error: anyhow::Error },
}

impl Error {
    pub(crate) fn adapter<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::AdapterError {
            source_error: anyhow::Error::new(err),
        }
    }
}

pub type Result<T> = StdResult<T, Error>;
