// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use safekart_core::Error;

/// JSON-RPC error codes specific to the SafeKart gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    /// -32001 -- The session refused the operation in its current state.
    InvalidState = -32001,
    /// -32002 -- A required text input was blank.
    EmptyInput = -32002,
    /// -32003 -- A verification request field is missing or out of range.
    Validation = -32003,
    /// -32004 -- No code could be decoded from the submitted image.
    Decode = -32004,
    /// -32005 -- The order store did not answer in time.
    LookupTimeout = -32005,
    /// -32006 -- An order timeline breaks the completed-prefix invariant.
    DataIntegrity = -32006,
    /// -32007 -- A backing service failed.
    Adapter = -32007,
    /// -32008 -- Camera access was refused.
    PermissionDenied = -32008,
    /// -32009 -- The operation was abandoned by a newer one.
    Superseded = -32009,
    /// -32010 -- The image parameter is not valid base64.
    InvalidImage = -32010,
}

impl From<&Error> for JsonRpcErrorCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidState(_) => JsonRpcErrorCode::InvalidState,
            Error::EmptyInput => JsonRpcErrorCode::EmptyInput,
            Error::Validation(_) => JsonRpcErrorCode::Validation,
            Error::DecodeError { .. } => JsonRpcErrorCode::Decode,
            Error::LookupTimeout { .. } => JsonRpcErrorCode::LookupTimeout,
            Error::DataIntegrity { .. } => JsonRpcErrorCode::DataIntegrity,
            Error::AdapterError { .. } => JsonRpcErrorCode::Adapter,
            Error::PermissionDenied { .. } => JsonRpcErrorCode::PermissionDenied,
            Error::Superseded(_) => JsonRpcErrorCode::Superseded,
        }
    }
}
