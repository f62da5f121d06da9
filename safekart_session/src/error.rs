// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

/// An operation was invoked in a state that does not permit it.
///
/// This is always a usage error of the caller, never caused by external data.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {operation} while {state}")]
pub struct InvalidTransition {
    pub operation: &'static str,
    pub state: &'static str,
}

/// A pending settlement was invalidated (cancelled, reset or superseded)
/// before it could deliver its outcome.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("settlement superseded by a newer session transition")]
pub struct Superseded;
