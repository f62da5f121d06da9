// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Session plumbing
//!
//! A session is a short-lived state machine tied to one user workflow attempt
//! (a scan, a verification, an order lookup...). Sessions are driven by
//! discrete calls from a UI layer and by timers they own. This crate holds the
//! pieces every session shares:
//!
//! - [`epoch`]: generation tokens. Every transition that starts or abandons an
//!   asynchronous step advances the session epoch; a completion carrying an
//!   older epoch is stale and must be discarded.
//! - [`settlement`]: session-owned timers. The delayed work runs on its own
//!   task, so dropping the caller's future never leaves the session stuck in a
//!   transient state, and the caller awaits the outcome through a
//!   [`settlement::Settlement`].
//! - [`machine`]: the state of a session, its epoch counter and a watch
//!   channel publishing every transition, behind one lock.
//! - [`checks`] and [`RequestWithState`]: typestate validation of a submitted
//!   request. A request is wrapped in the `Checking` state, the checks run,
//!   and it comes out either `Checked` or `Failed`.
//!
pub mod checks;
pub mod epoch;
mod error;
pub mod machine;
mod request;
pub mod settlement;
pub mod state;

pub use error::{InvalidTransition, Superseded};
pub use request::{RequestWithState, ResultRequest};

/// Extra information for [checks::Check]
pub type Context = anymap3::Map<dyn std::any::Any + Send + Sync>;
