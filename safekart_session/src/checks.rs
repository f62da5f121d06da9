// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Request Checks
//!
//! Checks are local preconditions run on a submitted request before any
//! settlement starts. To create a check, implement the `Check` trait on a struct.
//! Checks never wait on anything: a failing request is rejected immediately.
//!
//! ## Example
//!
//! ```rust
//! # use std::sync::Arc;
//! use safekart_session::{
//!     checks::{Check, CheckResult, RequestCheck},
//!     state::Checking,
//!     Context, RequestWithState,
//! };
//! # struct Form;
//!
//! struct MyCheck;
//!
//! impl<T> Check<T> for MyCheck {
//!     fn check(&self, ctx: &Context, request: &RequestWithState<Checking, T>) -> CheckResult {
//!         // Implement your check here
//!         Ok(())
//!     }
//! }
//!
//! let my_check: RequestCheck<Form> = Arc::new(MyCheck);
//! ```

use std::{ops::Deref, sync::Arc};

use crate::{state::Checking, Context, RequestWithState};

/// RequestCheck is a type alias for an Arc of a struct that implements the `Check` trait.
pub type RequestCheck<Req> = Arc<dyn Check<Req> + Sync + Send>;

/// Result of a check operation.
pub type CheckResult = Result<(), CheckError>;

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    /// The request itself is invalid; the error usually wraps a typed
    /// validation error that callers can downcast to.
    #[error(transparent)]
    Failed(anyhow::Error),
    /// The check could not run, e.g. some context it needs is missing.
    #[error("check could not complete: {0}")]
    Incomplete(anyhow::Error),
}

/// CheckList is a NewType pattern to store a list of checks.
/// It is a wrapper around an Arc of RequestCheck[].
pub struct CheckList<Req>(Arc<[RequestCheck<Req>]>);

impl<Req> CheckList<Req> {
    pub fn new(checks: Vec<RequestCheck<Req>>) -> Self {
        Self(checks.into())
    }

    pub fn empty() -> Self {
        Self(Arc::new([]))
    }
}

impl<Req> Clone for CheckList<Req> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Req> From<Vec<RequestCheck<Req>>> for CheckList<Req> {
    fn from(checks: Vec<RequestCheck<Req>>) -> Self {
        Self::new(checks)
    }
}

impl<Req> Deref for CheckList<Req> {
    type Target = [RequestCheck<Req>];

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Check trait is implemented by the lib user to validate requests before they settle.
pub trait Check<Req> {
    fn check(&self, ctx: &Context, request: &RequestWithState<Checking, Req>) -> CheckResult;
}
