// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Request wrapper tracking a submitted request through its checks
//!
//! A submission starts as `RequestWithState<Checking, _>`. Running the checks
//! consumes it and yields either a `Checked` request, which may go on to
//! settle, or a `Failed` one carrying the first check error.

use crate::{
    checks::{CheckError, CheckList},
    state::{Checked, Checking, Failed, RequestState},
    Context,
};

pub type ResultRequest<S, Req> =
    std::result::Result<RequestWithState<S, Req>, RequestWithState<Failed, Req>>;

/// Typestate pattern for tracking the state of a submitted request
///
/// - The [ `RequestState` ] trait represents the different states a request
///   can be in.
/// - The [ `Checking` ] state is used to represent a request whose checks are
///   pending.
/// - The [ `Checked` ] state is used to represent a request that passed all
///   checks.
/// - The [ `Failed` ] state is used to represent a request that has failed a
///   check.
#[derive(Debug, Clone)]
pub struct RequestWithState<S, Req>
where
    S: RequestState,
{
    pub(crate) request: Req,
    pub(crate) _state: S,
}

impl<Req> RequestWithState<Checking, Req> {
    /// Creates a new `RequestWithState` in the `Checking` state
    pub fn new(request: Req) -> RequestWithState<Checking, Req> {
        RequestWithState {
            request,
            _state: Checking,
        }
    }

    /// Runs the checks in order, stopping at the first failure
    pub fn perform_checks(&self, ctx: &Context, checks: &CheckList<Req>) -> Result<(), CheckError> {
        for check in checks.iter() {
            check.check(ctx, self)?;
        }
        Ok(())
    }

    /// Completes all checks and transitions the request to the next state
    ///
    /// Returns `Err` with a [`RequestWithState<Failed>`] in case of error,
    /// returns `Ok` with a [`RequestWithState<Checked>`] in case of success.
    pub fn finalize_checks(self, ctx: &Context, checks: &CheckList<Req>) -> ResultRequest<Checked, Req> {
        match self.perform_checks(ctx, checks) {
            Ok(()) => Ok(self.perform_state_changes(Checked)),
            Err(error) => Err(self.perform_state_changes(Failed { error })),
        }
    }
}

impl<Req> RequestWithState<Failed, Req> {
    pub fn error(&self) -> &CheckError {
        &self._state.error
    }

    pub fn into_error(self) -> CheckError {
        self._state.error
    }
}

impl<S, Req> RequestWithState<S, Req>
where
    S: RequestState,
{
    fn perform_state_changes<T>(self, new_state: T) -> RequestWithState<T, Req>
    where
        T: RequestState,
    {
        RequestWithState {
            request: self.request,
            _state: new_state,
        }
    }

    /// Returns the wrapped request
    pub fn request(&self) -> &Req {
        &self.request
    }

    pub fn into_request(self) -> Req {
        self.request
    }
}
