// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Product verification sessions
//!
//! ```text
//! Idle -> Validating -> Settling -> Verified -> (display window) -> Idle
//!                   \            \-> Rejected
//!                    \-> Rejected
//! ```
//!
//! A submission first runs the local [`checks`]. A failing request is rejected
//! immediately, without waiting for the settle interval. A valid request
//! settles after [`SessionTimings::verification_settle`] with the verdict of
//! the [`VerificationService`]. A `Verified` session decays back to `Idle` once
//! [`SessionTimings::verified_display`] has elapsed, unless it was reset or
//! resubmitted first.

pub mod checks;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use safekart_model::{
    RejectReason, ValidationError, Verdict, VerificationOutcome, VerificationRequest,
};
use safekart_session::{
    checks::{CheckError, CheckList},
    epoch::Epoch,
    machine::Machine,
    settlement,
    state::SessionState,
    Context, RequestWithState,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use self::checks::{default_checks, Today};
use crate::{adapters::VerificationService, config::SessionTimings, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VerificationState {
    Idle,
    Validating,
    Settling,
    Verified,
    Rejected { reason: RejectReason },
}

impl SessionState for VerificationState {
    fn name(&self) -> &'static str {
        match self {
            VerificationState::Idle => "idle",
            VerificationState::Validating => "validating",
            VerificationState::Settling => "settling",
            VerificationState::Verified => "verified",
            VerificationState::Rejected { .. } => "rejected",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationState::Verified | VerificationState::Rejected { .. }
        )
    }
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct VerificationSession<E> {
    shared: Arc<Shared<E>>,
}

struct Shared<E> {
    context: E,
    checks: CheckList<VerificationRequest>,
    timings: SessionTimings,
    clock: Clock,
    machine: Machine<VerificationState>,
}

impl<E> VerificationSession<E>
where
    E: VerificationService + Send + Sync + 'static,
{
    /// Creates a session running the [`checks::default_checks`] against the
    /// local calendar date.
    pub fn new(context: E, timings: SessionTimings) -> Self {
        Self::with_clock(context, timings, || Local::now().date_naive())
    }

    /// Creates a session whose expiry check compares against `clock`.
    pub fn with_clock(
        context: E,
        timings: SessionTimings,
        clock: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        Self::with_checks(context, timings, clock, default_checks())
    }

    /// Creates a session with custom `checks`; every submission must pass all
    /// of them before it settles.
    pub fn with_checks(
        context: E,
        timings: SessionTimings,
        clock: impl Fn() -> NaiveDate + Send + Sync + 'static,
        checks: impl Into<CheckList<VerificationRequest>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                context,
                checks: checks.into(),
                timings,
                clock: Arc::new(clock),
                machine: Machine::new("verification session", VerificationState::Idle),
            }),
        }
    }

    pub fn state(&self) -> VerificationState {
        self.shared.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.shared.machine.subscribe()
    }

    /// Outcome of the current attempt, `None` while idle
    pub fn outcome(&self) -> Option<VerificationOutcome> {
        match self.state() {
            VerificationState::Idle => None,
            VerificationState::Validating | VerificationState::Settling => {
                Some(VerificationOutcome::Pending)
            }
            VerificationState::Verified => Some(VerificationOutcome::Verified),
            VerificationState::Rejected { reason } => {
                Some(VerificationOutcome::Rejected { reason })
            }
        }
    }

    /// Runs the local checks only, without touching the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(&self, request: &VerificationRequest) -> Result<()> {
        let ctx = self.shared.check_context();
        RequestWithState::new(request.clone())
            .finalize_checks(&ctx, &self.shared.checks)
            .map(|_| ())
            .map_err(|failed| match failed.into_error() {
                CheckError::Failed(error) => match error.downcast::<ValidationError>() {
                    Ok(validation) => Error::Validation(validation),
                    Err(source_error) => Error::AdapterError { source_error },
                },
                CheckError::Incomplete(source_error) => Error::AdapterError { source_error },
            })
    }

    /// Submits `request` and waits for the attempt to settle.
    ///
    /// A request failing validation resolves to
    /// [`VerificationOutcome::Rejected`] right away. Submitting again from
    /// `Verified` or `Rejected` starts a new attempt.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if an attempt is already in flight.
    /// - [`Error::AdapterError`] if the verification service failed; the
    ///   session is then `Rejected` as unavailable.
    /// - [`Error::Superseded`] if the session was reset meanwhile.
    pub async fn submit(&self, request: VerificationRequest) -> Result<VerificationOutcome> {
        let epoch = {
            let mut machine = self.shared.machine.lock();
            machine.ensure("submit", |state| {
                !matches!(
                    state,
                    VerificationState::Validating | VerificationState::Settling
                )
            })?;
            let epoch = machine.advance();
            machine.transition(VerificationState::Validating);
            epoch
        };

        let ctx = self.shared.check_context();
        let checked = match RequestWithState::new(request)
            .finalize_checks(&ctx, &self.shared.checks)
        {
            Ok(checked) => checked,
            Err(failed) => {
                let reason = reject_reason(failed.into_error());
                info!("Verification rejected: {reason}");
                self.shared
                    .machine
                    .lock()
                    .transition(VerificationState::Rejected {
                        reason: reason.clone(),
                    });
                return Ok(VerificationOutcome::Rejected { reason });
            }
        };

        self.shared
            .machine
            .lock()
            .transition(VerificationState::Settling);

        let request = checked.into_request();
        let shared = self.shared.clone();
        settlement::spawn(async move {
            tokio::time::sleep(shared.timings.verification_settle).await;
            let verdict = shared.context.verify(&request).await;
            shared.settle(epoch, verdict)
        })
        .outcome()
        .await?
    }

    /// Returns to `Idle`, cancelling a pending auto-decay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the session is `Verified` or `Rejected`.
    pub fn reset(&self) -> Result<()> {
        let mut machine = self.shared.machine.lock();
        machine.ensure("reset", |state| state.is_terminal())?;
        machine.advance();
        machine.transition(VerificationState::Idle);
        Ok(())
    }
}

impl<E> Shared<E>
where
    E: VerificationService + Send + Sync + 'static,
{
    fn check_context(&self) -> Context {
        let mut ctx = Context::new();
        ctx.insert(Today((self.clock)()));
        ctx
    }

    fn settle(
        self: &Arc<Self>,
        epoch: Epoch,
        verdict: std::result::Result<Verdict, E::AdapterError>,
    ) -> Option<Result<VerificationOutcome>> {
        let mut machine = self.machine.lock();
        if !machine.is_current(epoch) {
            warn!("Discarding stale verification verdict");
            return None;
        }
        match verdict {
            Ok(Verdict::Authentic) => {
                machine.transition(VerificationState::Verified);
                drop(machine);
                info!("Product verified");
                self.schedule_decay(epoch);
                Some(Ok(VerificationOutcome::Verified))
            }
            Ok(Verdict::Counterfeit { reason }) => {
                let reason = RejectReason::Counterfeit { reason };
                info!("Verification rejected: {reason}");
                machine.transition(VerificationState::Rejected {
                    reason: reason.clone(),
                });
                Some(Ok(VerificationOutcome::Rejected { reason }))
            }
            Err(err) => {
                warn!("Verification service failed: {err}");
                machine.transition(VerificationState::Rejected {
                    reason: RejectReason::Unavailable {
                        message: err.to_string(),
                    },
                });
                Some(Err(Error::adapter(err)))
            }
        }
    }

    fn schedule_decay(self: &Arc<Self>, epoch: Epoch) {
        let shared = self.clone();
        settlement::schedule(self.timings.verified_display, move || {
            let mut machine = shared.machine.lock();
            if machine.is_current(epoch) && *machine.state() == VerificationState::Verified {
                machine.transition(VerificationState::Idle);
            } else {
                debug!("Verified display window superseded");
            }
        });
    }
}

fn reject_reason(error: CheckError) -> RejectReason {
    match error {
        CheckError::Failed(error) => match error.downcast::<ValidationError>() {
            Ok(validation) => RejectReason::Validation(validation),
            Err(other) => RejectReason::Unavailable {
                message: other.to_string(),
            },
        },
        CheckError::Incomplete(error) => RejectReason::Unavailable {
            message: error.to_string(),
        },
    }
}
