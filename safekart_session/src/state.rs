// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Session and request states
//!
//! Two kinds of state live here:
//! - the typestate markers of a submitted request (`Checking`, `Checked`,
//!   `Failed`), see [`crate::RequestWithState`];
//! - the [`SessionState`] trait implemented by every session state enum, used to
//!   guard operations and to report the state an operation was refused in.

use crate::{checks::CheckError, InvalidTransition};

/// Checking state represents a request whose checks have not completed yet.
#[derive(Debug, Clone)]
pub struct Checking;

/// Checked state represents a request that passed every check.
#[derive(Debug, Clone)]
pub struct Checked;

/// Failed state represents a request that has failed a check.
#[derive(Debug)]
pub struct Failed {
    pub error: CheckError,
}

/// Trait for the different states a request can be in.
pub trait RequestState {}
impl RequestState for Checking {}
impl RequestState for Checked {}
impl RequestState for Failed {}

/// Implemented by the state enum of every session.
pub trait SessionState: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Short, stable name of the state, used in logs and errors
    fn name(&self) -> &'static str;

    /// Terminal states only leave through an explicit reset or a new attempt
    fn is_terminal(&self) -> bool;

    /// Returns an error naming `operation` unless `allowed` holds for the state.
    fn ensure(
        &self,
        operation: &'static str,
        allowed: impl FnOnce(&Self) -> bool,
    ) -> Result<(), InvalidTransition> {
        if allowed(self) {
            Ok(())
        } else {
            Err(InvalidTransition {
                operation,
                state: self.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Door {
        Open,
        Closed,
    }

    impl SessionState for Door {
        fn name(&self) -> &'static str {
            match self {
                Door::Open => "open",
                Door::Closed => "closed",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Door::Closed)
        }
    }

    #[test]
    fn ensure_reports_operation_and_state() {
        assert!(Door::Open.ensure("close", |s| *s == Door::Open).is_ok());

        let err = Door::Closed
            .ensure("close", |s| *s == Door::Open)
            .unwrap_err();
        assert_eq!(err.operation, "close");
        assert_eq!(err.state, "closed");
        assert_eq!(err.to_string(), "cannot close while closed");
    }
}
