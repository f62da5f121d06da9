// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Observable state slot
//!
//! [`Machine`] keeps the state of a session, its [`EpochCounter`] and any
//! extra per-session data behind a single lock, and publishes every
//! transition on a [`watch`] channel. Publishing happens while the lock is
//! held, so subscribers observe transitions in the order they were applied.

use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard},
};

use log::debug;
use tokio::sync::watch;

use crate::{
    epoch::{Epoch, EpochCounter},
    state::SessionState,
    InvalidTransition,
};

pub struct Machine<S, X = ()>
where
    S: SessionState,
{
    label: &'static str,
    slot: Mutex<Slot<S, X>>,
    watch: watch::Sender<S>,
}

struct Slot<S, X> {
    state: S,
    epoch: EpochCounter,
    extra: X,
}

impl<S, X> Machine<S, X>
where
    S: SessionState,
    X: Default,
{
    /// Creates a machine in `initial`; `label` prefixes its transition logs.
    pub fn new(label: &'static str, initial: S) -> Self {
        let (watch, _) = watch::channel(initial.clone());
        Self {
            label,
            slot: Mutex::new(Slot {
                state: initial,
                epoch: EpochCounter::new(),
                extra: X::default(),
            }),
            watch,
        }
    }
}

impl<S, X> Machine<S, X>
where
    S: SessionState,
{
    /// Snapshot of the current state
    pub fn state(&self) -> S {
        self.lock().state().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.watch.subscribe()
    }

    pub fn lock(&self) -> MachineGuard<'_, S, X> {
        MachineGuard {
            slot: self.slot.lock().unwrap(),
            label: self.label,
            watch: &self.watch,
        }
    }
}

/// Exclusive access to a [`Machine`]; dereferences to the extra data.
pub struct MachineGuard<'a, S, X>
where
    S: SessionState,
{
    slot: MutexGuard<'a, Slot<S, X>>,
    label: &'static str,
    watch: &'a watch::Sender<S>,
}

impl<S, X> MachineGuard<'_, S, X>
where
    S: SessionState,
{
    pub fn state(&self) -> &S {
        &self.slot.state
    }

    /// See [`SessionState::ensure`]
    pub fn ensure(
        &self,
        operation: &'static str,
        allowed: impl FnOnce(&S) -> bool,
    ) -> Result<(), InvalidTransition> {
        self.slot.state.ensure(operation, allowed)
    }

    /// Invalidates every outstanding epoch and returns the new one
    pub fn advance(&mut self) -> Epoch {
        self.slot.epoch.advance()
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.slot.epoch.is_current(epoch)
    }

    /// Moves to `next` and notifies subscribers
    pub fn transition(&mut self, next: S) {
        debug!(
            "{}: {} -> {}",
            self.label,
            self.slot.state.name(),
            next.name()
        );
        self.slot.state = next.clone();
        self.watch.send_replace(next);
    }
}

impl<S, X> Deref for MachineGuard<'_, S, X>
where
    S: SessionState,
{
    type Target = X;

    fn deref(&self) -> &X {
        &self.slot.extra
    }
}

impl<S, X> DerefMut for MachineGuard<'_, S, X>
where
    S: SessionState,
{
    fn deref_mut(&mut self) -> &mut X {
        &mut self.slot.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Light {
        Off,
        On(u8),
    }

    impl SessionState for Light {
        fn name(&self) -> &'static str {
            match self {
                Light::Off => "off",
                Light::On(_) => "on",
            }
        }

        fn is_terminal(&self) -> bool {
            false
        }
    }

    #[test]
    fn transitions_are_published_in_order() {
        let machine: Machine<Light, Vec<u8>> = Machine::new("light", Light::Off);
        let receiver = machine.subscribe();

        {
            let mut guard = machine.lock();
            guard.transition(Light::On(3));
            guard.push(3);
        }

        assert_eq!(*receiver.borrow(), Light::On(3));
        assert_eq!(machine.state(), Light::On(3));
        assert_eq!(*machine.lock(), vec![3]);
    }

    #[test]
    fn epochs_live_with_the_state() {
        let machine: Machine<Light> = Machine::new("light", Light::Off);
        let first = machine.lock().advance();
        let second = machine.lock().advance();

        let guard = machine.lock();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert!(guard.ensure("dim", |s| matches!(s, Light::On(_))).is_err());
    }
}
