// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Generation tokens
//!
//! A session keeps one [`EpochCounter`] next to its state, behind the same lock.
//! Starting an asynchronous step hands out the new [`Epoch`]; cancelling or
//! resetting advances the counter again. When the step completes it compares
//! its token with the counter and only applies its result when they match.

/// Token identifying one generation of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of [`Epoch`]s
#[derive(Debug, Default)]
pub struct EpochCounter {
    current: u64,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates every outstanding token and returns the new one
    pub fn advance(&mut self) -> Epoch {
        self.current += 1;
        Epoch(self.current)
    }

    pub fn current(&self) -> Epoch {
        Epoch(self.current)
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current == epoch.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_invalidates_older_tokens() {
        let mut counter = EpochCounter::new();
        let first = counter.advance();
        assert!(counter.is_current(first));

        let second = counter.advance();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert!(second > first);
        assert_eq!(counter.current(), second);
    }
}
