// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Session-owned timers
//!
//! Delayed work of a session (a detection window, a settle interval, an
//! auto-decay) runs on a task spawned by the session rather than inside the
//! caller's future. The task decides, under the session lock, whether its
//! result still applies: it returns `None` when its epoch is stale, in which
//! case the waiting caller observes [`Superseded`].
//!
//! ## Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::time::Duration;
//! use safekart_session::settlement;
//!
//! let pending = settlement::spawn(async {
//!     tokio::time::sleep(Duration::from_millis(1)).await;
//!     Some(42)
//! });
//! assert_eq!(pending.outcome().await, Ok(42));
//! # }
//! ```

use std::{future::Future, time::Duration};

use tokio::sync::oneshot;

use crate::Superseded;

/// Outcome of a delayed session step, delivered once the step settles
#[derive(Debug)]
pub struct Settlement<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Settlement<T> {
    /// Waits for the step to settle.
    ///
    /// Returns [`Superseded`] when the step found its epoch stale and discarded
    /// its result.
    pub async fn outcome(self) -> Result<T, Superseded> {
        self.receiver.await.map_err(|_| Superseded)
    }
}

/// Runs `task` on its own tokio task and returns a handle to its outcome.
///
/// `task` resolves to `None` when its result no longer applies.
pub fn spawn<F, T>(task: F) -> Settlement<T>
where
    F: Future<Output = Option<T>> + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        if let Some(outcome) = task.await {
            // the caller may have stopped waiting, the session state already
            // carries the outcome
            let _ = sender.send(outcome);
        }
    });
    Settlement { receiver }
}

/// Runs `fire` after `delay` on its own task, without anyone awaiting it.
///
/// `fire` is expected to check its epoch before touching the session.
pub fn schedule<F>(delay: Duration, fire: F)
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        fire();
    });
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use super::*;

    #[tokio::test]
    async fn stale_task_reports_superseded() {
        let pending = spawn(async { None::<u32> });
        assert_eq!(pending.outcome().await, Err(Superseded));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_timer_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        schedule(Duration::from_secs(3), move || flag.store(true, Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
