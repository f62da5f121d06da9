// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Order timelines
//!
//! [`OrderTimeline`] resolves order identifiers against an [`OrderStore`]. It
//! is read-only: status advancement belongs to whatever system feeds the
//! store. The only state it keeps is the last lookup:
//!
//! ```text
//! Idle -> Resolving -> Resolved(Found | NotFound)
//! ```
//!
//! A timeline is valid when its `completed` flags form a prefix: once a step
//! is pending, every later step is pending too. The current step is then the
//! first pending one, or none when the order is delivered. [`current_step`]
//! and [`view`] check this at read time and report a violation as
//! [`Error::DataIntegrity`] instead of repairing it.

use std::sync::Arc;

use log::{info, warn};
use safekart_model::{OrderId, OrderRecord, OrderStatusStep, StepStatus};
use safekart_session::{epoch::Epoch, machine::Machine, settlement, state::SessionState};
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, time::error::Elapsed};

use crate::{adapters::OrderStore, config::SessionTimings, Error, Result};

/// Result of a lookup. An unknown order is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OrderLookup {
    Found { record: OrderRecord },
    NotFound { order_id: OrderId },
}

impl OrderLookup {
    pub fn record(&self) -> Option<&OrderRecord> {
        match self {
            OrderLookup::Found { record } => Some(record),
            OrderLookup::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, OrderLookup::Found { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LookupState {
    Idle,
    Resolving { order_id: OrderId },
    Resolved { lookup: OrderLookup },
}

impl SessionState for LookupState {
    fn name(&self) -> &'static str {
        match self {
            LookupState::Idle => "idle",
            LookupState::Resolving { .. } => "resolving",
            LookupState::Resolved { .. } => "resolved",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, LookupState::Resolved { .. })
    }
}

pub struct OrderTimeline<E> {
    shared: Arc<Shared<E>>,
}

struct Shared<E> {
    store: E,
    timings: SessionTimings,
    machine: Machine<LookupState>,
}

impl<E> OrderTimeline<E>
where
    E: OrderStore + Send + Sync + 'static,
{
    pub fn new(store: E, timings: SessionTimings) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                timings,
                machine: Machine::new("order timeline", LookupState::Idle),
            }),
        }
    }

    pub fn state(&self) -> LookupState {
        self.shared.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.shared.machine.subscribe()
    }

    pub fn last_result(&self) -> Option<OrderLookup> {
        match self.state() {
            LookupState::Resolved { lookup } => Some(lookup),
            _ => None,
        }
    }

    /// Resolves `order_id`, trimmed and upper-cased first.
    ///
    /// A newer lookup supersedes a pending one. A blank identifier resolves to
    /// `NotFound` without asking the store.
    ///
    /// # Errors
    ///
    /// - [`Error::LookupTimeout`] if the store does not answer in time.
    /// - [`Error::AdapterError`] if the store fails.
    /// - [`Error::Superseded`] if a newer lookup or a reset came first.
    ///
    /// The timeline goes back to `Idle` on either of the first two.
    pub async fn lookup(&self, order_id: &str) -> Result<OrderLookup> {
        let order_id = OrderId::canonicalize(order_id);
        if order_id.is_empty() {
            let lookup = OrderLookup::NotFound { order_id };
            let mut machine = self.shared.machine.lock();
            machine.advance();
            machine.transition(LookupState::Resolved {
                lookup: lookup.clone(),
            });
            return Ok(lookup);
        }

        let epoch = {
            let mut machine = self.shared.machine.lock();
            let epoch = machine.advance();
            machine.transition(LookupState::Resolving {
                order_id: order_id.clone(),
            });
            epoch
        };

        let shared = self.shared.clone();
        settlement::spawn(async move {
            tokio::time::sleep(shared.timings.order_lookup).await;
            let found = tokio::time::timeout(
                shared.timings.order_lookup_timeout,
                shared.store.find_order(&order_id),
            )
            .await;
            shared.resolve(epoch, order_id, found)
        })
        .outcome()
        .await?
    }

    /// Forgets the last result and abandons a pending lookup
    pub fn reset(&self) {
        let mut machine = self.shared.machine.lock();
        machine.advance();
        machine.transition(LookupState::Idle);
    }
}

type StoreAnswer<E> = std::result::Result<Option<OrderRecord>, <E as OrderStore>::AdapterError>;

impl<E> Shared<E>
where
    E: OrderStore,
{
    fn resolve(
        &self,
        epoch: Epoch,
        order_id: OrderId,
        found: std::result::Result<StoreAnswer<E>, Elapsed>,
    ) -> Option<Result<OrderLookup>> {
        let mut machine = self.machine.lock();
        if !machine.is_current(epoch) {
            warn!("Discarding stale lookup of order {order_id}");
            return None;
        }
        let lookup = match found {
            Ok(Ok(Some(record))) => OrderLookup::Found { record },
            Ok(Ok(None)) => OrderLookup::NotFound { order_id },
            Ok(Err(err)) => {
                warn!("Order store failed to look up {order_id}: {err}");
                machine.transition(LookupState::Idle);
                return Some(Err(Error::adapter(err)));
            }
            Err(_) => {
                warn!("Order store did not answer for {order_id}");
                machine.transition(LookupState::Idle);
                return Some(Err(Error::LookupTimeout {
                    timeout: self.timings.order_lookup_timeout,
                }));
            }
        };
        info!("Order lookup resolved, found: {}", lookup.is_found());
        machine.transition(LookupState::Resolved {
            lookup: lookup.clone(),
        });
        Some(Ok(lookup))
    }
}

/// Checks that the completed steps of `record` form a prefix of its timeline.
///
/// # Errors
///
/// Returns [`Error::DataIntegrity`] naming the first completed step found
/// after a pending one.
pub fn validate_timeline(record: &OrderRecord) -> Result<()> {
    let mut first_pending: Option<&OrderStatusStep> = None;
    for step in &record.statuses {
        match (step.completed, first_pending) {
            (false, None) => first_pending = Some(step),
            (true, Some(pending)) => {
                return Err(Error::DataIntegrity {
                    order_id: record.order_id.to_string(),
                    detail: format!(
                        "step {} ({}) is completed after pending step {} ({})",
                        step.id, step.title, pending.id, pending.title
                    ),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

/// The first step not completed yet, `None` once the order is delivered.
///
/// # Errors
///
/// Returns [`Error::DataIntegrity`] if the timeline is not a valid prefix.
pub fn current_step(record: &OrderRecord) -> Result<Option<&OrderStatusStep>> {
    validate_timeline(record)?;
    Ok(record.statuses.iter().find(|step| !step.completed))
}

/// A step tagged with how it should be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub step: OrderStatusStep,
    pub status: StepStatus,
}

/// Render-ready timeline of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub order_id: OrderId,
    pub entries: Vec<TimelineEntry>,
    /// Id of the current step
    pub current: Option<u32>,
    pub completed: usize,
    pub total: usize,
}

impl TimelineView {
    /// Share of completed steps, between 0 and 1. An empty timeline has no progress.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Tags every step of `record` as completed, current or pending.
///
/// # Errors
///
/// Returns [`Error::DataIntegrity`] if the timeline is not a valid prefix.
pub fn view(record: &OrderRecord) -> Result<TimelineView> {
    let current = current_step(record)?.map(|step| step.id);
    let mut seen_current = false;
    let entries = record
        .statuses
        .iter()
        .map(|step| {
            let status = if step.completed {
                StepStatus::Completed
            } else if !seen_current {
                seen_current = true;
                StepStatus::Current
            } else {
                StepStatus::Pending
            };
            TimelineEntry {
                step: step.clone(),
                status,
            }
        })
        .collect();
    Ok(TimelineView {
        order_id: record.order_id.clone(),
        entries,
        current,
        completed: record.completed_steps(),
        total: record.statuses.len(),
    })
}
