// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Order records and their delivery timeline

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical order identifier.
///
/// Order identifiers are typed by hand, so they are compared case-insensitively:
/// the raw input is trimmed and upper-cased once, when the id is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn canonicalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(raw: &str) -> Self {
        Self::canonicalize(raw)
    }
}

/// One step of the delivery timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusStep {
    /// Ordinal of the step inside its timeline
    pub id: u32,
    pub title: String,
    /// `None` while the step has not been reached
    pub timestamp: Option<String>,
    pub completed: bool,
}

impl OrderStatusStep {
    pub fn reached(id: u32, title: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            timestamp: Some(timestamp.into()),
            completed: true,
        }
    }

    pub fn pending(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            timestamp: None,
            completed: false,
        }
    }
}

/// Rendering status of a step, derived from its position in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

/// An order as known by the order store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub statuses: Vec<OrderStatusStep>,
    pub tracking_number: String,
    pub shipping_address: String,
    pub expected_delivery: NaiveDate,
}

impl OrderRecord {
    /// Whether every step of the timeline has been completed
    pub fn is_delivered(&self) -> bool {
        self.statuses.iter().all(|step| step.completed)
    }

    pub fn completed_steps(&self) -> usize {
        self.statuses.iter().filter(|step| step.completed).count()
    }
}
