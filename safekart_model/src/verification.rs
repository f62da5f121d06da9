// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Product verification request and its outcomes

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The form fields of a [`VerificationRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestField {
    Barcode,
    WeightGrams,
    Mrp,
    ExpiryDate,
}

/// Product attributes submitted for verification.
///
/// Every field is mandatory. They are optional here because the request mirrors
/// a form that can be submitted half filled; the presence check is part of
/// validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub weight_grams: Option<f64>,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl VerificationRequest {
    /// Returns a request with every field filled in
    pub fn new(barcode: impl Into<String>, weight_grams: f64, mrp: f64, expiry_date: NaiveDate) -> Self {
        Self {
            barcode: barcode.into(),
            weight_grams: Some(weight_grams),
            mrp: Some(mrp),
            expiry_date: Some(expiry_date),
        }
    }
}

/// A local precondition violated by a [`VerificationRequest`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: RequestField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: RequestField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn missing(field: RequestField) -> Self {
        Self::new(field, "field is required")
    }
}

/// Answer of an authenticity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Authentic,
    Counterfeit { reason: String },
}

/// Why a verification ended up rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    Validation(ValidationError),
    Counterfeit { reason: String },
    Unavailable { message: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Validation(error) => write!(f, "{error}"),
            RejectReason::Counterfeit { reason } => write!(f, "counterfeit product: {reason}"),
            RejectReason::Unavailable { message } => {
                write!(f, "verification service unavailable: {message}")
            }
        }
    }
}

/// Transient result of a verification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Pending,
    Verified,
    Rejected { reason: RejectReason },
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_absent() {
        let request: VerificationRequest =
            serde_json::from_str(r#"{"barcode":"8901234567890","mrp":299.0}"#).unwrap();
        assert_eq!(request.barcode, "8901234567890");
        assert_eq!(request.weight_grams, None);
        assert_eq!(request.mrp, Some(299.0));
        assert_eq!(request.expiry_date, None);
    }

    #[test]
    fn rejected_outcome_names_the_field() {
        let outcome = VerificationOutcome::Rejected {
            reason: RejectReason::Validation(ValidationError::missing(RequestField::ExpiryDate)),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"]["field"], "expiry_date");
        assert_eq!(
            outcome_reason(&outcome),
            "invalid expiry_date: field is required"
        );
    }

    fn outcome_reason(outcome: &VerificationOutcome) -> String {
        match outcome {
            VerificationOutcome::Rejected { reason } => reason.to_string(),
            _ => String::new(),
        }
    }
}
