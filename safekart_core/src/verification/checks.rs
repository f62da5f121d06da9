// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Local preconditions of a [`VerificationRequest`]
//!
//! Failing checks wrap a [`ValidationError`] naming the offending field, so the
//! session can report it without string matching.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::NaiveDate;
use safekart_model::{RequestField, ValidationError, VerificationRequest};
use safekart_session::{
    checks::{Check, CheckError, CheckList, CheckResult},
    state::Checking,
    Context, RequestWithState,
};

/// The current date, inserted in the check [`Context`] by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Today(pub NaiveDate);

fn invalid(error: ValidationError) -> CheckError {
    CheckError::Failed(anyhow::Error::new(error))
}

pub struct BarcodeCheck;

impl Check<VerificationRequest> for BarcodeCheck {
    fn check(
        &self,
        _: &Context,
        request: &RequestWithState<Checking, VerificationRequest>,
    ) -> CheckResult {
        if request.request().barcode.trim().is_empty() {
            return Err(invalid(ValidationError::missing(RequestField::Barcode)));
        }
        Ok(())
    }
}

/// Requires a numeric field to be present, finite and strictly positive
pub struct PositiveAmountCheck {
    field: RequestField,
}

impl PositiveAmountCheck {
    pub fn new(field: RequestField) -> Self {
        Self { field }
    }
}

impl Check<VerificationRequest> for PositiveAmountCheck {
    fn check(
        &self,
        _: &Context,
        request: &RequestWithState<Checking, VerificationRequest>,
    ) -> CheckResult {
        let amount = match self.field {
            RequestField::WeightGrams => request.request().weight_grams,
            RequestField::Mrp => request.request().mrp,
            other => {
                return Err(CheckError::Incomplete(anyhow!(
                    "{other} is not a numeric field"
                )))
            }
        };
        match amount {
            None => Err(invalid(ValidationError::missing(self.field))),
            Some(amount) if !amount.is_finite() || amount <= 0.0 => Err(invalid(
                ValidationError::new(self.field, "must be greater than zero"),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Requires the expiry date to be strictly after [`Today`]
pub struct ExpiryCheck;

impl Check<VerificationRequest> for ExpiryCheck {
    fn check(
        &self,
        ctx: &Context,
        request: &RequestWithState<Checking, VerificationRequest>,
    ) -> CheckResult {
        let Some(Today(today)) = ctx.get::<Today>() else {
            return Err(CheckError::Incomplete(anyhow!("current date not provided")));
        };
        match request.request().expiry_date {
            None => Err(invalid(ValidationError::missing(RequestField::ExpiryDate))),
            Some(expiry) if expiry <= *today => Err(invalid(ValidationError::new(
                RequestField::ExpiryDate,
                "must be in the future",
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Every field present, positive weight and MRP, expiry strictly in the future
pub fn default_checks() -> CheckList<VerificationRequest> {
    CheckList::new(vec![
        Arc::new(BarcodeCheck),
        Arc::new(PositiveAmountCheck::new(RequestField::WeightGrams)),
        Arc::new(PositiveAmountCheck::new(RequestField::Mrp)),
        Arc::new(ExpiryCheck),
    ])
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use safekart_session::Context;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[fixture]
    fn ctx() -> Context {
        let mut ctx = Context::new();
        ctx.insert(Today(today()));
        ctx
    }

    #[fixture]
    fn valid() -> VerificationRequest {
        VerificationRequest::new(
            "8901234567890",
            500.0,
            299.0,
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    fn first_failure(ctx: &Context, request: VerificationRequest) -> Option<ValidationError> {
        let failed = RequestWithState::new(request)
            .finalize_checks(ctx, &default_checks())
            .err()?;
        match failed.into_error() {
            CheckError::Failed(error) => error.downcast::<ValidationError>().ok(),
            CheckError::Incomplete(_) => None,
        }
    }

    #[rstest]
    fn valid_request_passes(ctx: Context, valid: VerificationRequest) {
        assert!(RequestWithState::new(valid)
            .finalize_checks(&ctx, &default_checks())
            .is_ok());
    }

    #[rstest]
    #[case::blank_barcode(|r: &mut VerificationRequest| r.barcode = "   ".into(), RequestField::Barcode)]
    #[case::missing_weight(|r: &mut VerificationRequest| r.weight_grams = None, RequestField::WeightGrams)]
    #[case::zero_weight(|r: &mut VerificationRequest| r.weight_grams = Some(0.0), RequestField::WeightGrams)]
    #[case::negative_mrp(|r: &mut VerificationRequest| r.mrp = Some(-1.0), RequestField::Mrp)]
    #[case::nan_mrp(|r: &mut VerificationRequest| r.mrp = Some(f64::NAN), RequestField::Mrp)]
    #[case::missing_expiry(|r: &mut VerificationRequest| r.expiry_date = None, RequestField::ExpiryDate)]
    #[case::expires_today(|r: &mut VerificationRequest| r.expiry_date = Some(today()), RequestField::ExpiryDate)]
    #[case::expired(|r: &mut VerificationRequest| r.expiry_date = today().pred_opt(), RequestField::ExpiryDate)]
    fn invalid_request_names_the_field(
        ctx: Context,
        mut valid: VerificationRequest,
        #[case] break_it: fn(&mut VerificationRequest),
        #[case] field: RequestField,
    ) {
        break_it(&mut valid);
        let error = first_failure(&ctx, valid).expect("request should be rejected");
        assert_eq!(error.field, field);
    }

    #[rstest]
    fn first_missing_field_is_reported(ctx: Context) {
        let error = first_failure(&ctx, VerificationRequest::default()).unwrap();
        assert_eq!(error, ValidationError::missing(RequestField::Barcode));
    }

    #[rstest]
    fn expiry_check_needs_the_current_date(valid: VerificationRequest) {
        let failed = RequestWithState::new(valid)
            .finalize_checks(&Context::new(), &default_checks())
            .unwrap_err();
        assert!(matches!(failed.error(), CheckError::Incomplete(_)));
    }
}
