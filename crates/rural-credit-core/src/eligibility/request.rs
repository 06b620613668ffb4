use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LoanEligibility;
use crate::amortization::{amortize, AmortizationSchedule};
use crate::error::CreditEngineError;
use crate::types::{Money, Percent};
use crate::CreditEngineResult;

/// Repayment period shown to applicants when they do not pick one.
pub const DEFAULT_DISPLAY_TENURE_MONTHS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequestAssessment {
    pub requested_amount: Money,
    pub eligible_amount: Money,
    pub within_eligibility: bool,
    /// The request itself when eligible, otherwise the final cap.
    pub recommended_amount: Money,
    pub shortfall: Money,
    pub interest_rate_percent: Percent,
    pub tenure_months: u32,
    /// Absent when nothing can be offered.
    pub schedule: Option<AmortizationSchedule>,
}

/// Compare a requested amount with an eligibility verdict and show what
/// repaying the recommended amount looks like. This recomputes a display
/// schedule only; the eligible amount is never re-derived here.
pub fn assess_loan_request(
    eligibility: &LoanEligibility,
    requested_amount: Money,
    tenure_months: Option<u32>,
) -> CreditEngineResult<LoanRequestAssessment> {
    if requested_amount <= Decimal::ZERO {
        return Err(CreditEngineError::InvalidInput {
            field: "requested_amount".into(),
            reason: "Requested amount must be positive".into(),
        });
    }

    let tenure = tenure_months.unwrap_or(DEFAULT_DISPLAY_TENURE_MONTHS);
    let eligible = eligibility.final_cap;
    let within = requested_amount <= eligible;
    let recommended = if within { requested_amount } else { eligible };

    let schedule = if recommended > Decimal::ZERO {
        Some(amortize(recommended, eligibility.interest_rate_percent, tenure)?)
    } else {
        None
    };

    Ok(LoanRequestAssessment {
        requested_amount,
        eligible_amount: eligible,
        within_eligibility: within,
        recommended_amount: recommended,
        shortfall: requested_amount - recommended,
        interest_rate_percent: eligibility.interest_rate_percent,
        tenure_months: tenure,
        schedule,
    })
}
