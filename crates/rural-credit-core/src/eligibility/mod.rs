//! Maximum safe loan amount: an income-affordability cap and a
//! collateral-backed cap, reconciled conservatively.

pub mod capacity;
pub mod request;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::amortization::principal_for_installment;
use crate::collateral::{value_collateral_with_rates, CollateralValuation};
use crate::error::CreditEngineError;
use crate::policy::{LendingPolicy, ScoringPolicy};
use crate::profile::ApplicantProfile;
use crate::scoring::CreditAssessment;
use crate::types::{whole_units, Money, Percent, Ratio};
use crate::CreditEngineResult;

pub use capacity::{emi_capacity, net_monthly_income, safe_emi, EmiCapacity};
pub use request::{assess_loan_request, LoanRequestAssessment, DEFAULT_DISPLAY_TENURE_MONTHS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEligibility {
    pub capacity: EmiCapacity,
    pub credit_score: Decimal,
    pub interest_rate_percent: Percent,
    pub tenure_months: u32,
    /// Principal whose EMI at the offered rate and tenure equals the safe
    /// EMI capacity.
    pub income_based_cap: Money,
    pub collateral_value: Money,
    pub loan_to_value: Ratio,
    pub collateral_based_cap: Money,
    pub secured: bool,
    /// Applied to the income cap for unsecured loans only.
    pub credit_multiplier: Ratio,
    /// Amount before the policy floor and ceiling.
    pub reconciled_amount: Money,
    pub final_cap: Money,
    pub capped_at_maximum: bool,
    /// The reconciled amount fell under the minimum ticket; no loan is
    /// offered.
    pub below_minimum_loan: bool,
    pub policy_version: String,
}

impl LoanEligibility {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.below_minimum_loan {
            warnings.push("Eligible amount is below the minimum loan size; no loan offered".into());
        }
        if self.capped_at_maximum {
            warnings.push("Eligible amount limited to the maximum loan size".into());
        }
        warnings
    }
}

/// Eligibility under the published policy.
pub fn compute_eligibility(
    profile: &ApplicantProfile,
    assessment: &CreditAssessment,
) -> CreditEngineResult<LoanEligibility> {
    compute_eligibility_with_policy(profile, assessment, &ScoringPolicy::default())
}

pub fn compute_eligibility_with_policy(
    profile: &ApplicantProfile,
    assessment: &CreditAssessment,
    policy: &ScoringPolicy,
) -> CreditEngineResult<LoanEligibility> {
    let collateral = value_collateral_with_rates(profile, &policy.collateral);
    eligibility_from_valuation(profile, assessment, &collateral, policy)
}

/// Eligibility with an already computed collateral valuation.
pub fn eligibility_from_valuation(
    profile: &ApplicantProfile,
    assessment: &CreditAssessment,
    collateral: &CollateralValuation,
    policy: &ScoringPolicy,
) -> CreditEngineResult<LoanEligibility> {
    let lending = &policy.lending;
    let capacity = emi_capacity(profile.monthly_income(), profile.monthly_expenses(), lending);

    let credit_score = assessment.credit_score;
    let rate = lending.rate_for_score(credit_score);
    let safe = safe_emi(profile.monthly_income(), profile.monthly_expenses(), lending);
    let income_based_cap = income_cap(safe, rate, lending)?;

    let collateral_value = collateral.total_value;
    let collateral_based_cap = whole_units(collateral_value * lending.loan_to_value);
    let secured = collateral_value > Decimal::ZERO;

    let (credit_multiplier, reconciled_amount) = if secured {
        (Decimal::ONE, income_based_cap.min(collateral_based_cap))
    } else {
        let multiplier = lending.unsecured_multiplier(credit_score);
        (multiplier, whole_units(income_based_cap * multiplier))
    };

    if reconciled_amount < Decimal::ZERO {
        return Err(CreditEngineError::OutOfRangeResult {
            quantity: "final_cap".into(),
            value: reconciled_amount,
        });
    }

    let (final_cap, capped_at_maximum, below_minimum_loan) =
        apply_ticket_limits(reconciled_amount, lending);

    debug!(
        %income_based_cap,
        %collateral_based_cap,
        secured,
        %final_cap,
        "eligibility reconciled"
    );

    Ok(LoanEligibility {
        capacity,
        credit_score,
        interest_rate_percent: rate,
        tenure_months: lending.tenure_months,
        income_based_cap,
        collateral_value,
        loan_to_value: lending.loan_to_value,
        collateral_based_cap,
        secured,
        credit_multiplier,
        reconciled_amount,
        final_cap,
        capped_at_maximum,
        below_minimum_loan,
        policy_version: policy.version.clone(),
    })
}

/// Invert the installment formula at the policy tenure.
fn income_cap(safe_emi: Money, rate: Percent, lending: &LendingPolicy) -> CreditEngineResult<Money> {
    if safe_emi <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let principal = principal_for_installment(safe_emi, rate, lending.tenure_months)?;
    Ok(whole_units(principal))
}

/// The ceiling always applies. An amount under the floor is withdrawn rather
/// than lifted, since lifting it would lend more than either cap allows.
fn apply_ticket_limits(amount: Money, lending: &LendingPolicy) -> (Money, bool, bool) {
    if amount > lending.maximum_loan {
        return (lending.maximum_loan, true, false);
    }
    if amount < lending.minimum_loan {
        if amount > Decimal::ZERO {
            warn!(%amount, minimum = %lending.minimum_loan, "eligible amount below minimum loan");
        }
        return (Decimal::ZERO, false, true);
    }
    (amount, false, false)
}
