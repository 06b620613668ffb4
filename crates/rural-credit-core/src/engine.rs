//! The whole applicant flow in one call: completeness, scoring, collateral,
//! eligibility and the repayment plan for the final cap.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::amortization::{amortize, AmortizationSchedule};
use crate::collateral::{value_collateral_with_rates, CollateralValuation};
use crate::eligibility::{eligibility_from_valuation, LoanEligibility};
use crate::policy::ScoringPolicy;
use crate::profile::completeness::{check_completeness, CompletenessReport};
use crate::profile::ApplicantProfile;
use crate::scoring::{score_with_policy, CreditAssessment};
use crate::types::{with_metadata, ComputationOutput};
use crate::CreditEngineResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantEvaluation {
    pub completeness: CompletenessReport,
    pub assessment: CreditAssessment,
    pub collateral: CollateralValuation,
    pub eligibility: LoanEligibility,
    /// Plan for the final cap at the policy tenure; absent when no loan is
    /// offered.
    pub repayment_schedule: Option<AmortizationSchedule>,
}

/// Evaluate one applicant under `policy`.
pub fn evaluate(
    profile: &ApplicantProfile,
    weights_override: Option<&[Decimal]>,
    policy: &ScoringPolicy,
) -> CreditEngineResult<ComputationOutput<ApplicantEvaluation>> {
    let completeness = check_completeness(profile);
    let assessment = score_with_policy(profile, weights_override, policy)?;
    let collateral = value_collateral_with_rates(profile, &policy.collateral);
    let eligibility = eligibility_from_valuation(profile, &assessment, &collateral, policy)?;

    let repayment_schedule = if eligibility.final_cap > Decimal::ZERO {
        Some(amortize(
            eligibility.final_cap,
            eligibility.interest_rate_percent,
            eligibility.tenure_months,
        )?)
    } else {
        None
    };

    let mut warnings = assessment.warnings();
    warnings.extend(eligibility.warnings());

    info!(
        credit_score = %assessment.credit_score,
        risk = %assessment.risk_category,
        final_cap = %eligibility.final_cap,
        "applicant evaluated"
    );

    let assumptions = serde_json::json!({
        "policy_version": policy.version,
        "effective_date": policy.effective_date.to_string(),
        "weights": assessment.weights_applied,
        "tenure_months": policy.lending.tenure_months,
        "loan_to_value": policy.lending.loan_to_value.to_string(),
        "emi_income_share": policy.lending.emi_income_share.to_string(),
        "safety_buffer": policy.lending.safety_buffer.to_string(),
    });

    let evaluation = ApplicantEvaluation {
        completeness,
        assessment,
        collateral,
        eligibility,
        repayment_schedule,
    };

    Ok(with_metadata(
        "Weighted five-factor credit score with income and collateral loan caps",
        &assumptions,
        warnings,
        &policy.version,
        evaluation,
    ))
}
