//! Rule-based credit scoring: five factor scorers, a weighted aggregate and
//! the published 300-900 verdict.

pub mod aggregate;
pub mod factors;
pub mod rules;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::policy::{Factor, FactorWeights, ScoringPolicy, WeightSource};
use crate::profile::completeness::check_completeness;
use crate::profile::{ApplicantProfile, FieldIssue};
use crate::types::SubScore;
use crate::CreditEngineResult;

pub use aggregate::{aggregate, CompositeScore, FactorContribution, Recommendation, RiskCategory};
pub use factors::{score_all, score_factor, Adjustment, FactorBreakdown};

/// One clamped sub-score per factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores {
    pub income_stability: SubScore,
    pub repayment_history: SubScore,
    pub social_capital: SubScore,
    pub asset_ownership: SubScore,
    pub financial_behavior: SubScore,
}

impl FactorScores {
    pub fn get(&self, factor: Factor) -> SubScore {
        match factor {
            Factor::IncomeStability => self.income_stability,
            Factor::RepaymentHistory => self.repayment_history,
            Factor::SocialCapital => self.social_capital,
            Factor::AssetOwnership => self.asset_ownership,
            Factor::FinancialBehavior => self.financial_behavior,
        }
    }

    /// Scores in [`Factor::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, SubScore)> + '_ {
        Factor::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

impl From<&[FactorBreakdown; 5]> for FactorScores {
    fn from(breakdowns: &[FactorBreakdown; 5]) -> Self {
        let score = |factor: Factor| {
            breakdowns
                .iter()
                .find(|b| b.factor == factor)
                .map(|b| b.score)
                .unwrap_or_default()
        };
        FactorScores {
            income_stability: score(Factor::IncomeStability),
            repayment_history: score(Factor::RepaymentHistory),
            social_capital: score(Factor::SocialCapital),
            asset_ownership: score(Factor::AssetOwnership),
            financial_behavior: score(Factor::FinancialBehavior),
        }
    }
}

/// The engine's verdict on one applicant, with everything needed to audit
/// it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    /// Published score, 300-900.
    pub credit_score: Decimal,
    /// Weighted composite, 0-100.
    pub composite_score: Decimal,
    pub risk_category: RiskCategory,
    pub recommendation: Recommendation,
    pub key_risk_factors: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub factor_scores: FactorScores,
    pub weighted_contributions: Vec<FactorContribution>,
    pub factor_details: Vec<FactorBreakdown>,
    pub weights_applied: FactorWeights,
    pub weight_source: WeightSource,
    pub completeness_percentage: Decimal,
    /// Completeness fell below the 60% gate; the verdict is provisional.
    pub insufficient_data: bool,
    /// Present but unreadable fields, scored as absent.
    pub field_issues: Vec<FieldIssue>,
    pub policy_version: String,
}

impl CreditAssessment {
    /// Conditions a caller must surface alongside the verdict.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.insufficient_data {
            warnings.push(format!(
                "Insufficient data: profile is {}% complete, verdict is provisional",
                self.completeness_percentage
            ));
        }
        for issue in &self.field_issues {
            warnings.push(format!("Field '{}' could not be read: {}", issue.field, issue.reason));
        }
        if let WeightSource::FallbackToDefault { reason } = &self.weight_source {
            warnings.push(format!("Weight override rejected ({reason}); default weights applied"));
        }
        warnings
    }
}

/// Score under the published policy, optionally overriding the weights.
pub fn score(
    profile: &ApplicantProfile,
    weights_override: Option<&[Decimal]>,
) -> CreditEngineResult<CreditAssessment> {
    score_with_policy(profile, weights_override, &ScoringPolicy::default())
}

pub fn score_with_policy(
    profile: &ApplicantProfile,
    weights_override: Option<&[Decimal]>,
    policy: &ScoringPolicy,
) -> CreditEngineResult<CreditAssessment> {
    let completeness = check_completeness(profile);
    let field_issues = profile.field_issues();
    for issue in &field_issues {
        warn!(field = %issue.field, reason = %issue.reason, "unreadable field scored as absent");
    }

    let (weights, weight_source) = select_weights(weights_override, &policy.weights);

    let breakdowns = score_all(profile);
    let scores = FactorScores::from(&breakdowns);
    let composite = aggregate(&scores, &weights)?;

    let insufficient_data = !completeness.sufficient;
    if insufficient_data {
        warn!(
            completeness = %completeness.completeness_percentage,
            "profile below completeness gate, assessment is provisional"
        );
    }
    debug!(
        credit_score = %composite.credit_score,
        risk = %composite.risk_category,
        "applicant scored"
    );

    Ok(CreditAssessment {
        credit_score: composite.credit_score,
        composite_score: composite.composite_score,
        risk_category: composite.risk_category,
        recommendation: composite.recommendation,
        key_risk_factors: composite.key_risk_factors,
        improvement_areas: composite.improvement_areas,
        factor_scores: scores,
        weighted_contributions: composite.contributions,
        factor_details: breakdowns.to_vec(),
        weights_applied: weights,
        weight_source,
        completeness_percentage: completeness.completeness_percentage,
        insufficient_data,
        field_issues,
        policy_version: policy.version.clone(),
    })
}

fn select_weights(
    weights_override: Option<&[Decimal]>,
    policy_weights: &FactorWeights,
) -> (FactorWeights, WeightSource) {
    match weights_override {
        Some(vector) => FactorWeights::resolve(Some(vector)),
        None if *policy_weights == FactorWeights::default() => {
            (policy_weights.clone(), WeightSource::Default)
        }
        None => (policy_weights.clone(), WeightSource::Policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_profile_is_flagged_but_scored() {
        let assessment = score(&ApplicantProfile::default(), None).unwrap();
        assert!(assessment.insufficient_data);
        assert_eq!(assessment.credit_score, dec!(432));
        assert_eq!(assessment.completeness_percentage, dec!(0));
        assert_eq!(assessment.weight_source, WeightSource::Default);
        assert_eq!(assessment.warnings().len(), 1);
    }

    #[test]
    fn test_override_uses_only_weighted_factors() {
        let weights = [dec!(50), dec!(50), dec!(0), dec!(0), dec!(0)];
        let assessment = score(&ApplicantProfile::default(), Some(&weights)).unwrap();
        assert_eq!(assessment.weight_source, WeightSource::Override);
        // (10 + 40) / 2
        assert_eq!(assessment.composite_score, dec!(25));
        assert_eq!(assessment.credit_score, dec!(450));
    }

    #[test]
    fn test_zero_override_falls_back() {
        let weights = [Decimal::ZERO; 5];
        let assessment = score(&ApplicantProfile::default(), Some(&weights)).unwrap();
        assert!(matches!(
            assessment.weight_source,
            WeightSource::FallbackToDefault { .. }
        ));
        assert_eq!(assessment.weights_applied, FactorWeights::default());
    }

    #[test]
    fn test_policy_weights_recorded_as_policy() {
        let mut policy = ScoringPolicy::default();
        policy.weights.income_stability = dec!(35);
        policy.weights.repayment_history = dec!(20);
        let assessment =
            score_with_policy(&ApplicantProfile::default(), None, &policy).unwrap();
        assert_eq!(assessment.weight_source, WeightSource::Policy);
        assert_eq!(assessment.policy_version, "2024.1");
    }

    #[test]
    fn test_factor_scores_iter_order() {
        let scores = FactorScores {
            income_stability: 1,
            repayment_history: 2,
            social_capital: 3,
            asset_ownership: 4,
            financial_behavior: 5,
        };
        let order: Vec<u8> = scores.iter().map(|(_, s)| s).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
    }
}
