use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FactorScores;
use crate::error::CreditEngineError;
use crate::policy::{Factor, FactorWeights};
use crate::types::round_half_up;
use crate::CreditEngineResult;

/// Lowest and highest published score.
pub const SCORE_FLOOR: Decimal = dec!(300);
pub const SCORE_CEILING: Decimal = dec!(900);
const SCORE_SPAN_PER_POINT: Decimal = dec!(6.0);

/// Weights are rounded to one decimal each, so their total may drift
/// slightly from 100.
const WEIGHT_TOTAL_TOLERANCE: Decimal = dec!(0.5);

const RISK_FACTOR_THRESHOLD: u8 = 60;
const IMPROVEMENT_THRESHOLD: u8 = 70;
const MAX_LISTED_FACTORS: usize = 3;

pub const NO_SIGNIFICANT_RISK: &str = "No significant risk factors identified";

// ---------------------------------------------------------------------------
// Risk bands
// ---------------------------------------------------------------------------

/// Ordered from safest to riskiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    /// Inclusive lower bounds on the 300-900 scale.
    pub fn from_credit_score(credit_score: Decimal) -> RiskCategory {
        if credit_score >= dec!(750) {
            RiskCategory::VeryLow
        } else if credit_score >= dec!(650) {
            RiskCategory::Low
        } else if credit_score >= dec!(550) {
            RiskCategory::Medium
        } else if credit_score >= dec!(450) {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }

    pub fn recommendation(self) -> Recommendation {
        match self {
            RiskCategory::VeryLow | RiskCategory::Low => Recommendation::Approved,
            RiskCategory::Medium => Recommendation::ConditionalApproval,
            RiskCategory::High => Recommendation::NeedsSupport,
            RiskCategory::VeryHigh => Recommendation::Rejected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::VeryLow => "Very Low",
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Approved,
    #[serde(rename = "Conditional Approval")]
    ConditionalApproval,
    #[serde(rename = "Needs Support")]
    NeedsSupport,
    Rejected,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Recommendation::Approved => "Approved",
            Recommendation::ConditionalApproval => "Conditional Approval",
            Recommendation::NeedsSupport => "Needs Support",
            Recommendation::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

pub fn risk_tag(factor: Factor) -> &'static str {
    match factor {
        Factor::IncomeStability => "Irregular or low income source",
        Factor::RepaymentHistory => "Poor or no repayment track record",
        Factor::SocialCapital => "Limited community ties or group membership",
        Factor::AssetOwnership => "Insufficient collateral or asset ownership",
        Factor::FinancialBehavior => "Poor financial management or savings habits",
    }
}

pub fn improvement_tag(factor: Factor) -> &'static str {
    match factor {
        Factor::IncomeStability => "Diversify income sources",
        Factor::RepaymentHistory => "Build repayment track record through group lending",
        Factor::SocialCapital => "Join a self-help group or cooperative",
        Factor::AssetOwnership => "Document and formalize asset ownership",
        Factor::FinancialBehavior => "Maintain regular savings and bank account usage",
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub score: u8,
    pub weight: Decimal,
    /// score x weight / 100, two decimals.
    pub contribution: Decimal,
}

/// The composite verdict for one set of sub-scores and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Published score, 300-900.
    pub credit_score: Decimal,
    /// Weighted composite on the 0-100 scale, two decimals.
    pub composite_score: Decimal,
    pub risk_category: RiskCategory,
    pub recommendation: Recommendation,
    pub key_risk_factors: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub contributions: Vec<FactorContribution>,
}

/// Combine sub-scores and weights into the published verdict.
///
/// Weights must total 100 within rounding tolerance. A composite or
/// published score that still lands outside its range is an engine bug and
/// is reported, not clamped.
pub fn aggregate(
    scores: &FactorScores,
    weights: &FactorWeights,
) -> CreditEngineResult<CompositeScore> {
    let weight_total = weights.total();
    if Factor::ALL.iter().any(|f| weights.get(*f) < Decimal::ZERO) {
        return Err(CreditEngineError::InvalidInput {
            field: "weights".into(),
            reason: "Factor weights must be non-negative".into(),
        });
    }
    if (weight_total - dec!(100)).abs() > WEIGHT_TOTAL_TOLERANCE {
        return Err(CreditEngineError::InvalidInput {
            field: "weights".into(),
            reason: format!("Factor weights total {weight_total}, expected 100"),
        });
    }

    let contributions: Vec<FactorContribution> = Factor::ALL
        .iter()
        .map(|f| {
            let score = scores.get(*f);
            let weight = weights.get(*f);
            FactorContribution {
                factor: *f,
                score,
                weight,
                contribution: round_half_up(Decimal::from(score) * weight / dec!(100), 2),
            }
        })
        .collect();

    let raw: Decimal = Factor::ALL
        .iter()
        .map(|f| Decimal::from(scores.get(*f)) * weights.get(*f))
        .sum::<Decimal>()
        / dec!(100);

    // Only the weight-rounding slack is absorbed here.
    if raw < Decimal::ZERO || raw > dec!(100) + WEIGHT_TOTAL_TOLERANCE {
        return Err(CreditEngineError::OutOfRangeResult {
            quantity: "composite_score".into(),
            value: raw,
        });
    }
    let composite = raw.min(dec!(100));

    let credit_score = round_half_up(SCORE_FLOOR + composite * SCORE_SPAN_PER_POINT, 0);
    if credit_score < SCORE_FLOOR || credit_score > SCORE_CEILING {
        return Err(CreditEngineError::OutOfRangeResult {
            quantity: "credit_score".into(),
            value: credit_score,
        });
    }

    let risk_category = RiskCategory::from_credit_score(credit_score);

    Ok(CompositeScore {
        credit_score,
        composite_score: round_half_up(composite, 2),
        risk_category,
        recommendation: risk_category.recommendation(),
        key_risk_factors: key_risk_factors(scores),
        improvement_areas: improvement_areas(scores),
        contributions,
    })
}

/// Up to three weakest factors under 60, weakest first.
pub fn key_risk_factors(scores: &FactorScores) -> Vec<String> {
    let tags: Vec<String> = weakest(scores, RISK_FACTOR_THRESHOLD)
        .into_iter()
        .map(|f| risk_tag(f).to_string())
        .collect();
    if tags.is_empty() {
        vec![NO_SIGNIFICANT_RISK.to_string()]
    } else {
        tags
    }
}

/// Up to three weakest factors under 70, weakest first.
pub fn improvement_areas(scores: &FactorScores) -> Vec<String> {
    weakest(scores, IMPROVEMENT_THRESHOLD)
        .into_iter()
        .map(|f| improvement_tag(f).to_string())
        .collect()
}

/// Ties keep factor order.
fn weakest(scores: &FactorScores, below: u8) -> Vec<Factor> {
    let mut ranked: Vec<(Factor, u8)> = scores.iter().collect();
    ranked.sort_by_key(|(_, score)| *score);
    ranked
        .into_iter()
        .filter(|(_, score)| *score < below)
        .take(MAX_LISTED_FACTORS)
        .map(|(factor, _)| factor)
        .collect()
}
