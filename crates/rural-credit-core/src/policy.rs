//! Versioned policy parameters: factor weights, lending rules and collateral
//! rate tables. All values are immutable inputs to the engine; loading an
//! external weight vector is a pure parse-and-normalize step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::amortization::MAX_TENURE_MONTHS;
use crate::collateral::rates::CollateralRates;
use crate::error::CreditEngineError;
use crate::types::{round_half_up, Money, Percent, Ratio};
use crate::CreditEngineResult;

// ---------------------------------------------------------------------------
// Factors and weights
// ---------------------------------------------------------------------------

/// The five scoring factors, in the fixed order used to map override vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    IncomeStability,
    RepaymentHistory,
    SocialCapital,
    AssetOwnership,
    FinancialBehavior,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::IncomeStability,
        Factor::RepaymentHistory,
        Factor::SocialCapital,
        Factor::AssetOwnership,
        Factor::FinancialBehavior,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Factor::IncomeStability => "income_stability",
            Factor::RepaymentHistory => "repayment_history",
            Factor::SocialCapital => "social_capital",
            Factor::AssetOwnership => "asset_ownership",
            Factor::FinancialBehavior => "financial_behavior",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Percentage weight per factor; sums to 100 within [`NORMALIZED_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub income_stability: Decimal,
    pub repayment_history: Decimal,
    pub social_capital: Decimal,
    pub asset_ownership: Decimal,
    pub financial_behavior: Decimal,
}

impl Default for FactorWeights {
    fn default() -> Self {
        FactorWeights {
            income_stability: dec!(25),
            repayment_history: dec!(30),
            social_capital: dec!(20),
            asset_ownership: dec!(15),
            financial_behavior: dec!(10),
        }
    }
}

/// Where the applied weights came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightSource {
    Default,
    /// Non-default weights carried by the policy document.
    Policy,
    Override,
    FallbackToDefault { reason: String },
}

impl FactorWeights {
    pub fn get(&self, factor: Factor) -> Decimal {
        match factor {
            Factor::IncomeStability => self.income_stability,
            Factor::RepaymentHistory => self.repayment_history,
            Factor::SocialCapital => self.social_capital,
            Factor::AssetOwnership => self.asset_ownership,
            Factor::FinancialBehavior => self.financial_behavior,
        }
    }

    /// Sum of the five weights, saturating at `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        checked_total(Factor::ALL.iter().map(|f| self.get(*f))).unwrap_or(Decimal::MAX)
    }

    pub fn as_vec(&self) -> Vec<Decimal> {
        Factor::ALL.iter().map(|f| self.get(*f)).collect()
    }

    /// Resolve the weights to apply. With no override the defaults are used.
    /// An override maps its first five entries onto [`Factor::ALL`] and is
    /// rescaled by the sum of absolute values to percentages, each rounded to
    /// one decimal. Short, all-zero or unsummable vectors fall back to the
    /// defaults.
    pub fn resolve(override_vector: Option<&[Decimal]>) -> (FactorWeights, WeightSource) {
        let Some(raw) = override_vector else {
            return (FactorWeights::default(), WeightSource::Default);
        };

        if raw.len() < Factor::ALL.len() {
            return fallback(format!(
                "override has {} entries, expected at least {}",
                raw.len(),
                Factor::ALL.len()
            ));
        }

        let head = &raw[..Factor::ALL.len()];
        let Some(total) = checked_total(head.iter().map(|w| w.abs())) else {
            return fallback("override weights are too large to sum".into());
        };
        if total.is_zero() {
            return fallback("override weights sum to zero".into());
        }

        let exact: Vec<Decimal> = head.iter().map(|w| w.abs() / total * dec!(100)).collect();
        let scaled = round_tenths(&exact);

        (
            FactorWeights {
                income_stability: scaled[0],
                repayment_history: scaled[1],
                social_capital: scaled[2],
                asset_ownership: scaled[3],
                financial_behavior: scaled[4],
            },
            WeightSource::Override,
        )
    }

    /// Rescale weights read from a policy file so they total 100. A
    /// non-negative table already within rounding of 100 is kept as written.
    pub fn normalized(&self) -> FactorWeights {
        let non_negative = self.as_vec().iter().all(|w| *w >= Decimal::ZERO);
        match checked_total(self.as_vec().into_iter()) {
            Some(total) if non_negative && (total - dec!(100)).abs() <= NORMALIZED_TOLERANCE => {
                self.clone()
            }
            _ => FactorWeights::resolve(Some(&self.as_vec())).0,
        }
    }
}

/// How far a normalized table may total from 100.
pub const NORMALIZED_TOLERANCE: Decimal = dec!(0.1);

fn checked_total(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |acc, w| acc?.checked_add(w))
}

/// Round each share half-up to one decimal. When the rounding drift carries
/// the total more than [`NORMALIZED_TOLERANCE`] from 100, the weights rounded
/// furthest in that direction give back a tenth each (earlier factors first
/// on ties) until it is back within tolerance.
fn round_tenths(exact: &[Decimal]) -> Vec<Decimal> {
    let mut rounded: Vec<Decimal> = exact.iter().map(|w| round_half_up(*w, 1)).collect();
    let drift = |r: &[Decimal]| r.iter().copied().sum::<Decimal>() - dec!(100);
    let mut order: Vec<usize> = (0..exact.len()).collect();

    if drift(&rounded) > NORMALIZED_TOLERANCE {
        order.sort_by(|a, b| (rounded[*b] - exact[*b]).cmp(&(rounded[*a] - exact[*a])));
        for i in order {
            if drift(&rounded) <= NORMALIZED_TOLERANCE {
                break;
            }
            rounded[i] -= dec!(0.1);
        }
    } else if drift(&rounded) < -NORMALIZED_TOLERANCE {
        order.sort_by(|a, b| (rounded[*a] - exact[*a]).cmp(&(rounded[*b] - exact[*b])));
        for i in order {
            if drift(&rounded) >= -NORMALIZED_TOLERANCE {
                break;
            }
            rounded[i] += dec!(0.1);
        }
    }
    rounded
}

fn fallback(reason: String) -> (FactorWeights, WeightSource) {
    warn!(%reason, "weight override rejected, using default weights");
    (
        FactorWeights::default(),
        WeightSource::FallbackToDefault { reason },
    )
}

// ---------------------------------------------------------------------------
// Lending policy
// ---------------------------------------------------------------------------

/// Annual rate offered at or above a published credit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    pub min_score: Decimal,
    pub annual_rate_percent: Percent,
}

/// Credit-score multiplier applied to unsecured income-based caps. A policy
/// parameter, tunable without touching the reconciliation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsecuredAdjustment {
    pub strong_score: Decimal,
    pub strong_multiplier: Ratio,
    pub weak_below_score: Decimal,
    pub weak_multiplier: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    /// Gross monthly income at or below which the lower haircut applies.
    pub net_income_bracket: Money,
    pub lower_bracket_take_home: Ratio,
    pub upper_bracket_take_home: Ratio,
    /// Ceiling on total EMIs as a share of net income.
    pub emi_income_share: Ratio,
    /// Share of obligations counted as existing debt service.
    pub obligation_share: Ratio,
    /// Living costs assumed as a share of net income when expenses are absent.
    pub living_cost_baseline: Ratio,
    pub safety_buffer: Ratio,
    /// Ordered from the highest `min_score` down.
    pub rate_bands: Vec<RateBand>,
    pub floor_rate_percent: Percent,
    pub tenure_months: u32,
    pub loan_to_value: Ratio,
    pub unsecured_adjustment: UnsecuredAdjustment,
    pub minimum_loan: Money,
    pub maximum_loan: Money,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        LendingPolicy {
            net_income_bracket: dec!(50_000),
            lower_bracket_take_home: dec!(0.9),
            upper_bracket_take_home: dec!(0.8),
            emi_income_share: dec!(0.45),
            obligation_share: dec!(0.10),
            living_cost_baseline: dec!(0.30),
            safety_buffer: dec!(0.15),
            rate_bands: vec![
                RateBand { min_score: dec!(750), annual_rate_percent: dec!(10.5) },
                RateBand { min_score: dec!(650), annual_rate_percent: dec!(12.0) },
                RateBand { min_score: dec!(550), annual_rate_percent: dec!(14.0) },
                RateBand { min_score: dec!(450), annual_rate_percent: dec!(16.5) },
            ],
            floor_rate_percent: dec!(18.0),
            tenure_months: 60,
            loan_to_value: dec!(0.70),
            unsecured_adjustment: UnsecuredAdjustment {
                strong_score: dec!(750),
                strong_multiplier: dec!(1.2),
                weak_below_score: dec!(650),
                weak_multiplier: dec!(0.8),
            },
            minimum_loan: dec!(10_000),
            maximum_loan: dec!(10_000_000),
        }
    }
}

impl LendingPolicy {
    /// Annual rate for a published credit score.
    pub fn rate_for_score(&self, credit_score: Decimal) -> Percent {
        self.rate_bands
            .iter()
            .find(|band| credit_score >= band.min_score)
            .map(|band| band.annual_rate_percent)
            .unwrap_or(self.floor_rate_percent)
    }

    /// Multiplier on the unsecured income-based cap.
    pub fn unsecured_multiplier(&self, credit_score: Decimal) -> Ratio {
        let adj = &self.unsecured_adjustment;
        if credit_score >= adj.strong_score {
            adj.strong_multiplier
        } else if credit_score < adj.weak_below_score {
            adj.weak_multiplier
        } else {
            Decimal::ONE
        }
    }

    fn validate(&self) -> CreditEngineResult<()> {
        let ratios = [
            ("lower_bracket_take_home", self.lower_bracket_take_home),
            ("upper_bracket_take_home", self.upper_bracket_take_home),
            ("emi_income_share", self.emi_income_share),
            ("obligation_share", self.obligation_share),
            ("living_cost_baseline", self.living_cost_baseline),
            ("safety_buffer", self.safety_buffer),
            ("loan_to_value", self.loan_to_value),
        ];
        for (field, value) in ratios {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(CreditEngineError::InvalidInput {
                    field: field.into(),
                    reason: "Ratio must be within [0, 1]".into(),
                });
            }
        }
        if self.tenure_months == 0 || self.tenure_months > MAX_TENURE_MONTHS {
            return Err(CreditEngineError::InvalidInput {
                field: "tenure_months".into(),
                reason: format!("Tenure must be between 1 and {MAX_TENURE_MONTHS} months"),
            });
        }
        if self.minimum_loan < Decimal::ZERO || self.minimum_loan > self.maximum_loan {
            return Err(CreditEngineError::InvalidInput {
                field: "minimum_loan".into(),
                reason: "Minimum loan must be non-negative and not exceed the maximum".into(),
            });
        }
        let descending = self
            .rate_bands
            .windows(2)
            .all(|pair| pair[0].min_score > pair[1].min_score);
        if !descending {
            return Err(CreditEngineError::InvalidInput {
                field: "rate_bands".into(),
                reason: "Rate bands must be ordered by descending min_score".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bundled policy
// ---------------------------------------------------------------------------

/// Everything a verdict depends on besides the applicant record. Stored next
/// to each assessment so old verdicts are never reinterpreted under new
/// tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub version: String,
    pub effective_date: NaiveDate,
    pub weights: FactorWeights,
    pub lending: LendingPolicy,
    pub collateral: CollateralRates,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            version: "2024.1".into(),
            effective_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
            weights: FactorWeights::default(),
            lending: LendingPolicy::default(),
            collateral: CollateralRates::default(),
        }
    }
}

impl ScoringPolicy {
    /// Parse a policy document; weights that do not total 100 are
    /// normalized on load.
    pub fn from_json(json: &str) -> CreditEngineResult<Self> {
        let policy: ScoringPolicy = serde_json::from_str(json)?;
        policy.prepared()
    }

    /// Validate and normalize a policy obtained from any source.
    pub fn prepared(mut self) -> CreditEngineResult<Self> {
        self.lending.validate()?;
        self.collateral.validate()?;
        self.weights = self.weights.normalized();
        Ok(self)
    }
}
