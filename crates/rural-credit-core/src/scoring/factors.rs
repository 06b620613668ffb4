//! The five factor scorers. Each reads only the fields it is responsible
//! for, collects every matching adjustment, then clamps once.

use serde::{Deserialize, Serialize};

use super::rules::{self, first_match, is_negative, threshold_points, KeywordTier};
use crate::collateral::StructureType;
use crate::policy::Factor;
use crate::profile::fields::{is_affirmative, text};
use crate::profile::ApplicantProfile;
use crate::types::SubScore;

/// One rule that fired and the points it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub rule: String,
    pub points: i32,
}

/// Audit trail for a single factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub factor: Factor,
    pub base: i32,
    pub adjustments: Vec<Adjustment>,
    /// Base plus adjustments, clamped to [0, 100].
    pub score: SubScore,
}

struct Tally {
    factor: Factor,
    base: i32,
    adjustments: Vec<Adjustment>,
}

impl Tally {
    fn new(factor: Factor, base: i32) -> Self {
        Tally {
            factor,
            base,
            adjustments: Vec::new(),
        }
    }

    fn add(&mut self, rule: &str, points: i32) {
        self.adjustments.push(Adjustment {
            rule: rule.to_string(),
            points,
        });
    }

    fn tier(&mut self, tier: Option<&KeywordTier>) {
        if let Some(t) = tier {
            self.add(t.rule, t.points);
        }
    }

    fn finish(self) -> FactorBreakdown {
        let raw = self.base + self.adjustments.iter().map(|a| a.points).sum::<i32>();
        FactorBreakdown {
            factor: self.factor,
            base: self.base,
            adjustments: self.adjustments,
            score: raw.clamp(0, 100) as SubScore,
        }
    }
}

/// Run all five scorers in [`Factor::ALL`] order.
pub fn score_all(profile: &ApplicantProfile) -> [FactorBreakdown; 5] {
    [
        income_stability(profile),
        repayment_history(profile),
        social_capital(profile),
        asset_ownership(profile),
        financial_behavior(profile),
    ]
}

pub fn score_factor(profile: &ApplicantProfile, factor: Factor) -> FactorBreakdown {
    match factor {
        Factor::IncomeStability => income_stability(profile),
        Factor::RepaymentHistory => repayment_history(profile),
        Factor::SocialCapital => social_capital(profile),
        Factor::AssetOwnership => asset_ownership(profile),
        Factor::FinancialBehavior => financial_behavior(profile),
    }
}

// ---------------------------------------------------------------------------
// Scorers
// ---------------------------------------------------------------------------

/// Occupation, income bracket, seasonality and secondary income.
pub fn income_stability(profile: &ApplicantProfile) -> FactorBreakdown {
    let mut tally = Tally::new(Factor::IncomeStability, rules::INCOME_BASE);

    if let Some(occupation) = text(&profile.primary_occupation) {
        match first_match(rules::OCCUPATION_TIERS, &occupation) {
            Some(tier) => tally.add(tier.rule, tier.points),
            None => tally.add("other_occupation", rules::OCCUPATION_OTHER_POINTS),
        }
    }

    if let Some(income) = profile.monthly_income() {
        if let Some((rule, points)) = threshold_points(rules::INCOME_BRACKETS, income) {
            tally.add(rule, points);
        }
    }

    if let Some(seasonal) = text(&profile.seasonal_variation) {
        tally.tier(first_match(rules::SEASONAL_TIERS, &seasonal));
    }

    if declared(&profile.secondary_income_sources) {
        tally.add("secondary_income", rules::SECONDARY_INCOME_POINTS);
    }

    tally.finish()
}

/// Repayment record, current debt burden and borrowing experience. An
/// applicant with no history keeps the base score.
pub fn repayment_history(profile: &ApplicantProfile) -> FactorBreakdown {
    let mut tally = Tally::new(Factor::RepaymentHistory, rules::REPAYMENT_BASE);

    if let Some(history) = text(&profile.repayment_history) {
        tally.tier(first_match(rules::REPAYMENT_TIERS, &history));
    }

    if let Some(loans) = text(&profile.existing_loans) {
        tally.tier(first_match(rules::EXISTING_LOAN_TIERS, &loans));
    }

    let borrowed_before = text(&profile.past_loan_amounts)
        .is_some_and(|past| !is_negative(&past) && past != "0");
    if borrowed_before {
        tally.add("borrowing_experience", rules::BORROWING_EXPERIENCE_POINTS);
    }

    tally.finish()
}

/// Group membership, banking access and reachability.
pub fn social_capital(profile: &ApplicantProfile) -> FactorBreakdown {
    let mut tally = Tally::new(Factor::SocialCapital, rules::SOCIAL_BASE);

    if let Some(group) = text(&profile.group_membership).filter(|g| !is_negative(g)) {
        tally.tier(first_match(rules::GROUP_TIERS, &group));
    }

    let banked = text(&profile.bank_account_status)
        .is_some_and(|status| !is_negative(&status) && rules::BANK_ACCOUNT_TIER.matches(&status));
    if banked {
        tally.add(rules::BANK_ACCOUNT_TIER.rule, rules::BANK_ACCOUNT_TIER.points);
    }

    if profile.phone_number.as_deref().is_some_and(is_valid_phone) {
        tally.add("reachable_by_phone", rules::PHONE_POINTS);
    }

    if is_affirmative(&profile.owns_smartphone) {
        tally.add("owns_smartphone", rules::SMARTPHONE_POINTS);
    }

    tally.finish()
}

/// Land (gated on an explicit ownership answer), house construction and
/// electricity.
pub fn asset_ownership(profile: &ApplicantProfile) -> FactorBreakdown {
    let mut tally = Tally::new(Factor::AssetOwnership, rules::ASSET_BASE);

    if is_affirmative(&profile.owns_land) {
        tally.add("owns_land", rules::LAND_OWNERSHIP_POINTS);

        if let Some(area) = profile.land_area() {
            let acres = area.acres();
            match threshold_points(rules::LAND_AREA_TIERS, acres) {
                Some((rule, points)) => tally.add(rule, points),
                None if acres > rust_decimal::Decimal::ZERO => {
                    tally.add("marginal_holding", rules::MARGINAL_HOLDING_POINTS)
                }
                None => {}
            }
        }

        if let Some(land_type) = text(&profile.land_type) {
            tally.tier(first_match(rules::LAND_TYPE_TIERS, &land_type));
        }
    }

    if let Some(kind) = text(&profile.house_type).and_then(|h| StructureType::classify(&h)) {
        match kind {
            StructureType::Concrete | StructureType::Pucca => {
                tally.add("pucca_house", rules::PUCCA_HOUSE_POINTS)
            }
            StructureType::SemiPucca => tally.add("semi_pucca_house", rules::SEMI_PUCCA_HOUSE_POINTS),
            StructureType::Kachcha => tally.add("kachcha_house", rules::KACHCHA_HOUSE_POINTS),
        }
    }

    if is_affirmative(&profile.electricity_connection) {
        tally.add("electricity_connection", rules::ELECTRICITY_POINTS);
    }

    tally.finish()
}

/// Savings habit, monthly surplus and a named banking relationship.
pub fn financial_behavior(profile: &ApplicantProfile) -> FactorBreakdown {
    let mut tally = Tally::new(Factor::FinancialBehavior, rules::FINANCIAL_BASE);

    if let Some(savings) = profile.savings_per_month() {
        match threshold_points(rules::SAVINGS_TIERS, savings) {
            Some((rule, points)) => tally.add(rule, points),
            None if savings > rust_decimal::Decimal::ZERO => {
                tally.add("regular_savings", rules::SMALL_SAVINGS_POINTS)
            }
            None => {}
        }
    }

    if let (Some(income), Some(expenses)) = (profile.monthly_income(), profile.monthly_expenses()) {
        if income > expenses {
            let surplus_ratio = (income - expenses) / income;
            match threshold_points(rules::SURPLUS_TIERS, surplus_ratio) {
                Some((rule, points)) => tally.add(rule, points),
                None => tally.add("within_means", rules::WITHIN_MEANS_POINTS),
            }
        }
    }

    if declared(&profile.bank_name) {
        tally.add("bank_relationship", rules::BANK_RELATIONSHIP_POINTS);
    }

    tally.finish()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Present, non-blank, and not a "none"-style answer.
fn declared(value: &Option<String>) -> bool {
    text(value).is_some_and(|t| !is_negative(&t))
}

/// Ten to thirteen digits, allowing spaces, dashes, brackets and a leading
/// country-code plus sign.
fn is_valid_phone(raw: &str) -> bool {
    let mut digits = 0usize;
    for c in raw.trim().chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if !matches!(c, ' ' | '-' | '+' | '(' | ')') {
            return false;
        }
    }
    (10..=13).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::NumericField;
    use rust_decimal_macros::dec;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn n(v: rust_decimal::Decimal) -> Option<NumericField> {
        Some(NumericField::Number(v))
    }

    #[test]
    fn test_blank_profile_scores_bases() {
        let p = ApplicantProfile::default();
        let scores: Vec<u8> = score_all(&p).iter().map(|b| b.score).collect();
        assert_eq!(scores, vec![10, 40, 20, 10, 20]);
    }

    #[test]
    fn test_income_stability_farmer() {
        let p = ApplicantProfile {
            primary_occupation: s("Farmer"),
            monthly_income: n(dec!(15000)),
            seasonal_variation: s("Yes"),
            secondary_income_sources: s("Dairy"),
            ..Default::default()
        };
        // 10 + 25 + 10 - 5 + 10
        assert_eq!(income_stability(&p).score, 50);
    }

    #[test]
    fn test_unmatched_occupation_gets_other_bonus() {
        let p = ApplicantProfile {
            primary_occupation: s("weaver"),
            ..Default::default()
        };
        assert_eq!(income_stability(&p).score, 20);
    }

    #[test]
    fn test_secondary_income_none_ignored() {
        let p = ApplicantProfile {
            secondary_income_sources: s("None"),
            ..Default::default()
        };
        assert_eq!(income_stability(&p).score, 10);
    }

    #[test]
    fn test_repayment_most_specific_tier_only() {
        let p = ApplicantProfile {
            repayment_history: s("Excellent - always on time, good borrower"),
            ..Default::default()
        };
        let b = repayment_history(&p);
        assert_eq!(b.adjustments.len(), 1);
        assert_eq!(b.score, 80);
    }

    #[test]
    fn test_repayment_default_and_heavy_debt() {
        let p = ApplicantProfile {
            repayment_history: s("defaulted twice"),
            existing_loans: s("multiple loans"),
            ..Default::default()
        };
        // 40 - 30 - 10
        assert_eq!(repayment_history(&p).score, 0);
    }

    #[test]
    fn test_repayment_no_history_not_penalized() {
        let p = ApplicantProfile {
            repayment_history: s("No history"),
            existing_loans: s("None"),
            ..Default::default()
        };
        assert_eq!(repayment_history(&p).score, 55);
    }

    #[test]
    fn test_social_capital_full() {
        let p = ApplicantProfile {
            group_membership: s("Member of Lakshmi SHG"),
            bank_account_status: s("Have active account"),
            phone_number: s("+91 98450 12345"),
            owns_smartphone: s("yes"),
            ..Default::default()
        };
        assert_eq!(social_capital(&p).score, 100);
    }

    #[test]
    fn test_social_capital_negated_answers() {
        let p = ApplicantProfile {
            group_membership: s("No group"),
            bank_account_status: s("no account"),
            phone_number: s("12345"),
            ..Default::default()
        };
        assert_eq!(social_capital(&p).score, 20);
    }

    #[test]
    fn test_asset_ownership_land_gated_on_flag() {
        let without_flag = ApplicantProfile {
            land_area: s("5 acres"),
            land_type: s("commercial"),
            ..Default::default()
        };
        assert_eq!(asset_ownership(&without_flag).score, 10);

        let with_flag = ApplicantProfile {
            owns_land: s("Yes"),
            ..without_flag
        };
        // 10 + 40 + 25 + 15
        assert_eq!(asset_ownership(&with_flag).score, 90);
    }

    #[test]
    fn test_asset_ownership_guntas_normalized() {
        let p = ApplicantProfile {
            owns_land: s("yes"),
            land_area: s("20 guntas"),
            house_type: s("kachcha"),
            ..Default::default()
        };
        // 0.5 acre marginal holding: 10 + 40 + 10 + 5
        assert_eq!(asset_ownership(&p).score, 65);
    }

    #[test]
    fn test_asset_ownership_clamped() {
        let p = ApplicantProfile {
            owns_land: s("yes"),
            land_area: s("12 acres"),
            land_type: s("commercial"),
            house_type: s("concrete"),
            electricity_connection: s("yes"),
            ..Default::default()
        };
        assert_eq!(asset_ownership(&p).score, 100);
    }

    #[test]
    fn test_financial_behavior_tiers() {
        let p = ApplicantProfile {
            savings_per_month: n(dec!(2000)),
            monthly_income: n(dec!(15000)),
            monthly_expenses: n(dec!(10000)),
            ..Default::default()
        };
        // 20 + 20 + 15 (surplus 33%)
        assert_eq!(financial_behavior(&p).score, 55);
    }

    #[test]
    fn test_financial_behavior_malformed_savings_absent() {
        let p = ApplicantProfile {
            savings_per_month: Some(NumericField::Text("some".into())),
            bank_name: s("Canara Bank"),
            ..Default::default()
        };
        assert_eq!(financial_behavior(&p).score, 30);
    }

    #[test]
    fn test_financial_behavior_overspending_no_surplus_bonus() {
        let p = ApplicantProfile {
            monthly_income: n(dec!(8000)),
            monthly_expenses: n(dec!(9000)),
            ..Default::default()
        };
        assert_eq!(financial_behavior(&p).score, 20);
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("9845012345"));
        assert!(is_valid_phone("+91-98450-12345"));
        assert!(!is_valid_phone("98450"));
        assert!(!is_valid_phone("call me"));
    }
}
