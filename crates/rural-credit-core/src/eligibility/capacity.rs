use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::LendingPolicy;
use crate::types::{whole_units, Money};

/// How much of a monthly income can safely go to a new installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiCapacity {
    pub gross_monthly_income: Money,
    pub net_monthly_income: Money,
    /// Net income times the EMI income share.
    pub max_emi_capacity: Money,
    pub existing_obligations: Money,
    /// True when expenses were not declared and the living-cost baseline
    /// stands in for them.
    pub obligations_estimated: bool,
    pub obligation_deduction: Money,
    pub available_emi: Money,
    /// Available EMI after the safety buffer, never negative.
    pub safe_emi_capacity: Money,
}

/// Two-bracket take-home estimate. Income exactly at the bracket keeps the
/// lower haircut.
pub fn net_monthly_income(gross: Money, policy: &LendingPolicy) -> Money {
    if gross > policy.net_income_bracket {
        gross * policy.upper_bracket_take_home
    } else {
        gross * policy.lower_bracket_take_home
    }
}

struct Headroom {
    gross: Money,
    net: Money,
    max_emi: Money,
    obligations: Money,
    estimated: bool,
    deduction: Money,
    available: Money,
    safe: Money,
}

fn headroom(
    gross_income: Option<Money>,
    declared_expenses: Option<Money>,
    policy: &LendingPolicy,
) -> Headroom {
    let gross = gross_income.unwrap_or(Decimal::ZERO);
    let net = net_monthly_income(gross, policy);
    let max_emi = net * policy.emi_income_share;

    let (obligations, estimated) = match declared_expenses {
        Some(expenses) => (expenses, false),
        None => (net * policy.living_cost_baseline, true),
    };
    let deduction = obligations * policy.obligation_share;
    let available = max_emi - deduction;
    let safe = (available * (Decimal::ONE - policy.safety_buffer)).max(Decimal::ZERO);

    Headroom {
        gross,
        net,
        max_emi,
        obligations,
        estimated,
        deduction,
        available,
        safe,
    }
}

/// Unrounded safe installment. The income cap is inverted from this figure
/// so that truncation happens once, on the cap itself.
pub fn safe_emi(
    gross_income: Option<Money>,
    declared_expenses: Option<Money>,
    policy: &LendingPolicy,
) -> Money {
    headroom(gross_income, declared_expenses, policy).safe
}

/// All amounts are truncated to whole units. Absent income yields zero
/// capacity; absent expenses fall back to the living-cost baseline.
pub fn emi_capacity(
    gross_income: Option<Money>,
    declared_expenses: Option<Money>,
    policy: &LendingPolicy,
) -> EmiCapacity {
    let h = headroom(gross_income, declared_expenses, policy);
    EmiCapacity {
        gross_monthly_income: whole_units(h.gross),
        net_monthly_income: whole_units(h.net),
        max_emi_capacity: whole_units(h.max_emi),
        existing_obligations: whole_units(h.obligations),
        obligations_estimated: h.estimated,
        obligation_deduction: whole_units(h.deduction),
        available_emi: whole_units(h.available),
        safe_emi_capacity: whole_units(h.safe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_income_brackets() {
        let policy = LendingPolicy::default();
        assert_eq!(net_monthly_income(dec!(15_000), &policy), dec!(13_500));
        assert_eq!(net_monthly_income(dec!(50_000), &policy), dec!(45_000));
        assert_eq!(net_monthly_income(dec!(60_000), &policy), dec!(48_000));
    }

    #[test]
    fn test_capacity_with_declared_expenses() {
        let cap = emi_capacity(Some(dec!(15_000)), Some(dec!(10_000)), &LendingPolicy::default());
        // 13500 * 0.45 = 6075; minus 1000; * 0.85 = 4313.75
        assert_eq!(cap.max_emi_capacity, dec!(6075));
        assert_eq!(cap.obligation_deduction, dec!(1000));
        assert_eq!(cap.safe_emi_capacity, dec!(4313));
        assert!(!cap.obligations_estimated);
    }

    #[test]
    fn test_safe_emi_keeps_fraction() {
        let policy = LendingPolicy::default();
        assert_eq!(safe_emi(Some(dec!(15_000)), Some(dec!(10_000)), &policy), dec!(4313.75));
        assert_eq!(safe_emi(None, None, &policy), Decimal::ZERO);
    }

    #[test]
    fn test_capacity_with_baseline_expenses() {
        let cap = emi_capacity(Some(dec!(20_000)), None, &LendingPolicy::default());
        // net 18000; max 8100; obligations 5400; deduction 540; safe 6426
        assert!(cap.obligations_estimated);
        assert_eq!(cap.existing_obligations, dec!(5400));
        assert_eq!(cap.safe_emi_capacity, dec!(6426));
    }

    #[test]
    fn test_absent_income_has_no_capacity() {
        let cap = emi_capacity(None, Some(dec!(5_000)), &LendingPolicy::default());
        assert_eq!(cap.net_monthly_income, Decimal::ZERO);
        assert_eq!(cap.safe_emi_capacity, Decimal::ZERO);
    }

    #[test]
    fn test_capacity_never_negative() {
        let cap = emi_capacity(Some(dec!(5_000)), Some(dec!(200_000)), &LendingPolicy::default());
        assert_eq!(cap.safe_emi_capacity, Decimal::ZERO);
        assert!(cap.available_emi < Decimal::ZERO);
    }
}
