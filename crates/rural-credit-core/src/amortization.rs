//! Fixed-installment (EMI) amortization.
//!
//! `EMI = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate, and its
//! algebraic inverse `P = EMI * ((1+r)^n - 1) / (r * (1+r)^n)`. A zero rate
//! degenerates to straight-line repayment in both directions.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CreditEngineError;
use crate::types::{round_half_up, Money, Percent, Ratio};
use crate::CreditEngineResult;

/// Longest tenure accepted (50 years).
pub const MAX_TENURE_MONTHS: u32 = 600;

/// One installment period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub installment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Full repayment plan for a fixed-installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    pub monthly_installment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

/// Convert an annual percentage rate to a monthly fraction.
pub fn monthly_rate(annual_rate_percent: Percent) -> Ratio {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Equated monthly installment for `principal` over `tenure_months`.
pub fn emi(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> CreditEngineResult<Money> {
    validate_terms(annual_rate_percent, tenure_months)?;
    if principal < Decimal::ZERO {
        return Err(CreditEngineError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(principal / Decimal::from(tenure_months));
    }

    let factor = growth_factor(r, tenure_months)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(CreditEngineError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| overflow("principal"))
}

/// Largest principal that `installment` fully amortizes over `tenure_months`.
/// Exact inverse of [`emi`].
pub fn principal_for_installment(
    installment: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> CreditEngineResult<Money> {
    validate_terms(annual_rate_percent, tenure_months)?;
    if installment < Decimal::ZERO {
        return Err(CreditEngineError::InvalidInput {
            field: "installment".into(),
            reason: "Installment cannot be negative".into(),
        });
    }

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return installment
            .checked_mul(Decimal::from(tenure_months))
            .ok_or_else(|| overflow("installment"));
    }

    let factor = growth_factor(r, tenure_months)?;
    let denom = r.checked_mul(factor).ok_or_else(|| overflow("annual_rate_percent"))?;
    if denom.is_zero() {
        return Err(CreditEngineError::DivisionByZero {
            context: "present value of installments".into(),
        });
    }

    installment
        .checked_mul(factor - Decimal::ONE)
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| overflow("installment"))
}

/// Build the period-by-period repayment plan. Rows are rounded to two
/// decimals; the last row absorbs the rounding residual so the closing
/// balance is exactly zero.
pub fn amortize(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> CreditEngineResult<AmortizationSchedule> {
    let installment = round_half_up(emi(principal, annual_rate_percent, tenure_months)?, 2);
    let r = monthly_rate(annual_rate_percent);

    let mut rows = Vec::with_capacity(tenure_months as usize);
    let mut balance = principal;
    let mut total_payment = Decimal::ZERO;

    for period in 1..=tenure_months {
        let interest = round_half_up(balance * r, 2);
        let mut principal_part = installment - interest;
        if period == tenure_months || principal_part > balance {
            principal_part = balance;
        }
        let payment = principal_part + interest;
        balance -= principal_part;
        total_payment = total_payment
            .checked_add(payment)
            .ok_or_else(|| overflow("principal"))?;

        rows.push(AmortizationRow {
            period,
            installment: payment,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });
    }

    debug!(
        %principal,
        %annual_rate_percent,
        tenure_months,
        %installment,
        "amortization schedule built"
    );

    Ok(AmortizationSchedule {
        principal,
        annual_rate_percent,
        tenure_months,
        monthly_installment: installment,
        total_payment,
        total_interest: total_payment - principal,
        rows,
    })
}

fn growth_factor(r: Ratio, tenure_months: u32) -> CreditEngineResult<Decimal> {
    (Decimal::ONE + r)
        .checked_powu(u64::from(tenure_months))
        .ok_or_else(|| CreditEngineError::InvalidInput {
            field: "tenure_months".into(),
            reason: "Compounding factor overflows for this rate and tenure".into(),
        })
}

fn validate_terms(annual_rate_percent: Percent, tenure_months: u32) -> CreditEngineResult<()> {
    if tenure_months == 0 {
        return Err(CreditEngineError::InvalidInput {
            field: "tenure_months".into(),
            reason: "Tenure must be at least one month".into(),
        });
    }
    if tenure_months > MAX_TENURE_MONTHS {
        return Err(CreditEngineError::InvalidInput {
            field: "tenure_months".into(),
            reason: format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CreditEngineError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    Ok(())
}

fn overflow(field: &str) -> CreditEngineError {
    CreditEngineError::InvalidInput {
        field: field.into(),
        reason: "Amount too large to compute an installment plan".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_emi_reference_loan() {
        // 1,00,000 at 12% over 60 months => 2,224.44
        let result = emi(dec!(100_000), dec!(12), 60).unwrap();
        assert!((result - dec!(2224.44)).abs() < dec!(0.01));
    }

    #[test]
    fn test_emi_zero_rate_is_straight_line() {
        let result = emi(dec!(12_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(result, dec!(1000));
    }

    #[test]
    fn test_inverse_recovers_principal() {
        let installment = emi(dec!(250_000), dec!(14), 60).unwrap();
        let principal = principal_for_installment(installment, dec!(14), 60).unwrap();
        assert!((principal - dec!(250_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_inverse_zero_rate() {
        let principal = principal_for_installment(dec!(500), Decimal::ZERO, 24).unwrap();
        assert_eq!(principal, dec!(12_000));
    }

    #[test]
    fn test_schedule_closes_to_zero() {
        let schedule = amortize(dec!(100_000), dec!(12), 60).unwrap();
        assert_eq!(schedule.rows.len(), 60);
        assert_eq!(schedule.monthly_installment, dec!(2224.44));
        let last = schedule.rows.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        let principal_sum: Decimal = schedule.rows.iter().map(|r| r.principal).sum();
        assert_eq!(principal_sum, dec!(100_000));
    }

    #[test]
    fn test_first_row_split() {
        let schedule = amortize(dec!(100_000), dec!(12), 60).unwrap();
        let first = &schedule.rows[0];
        assert_eq!(first.interest, dec!(1000.00));
        assert_eq!(first.principal, dec!(1224.44));
        assert_eq!(first.closing_balance, dec!(98775.56));
    }

    #[test]
    fn test_total_interest_consistent() {
        let schedule = amortize(dec!(50_000), dec!(16.5), 24).unwrap();
        let interest_sum: Decimal = schedule.rows.iter().map(|r| r.interest).sum();
        assert_eq!(schedule.total_interest, interest_sum);
    }

    #[test]
    fn test_zero_tenure_rejected() {
        let err = amortize(dec!(10_000), dec!(12), 0).unwrap_err();
        match err {
            CreditEngineError::InvalidInput { field, .. } => assert_eq!(field, "tenure_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_tenure_rejected_before_allocation() {
        let err = amortize(dec!(10_000), Decimal::ZERO, u32::MAX).unwrap_err();
        match err {
            CreditEngineError::InvalidInput { field, .. } => assert_eq!(field, "tenure_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(amortize(dec!(10_000), dec!(12), MAX_TENURE_MONTHS).is_ok());
    }

    #[test]
    fn test_huge_principal_is_an_error() {
        assert!(amortize(dec!(100_000_000_000_000_000_000), dec!(1000), 60).is_err());
        assert!(principal_for_installment(Decimal::MAX, Decimal::ZERO, 60).is_err());
        assert!(principal_for_installment(Decimal::MAX, dec!(12), 60).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(emi(dec!(10_000), dec!(-1), 12).is_err());
    }
}
