use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use rural_credit_core::amortization::amortize;
use rural_credit_core::eligibility::{assess_loan_request, compute_eligibility_with_policy};
use rural_credit_core::scoring::score_with_policy;
use rural_credit_core::{with_metadata, Money, Percent};

use crate::input;

use super::{PolicyArgs, ProfileArgs};

#[derive(Args)]
pub struct EligibilityArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct AmortizeArgs {
    /// JSON file with principal, annual_rate_percent and tenure_months
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<u32>,
}

#[derive(Args)]
pub struct RequestArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Requested loan amount
    #[arg(long)]
    pub amount: Decimal,

    /// Tenure of the displayed repayment plan in months
    #[arg(long)]
    pub tenure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AmortizationInput {
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = args.policy.load()?;
    let assessment = score_with_policy(&profile, args.policy.weights_override(), &policy)?;
    let eligibility = compute_eligibility_with_policy(&profile, &assessment, &policy)?;

    let mut warnings = assessment.warnings();
    warnings.extend(eligibility.warnings());

    let assumptions = json!({
        "tenure_months": policy.lending.tenure_months,
        "emi_income_share": policy.lending.emi_income_share.to_string(),
        "safety_buffer": policy.lending.safety_buffer.to_string(),
        "loan_to_value": policy.lending.loan_to_value.to_string(),
    });
    let output = with_metadata(
        "Lesser of income-based and collateral-based caps within ticket limits",
        &assumptions,
        warnings,
        &policy.version,
        eligibility,
    );
    Ok(serde_json::to_value(output)?)
}

fn amortization_input(args: &AmortizeArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    match (args.principal, args.rate, args.tenure) {
        (Some(principal), Some(annual_rate_percent), Some(tenure_months)) => Ok(AmortizationInput {
            principal,
            annual_rate_percent,
            tenure_months,
        }),
        (None, None, None) => match input::stdin::read_stdin()? {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => Err("--input <file.json>, stdin or --principal/--rate/--tenure required".into()),
        },
        _ => Err("--principal, --rate and --tenure must be given together".into()),
    }
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = amortization_input(&args)?;
    let schedule = amortize(
        request.principal,
        request.annual_rate_percent,
        request.tenure_months,
    )?;

    let assumptions = json!({
        "principal": request.principal.to_string(),
        "annual_rate_percent": request.annual_rate_percent.to_string(),
        "tenure_months": request.tenure_months,
    });
    let output = with_metadata(
        "Fixed monthly installment; final row absorbs rounding",
        &assumptions,
        Vec::new(),
        "n/a",
        schedule,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_request(args: RequestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = args.policy.load()?;
    let assessment = score_with_policy(&profile, args.policy.weights_override(), &policy)?;
    let eligibility = compute_eligibility_with_policy(&profile, &assessment, &policy)?;
    let request = assess_loan_request(&eligibility, args.amount, args.tenure)?;

    let mut warnings = eligibility.warnings();
    if !request.within_eligibility {
        warnings.push(format!(
            "Requested {} exceeds eligibility by {}",
            request.requested_amount, request.shortfall
        ));
    }

    let assumptions = json!({
        "credit_score": assessment.credit_score.to_string(),
        "eligible_amount": eligibility.final_cap.to_string(),
    });
    let output = with_metadata(
        "Requested amount compared with the eligible cap",
        &assumptions,
        warnings,
        &policy.version,
        request,
    );
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flags(principal: Option<Decimal>, rate: Option<Decimal>, tenure: Option<u32>) -> AmortizeArgs {
        AmortizeArgs {
            input: None,
            principal,
            rate,
            tenure,
        }
    }

    #[test]
    fn test_amortize_from_flags() {
        let value = run_amortize(flags(Some(dec!(100_000)), Some(dec!(12)), Some(12))).unwrap();
        let rows = value["result"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(value["result"]["tenure_months"], json!(12));
    }

    #[test]
    fn test_partial_flags_rejected() {
        let err = amortization_input(&flags(Some(dec!(100_000)), None, Some(12))).unwrap_err();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn test_zero_tenure_is_an_engine_error() {
        assert!(run_amortize(flags(Some(dec!(100_000)), Some(dec!(12)), Some(0))).is_err());
    }
}
