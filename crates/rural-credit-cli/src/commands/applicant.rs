use clap::Args;
use serde_json::{json, Value};
use tracing::debug;

use rural_credit_core::collateral::value_collateral_with_rates;
use rural_credit_core::engine;
use rural_credit_core::profile::completeness::{
    check_completeness, COMPLETENESS_THRESHOLD, REQUIRED_FIELDS,
};
use rural_credit_core::scoring::score_with_policy;
use rural_credit_core::with_metadata;

use super::{PolicyArgs, ProfileArgs};

#[derive(Args)]
pub struct CompletenessArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Policy whose version is stamped on the report
    #[arg(long)]
    pub policy: Option<String>,
}

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct CollateralArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Policy document carrying the collateral rate tables
    #[arg(long)]
    pub policy: Option<String>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

fn policy_only(path: &Option<String>) -> PolicyArgs {
    PolicyArgs {
        policy: path.clone(),
        weights: None,
    }
}

pub fn run_completeness(args: CompletenessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = policy_only(&args.policy).load()?;
    let report = check_completeness(&profile);

    let mut warnings = Vec::new();
    if !report.sufficient {
        warnings.push(format!(
            "Profile is {}% complete; scoring below {}% is provisional",
            report.completeness_percentage, COMPLETENESS_THRESHOLD
        ));
    }

    let assumptions = json!({
        "required_fields": REQUIRED_FIELDS.len(),
        "threshold_percent": COMPLETENESS_THRESHOLD.to_string(),
    });
    let output = with_metadata(
        "Share of required profile fields that are present and non-blank",
        &assumptions,
        warnings,
        &policy.version,
        report,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = args.policy.load()?;
    let assessment = score_with_policy(&profile, args.policy.weights_override(), &policy)?;
    debug!(credit_score = %assessment.credit_score, "score command finished");

    let assumptions = json!({
        "weights": assessment.weights_applied,
        "weight_source": assessment.weight_source,
        "score_range": [300, 900],
    });
    let warnings = assessment.warnings();
    let output = with_metadata(
        "Weighted average of five rule-based factor scores mapped onto 300-900",
        &assumptions,
        warnings,
        &policy.version,
        assessment,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_collateral(args: CollateralArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = policy_only(&args.policy).load()?;
    let valuation = value_collateral_with_rates(&profile, &policy.collateral);

    let mut warnings = Vec::new();
    if valuation.total_value.is_zero() {
        warnings.push("No valuable collateral declared; any loan would be unsecured".to_string());
    }

    let assumptions = json!({
        "land_rates": "per acre by land class and location tier",
        "structure_values": "flat by construction type",
    });
    let output = with_metadata(
        "Bank valuation of owned land and dwelling",
        &assumptions,
        warnings,
        &policy.version,
        valuation,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.load()?;
    let policy = args.policy.load()?;
    let output = engine::evaluate(&profile, args.policy.weights_override(), &policy)?;
    Ok(serde_json::to_value(output)?)
}
