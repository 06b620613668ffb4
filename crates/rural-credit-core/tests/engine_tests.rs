use pretty_assertions::assert_eq;
use rural_credit_core::engine::evaluate;
use rural_credit_core::policy::ScoringPolicy;
use rural_credit_core::profile::ApplicantProfile;
use rural_credit_core::scoring::RiskCategory;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const FARMER_JSON: &str = r#"{
    "full_name": "Lakshmamma",
    "primary_occupation": "Farmer",
    "monthly_income": 15000,
    "monthly_expenses": "10,000",
    "seasonal_variation": "Yes",
    "secondary_income_sources": "Dairy",
    "bank_account_status": "Yes",
    "existing_loans": "Small agriculture loan",
    "repayment_history": "Good",
    "savings_per_month": 2000,
    "group_membership": "Yes - farmers cooperative",
    "owns_land": "Yes",
    "land_area": "2 acres",
    "land_type": "Agricultural",
    "house_type": "Semi-pucca",
    "electricity_connection": "Yes",
    "district": "Mandya"
}"#;

#[test]
fn test_full_evaluation_of_farmer() {
    let profile = ApplicantProfile::from_json(FARMER_JSON).unwrap();
    let output = evaluate(&profile, None, &ScoringPolicy::default()).unwrap();
    let eval = &output.result;

    assert_eq!(eval.completeness.provided_fields, 17);
    assert_eq!(eval.assessment.credit_score, dec!(725));
    assert_eq!(eval.assessment.risk_category, RiskCategory::Low);
    assert_eq!(eval.collateral.total_value, dec!(800_000));
    assert_eq!(eval.eligibility.final_cap, eval.eligibility.income_based_cap);

    let schedule = eval.repayment_schedule.as_ref().unwrap();
    assert_eq!(schedule.principal, eval.eligibility.final_cap);
    assert_eq!(schedule.rows.len(), 60);

    assert_eq!(output.metadata.policy_version, "2024.1");
    assert_eq!(output.assumptions["tenure_months"], 60);
    assert!(output.warnings.iter().any(|w| w.starts_with("Insufficient data")));
}

#[test]
fn test_evaluation_output_is_byte_stable() {
    let profile = ApplicantProfile::from_json(FARMER_JSON).unwrap();
    let policy = ScoringPolicy::default();
    let first = serde_json::to_string(&evaluate(&profile, None, &policy).unwrap()).unwrap();
    let second = serde_json::to_string(&evaluate(&profile, None, &policy).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_evaluation_under_loaded_policy() {
    let policy = ScoringPolicy::from_json(
        r#"{
            "version": "2025.2",
            "effective_date": "2025-10-01",
            "weights": {
                "income_stability": 2,
                "repayment_history": 2,
                "social_capital": 2,
                "asset_ownership": 2,
                "financial_behavior": 2
            },
            "lending": { "tenure_months": 36, "loan_to_value": "0.6" }
        }"#,
    )
    .unwrap();
    let profile = ApplicantProfile::from_json(FARMER_JSON).unwrap();
    let output = evaluate(&profile, None, &policy).unwrap();
    let eval = &output.result;

    assert_eq!(eval.assessment.weights_applied.income_stability, dec!(20.0));
    assert_eq!(eval.assessment.policy_version, "2025.2");
    assert_eq!(eval.eligibility.tenure_months, 36);
    assert_eq!(eval.eligibility.collateral_based_cap, dec!(480_000));
    // (50 + 75 + 80 + 95 + 55) / 5
    assert_eq!(eval.assessment.composite_score, dec!(71));
    assert_eq!(output.metadata.policy_version, "2025.2");
}

#[test]
fn test_weight_fallback_is_reported() {
    let profile = ApplicantProfile::from_json(FARMER_JSON).unwrap();
    let zeros = [Decimal::ZERO; 5];
    let output = evaluate(&profile, Some(&zeros), &ScoringPolicy::default()).unwrap();
    assert!(output.warnings.iter().any(|w| w.contains("Weight override rejected")));
    assert_eq!(output.result.assessment.credit_score, dec!(725));
}

#[test]
fn test_non_object_profile_rejected() {
    assert!(ApplicantProfile::from_json("[1, 2, 3]").is_err());
    assert!(ApplicantProfile::from_json("null").is_err());
    assert!(ApplicantProfile::from_json(r#"{"owns_land": 5}"#).is_err());
}
