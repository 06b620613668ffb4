use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::fields::{has_text, NumericField};
use super::ApplicantProfile;
use crate::types::round_half_up;

/// Below this percentage the assessment carries the insufficient-data flag.
pub const COMPLETENESS_THRESHOLD: Decimal = dec!(60);

/// The onboarding schema, in capture order.
pub const REQUIRED_FIELDS: [&str; 38] = [
    "full_name",
    "age",
    "gender",
    "preferred_language",
    "aadhaar_number",
    "phone_number",
    "marital_status",
    "voter_id",
    "village_name",
    "district",
    "state",
    "pincode",
    "house_type",
    "electricity_connection",
    "number_of_dependents",
    "primary_occupation",
    "secondary_income_sources",
    "monthly_income",
    "monthly_expenses",
    "seasonal_variation",
    "bank_account_status",
    "bank_name",
    "existing_loans",
    "repayment_history",
    "savings_per_month",
    "group_membership",
    "past_loan_amounts",
    "owns_land",
    "land_area",
    "land_type",
    "patta_or_katha_number",
    "property_location",
    "owns_smartphone",
    "knows_how_to_use_apps",
    "preferred_mode_of_communication",
    "internet_availability",
    "user_notes",
    "agent_observations",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub total_fields: usize,
    pub provided_fields: usize,
    /// provided / total * 100, one decimal.
    pub completeness_percentage: Decimal,
    pub missing_field_names: Vec<String>,
    pub provided_field_names: Vec<String>,
    /// True at or above [`COMPLETENESS_THRESHOLD`].
    pub sufficient: bool,
}

/// Count which schema fields carry a value. Blank strings are missing; a
/// numeric zero is a provided value.
pub fn check_completeness(profile: &ApplicantProfile) -> CompletenessReport {
    let presence = field_presence(profile);

    let (provided, missing): (Vec<_>, Vec<_>) = presence.iter().partition(|(_, p)| *p);
    let provided_field_names: Vec<String> =
        provided.iter().map(|(name, _)| name.to_string()).collect();
    let missing_field_names: Vec<String> =
        missing.iter().map(|(name, _)| name.to_string()).collect();

    let total = presence.len();
    let percentage = round_half_up(
        Decimal::from(provided_field_names.len() as u64) * dec!(100) / Decimal::from(total as u64),
        1,
    );

    CompletenessReport {
        total_fields: total,
        provided_fields: provided_field_names.len(),
        completeness_percentage: percentage,
        missing_field_names,
        provided_field_names,
        sufficient: percentage >= COMPLETENESS_THRESHOLD,
    }
}

fn has_number(value: &Option<NumericField>) -> bool {
    matches!(value, Some(v) if !v.is_blank())
}

fn field_presence(p: &ApplicantProfile) -> [(&'static str, bool); 38] {
    [
        ("full_name", has_text(&p.full_name)),
        ("age", has_number(&p.age)),
        ("gender", has_text(&p.gender)),
        ("preferred_language", has_text(&p.preferred_language)),
        ("aadhaar_number", has_text(&p.aadhaar_number)),
        ("phone_number", has_text(&p.phone_number)),
        ("marital_status", has_text(&p.marital_status)),
        ("voter_id", has_text(&p.voter_id)),
        ("village_name", has_text(&p.village_name)),
        ("district", has_text(&p.district)),
        ("state", has_text(&p.state)),
        ("pincode", has_text(&p.pincode)),
        ("house_type", has_text(&p.house_type)),
        ("electricity_connection", has_text(&p.electricity_connection)),
        ("number_of_dependents", has_number(&p.number_of_dependents)),
        ("primary_occupation", has_text(&p.primary_occupation)),
        ("secondary_income_sources", has_text(&p.secondary_income_sources)),
        ("monthly_income", has_number(&p.monthly_income)),
        ("monthly_expenses", has_number(&p.monthly_expenses)),
        ("seasonal_variation", has_text(&p.seasonal_variation)),
        ("bank_account_status", has_text(&p.bank_account_status)),
        ("bank_name", has_text(&p.bank_name)),
        ("existing_loans", has_text(&p.existing_loans)),
        ("repayment_history", has_text(&p.repayment_history)),
        ("savings_per_month", has_number(&p.savings_per_month)),
        ("group_membership", has_text(&p.group_membership)),
        ("past_loan_amounts", has_text(&p.past_loan_amounts)),
        ("owns_land", has_text(&p.owns_land)),
        ("land_area", has_text(&p.land_area)),
        ("land_type", has_text(&p.land_type)),
        ("patta_or_katha_number", has_text(&p.patta_or_katha_number)),
        ("property_location", has_text(&p.property_location)),
        ("owns_smartphone", has_text(&p.owns_smartphone)),
        ("knows_how_to_use_apps", has_text(&p.knows_how_to_use_apps)),
        (
            "preferred_mode_of_communication",
            has_text(&p.preferred_mode_of_communication),
        ),
        ("internet_availability", has_text(&p.internet_availability)),
        ("user_notes", has_text(&p.user_notes)),
        ("agent_observations", has_text(&p.agent_observations)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_presence_order_matches_schema() {
        let names: Vec<&str> = field_presence(&ApplicantProfile::default())
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names, REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn test_blank_profile_is_zero_percent() {
        let report = check_completeness(&ApplicantProfile::default());
        assert_eq!(report.total_fields, 38);
        assert_eq!(report.provided_fields, 0);
        assert_eq!(report.completeness_percentage, dec!(0));
        assert_eq!(report.missing_field_names.len(), 38);
        assert!(!report.sufficient);
    }

    #[test]
    fn test_whitespace_strings_are_missing() {
        let profile = ApplicantProfile {
            full_name: Some("   ".into()),
            district: Some("Mandya".into()),
            ..Default::default()
        };
        let report = check_completeness(&profile);
        assert_eq!(report.provided_field_names, vec!["district".to_string()]);
    }

    #[test]
    fn test_zero_income_counts_as_provided() {
        let profile = ApplicantProfile {
            monthly_income: Some(NumericField::Number(dec!(0))),
            ..Default::default()
        };
        let report = check_completeness(&profile);
        assert_eq!(report.provided_fields, 1);
        // 1 / 38 = 2.63% => 2.6
        assert_eq!(report.completeness_percentage, dec!(2.6));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 23 / 38 = 60.5% is sufficient, 22 / 38 = 57.9% is not
        let mut profile = ApplicantProfile::default();
        let text_fields: Vec<&mut Option<String>> = vec![
            &mut profile.full_name,
            &mut profile.gender,
            &mut profile.preferred_language,
            &mut profile.aadhaar_number,
            &mut profile.phone_number,
            &mut profile.marital_status,
            &mut profile.voter_id,
            &mut profile.village_name,
            &mut profile.district,
            &mut profile.state,
            &mut profile.pincode,
            &mut profile.house_type,
            &mut profile.electricity_connection,
            &mut profile.primary_occupation,
            &mut profile.secondary_income_sources,
            &mut profile.seasonal_variation,
            &mut profile.bank_account_status,
            &mut profile.bank_name,
            &mut profile.existing_loans,
            &mut profile.repayment_history,
            &mut profile.group_membership,
            &mut profile.past_loan_amounts,
        ];
        for f in text_fields {
            *f = Some("x".into());
        }
        let report = check_completeness(&profile);
        assert_eq!(report.provided_fields, 22);
        assert_eq!(report.completeness_percentage, dec!(57.9));
        assert!(!report.sufficient);

        profile.owns_land = Some("yes".into());
        let report = check_completeness(&profile);
        assert_eq!(report.completeness_percentage, dec!(60.5));
        assert!(report.sufficient);
    }
}
