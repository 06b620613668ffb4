//! Applicant record as captured by onboarding, plus the completeness gate.

pub mod completeness;
pub mod fields;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CreditEngineError;
use crate::CreditEngineResult;

pub use fields::{AreaUnit, FieldIssue, LandArea, NumericField};

/// Flat applicant record. Every field is optional: absence means "unknown"
/// and is never read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantProfile {
    // Identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<String>,

    // Household and location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_dependents: Option<NumericField>,

    // Occupation and income
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_income_sources: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_variation: Option<String>,

    // Banking history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_loans: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_per_month: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_membership: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_loan_amounts: Option<String>,

    // Land and property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owns_land: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patta_or_katha_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_location: Option<String>,

    // Digital literacy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owns_smartphone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knows_how_to_use_apps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_mode_of_communication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_availability: Option<String>,

    // Notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_observations: Option<String>,
}

impl ApplicantProfile {
    /// Parse a profile from a JSON document. Only a record that is not a JSON
    /// object at all, or a field of the wrong JSON type, is an error.
    pub fn from_json(json: &str) -> CreditEngineResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> CreditEngineResult<Self> {
        if !value.is_object() {
            return Err(CreditEngineError::MalformedInput {
                field: "profile".into(),
                reason: "Applicant record must be a JSON object".into(),
            });
        }
        serde_json::from_value(value).map_err(|e| CreditEngineError::MalformedInput {
            field: "profile".into(),
            reason: e.to_string(),
        })
    }

    /// Gross monthly income, if declared and readable.
    pub fn monthly_income(&self) -> Option<crate::types::Money> {
        fields::amount(&self.monthly_income)
    }

    pub fn monthly_expenses(&self) -> Option<crate::types::Money> {
        fields::amount(&self.monthly_expenses)
    }

    pub fn savings_per_month(&self) -> Option<crate::types::Money> {
        fields::amount(&self.savings_per_month)
    }

    /// Declared land area, if it carries a readable quantity.
    pub fn land_area(&self) -> Option<LandArea> {
        self.land_area
            .as_deref()
            .and_then(|raw| LandArea::parse(raw).ok().flatten())
    }

    /// Fields whose values are present but unreadable. Scorers treat these
    /// as absent; callers surface them as warnings.
    pub fn field_issues(&self) -> Vec<FieldIssue> {
        let numeric = [
            ("age", &self.age),
            ("number_of_dependents", &self.number_of_dependents),
            ("monthly_income", &self.monthly_income),
            ("monthly_expenses", &self.monthly_expenses),
            ("savings_per_month", &self.savings_per_month),
        ];

        let mut issues: Vec<FieldIssue> = numeric
            .iter()
            .filter_map(|(name, value)| match value {
                Some(v) => v.parse(name).err(),
                None => None,
            })
            .collect();

        if let Some(raw) = self.land_area.as_deref() {
            if let Err(issue) = LandArea::parse(raw) {
                issues.push(issue);
            }
        }
        issues
    }
}
