use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CreditEngineError;
use crate::types::Money;

/// Largest amount a numeric profile field may carry. Anything above reads as
/// a typo and is treated as unreadable.
pub const MAX_FIELD_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Largest land holding accepted, in the declared unit.
pub const MAX_LAND_QUANTITY: Decimal = dec!(1_000_000);

/// A numeric profile field as onboarding captures it: either a JSON number or
/// free text such as `"15,000"` or `"Rs. 2000/month"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(Decimal),
    Text(String),
}

impl NumericField {
    /// `Ok(None)` for blank text, `Err` when the value carries no usable
    /// digits or is negative.
    pub fn parse(&self, field: &str) -> Result<Option<Decimal>, FieldIssue> {
        match self {
            NumericField::Number(n) if *n < Decimal::ZERO => {
                Err(FieldIssue::new(field, "Value cannot be negative"))
            }
            NumericField::Number(n) => within_bound(field, *n).map(Some),
            NumericField::Text(s) if s.trim().is_empty() => Ok(None),
            NumericField::Text(s) => leading_number(s)
                .ok_or_else(|| FieldIssue::new(field, "No digits found in numeric field"))
                .and_then(|n| within_bound(field, n))
                .map(Some),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, NumericField::Text(s) if s.trim().is_empty())
    }
}

/// A field that was present but could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: &str, reason: &str) -> Self {
        FieldIssue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl From<FieldIssue> for CreditEngineError {
    fn from(issue: FieldIssue) -> Self {
        CreditEngineError::MalformedInput {
            field: issue.field,
            reason: issue.reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    Acre,
    Gunta,
    Cent,
}

impl AreaUnit {
    /// Acre equivalent of one unit.
    pub fn acre_factor(self) -> Decimal {
        match self {
            AreaUnit::Acre => Decimal::ONE,
            AreaUnit::Gunta => dec!(0.025),
            AreaUnit::Cent => dec!(0.01),
        }
    }
}

/// A declared land holding. Text without a recognised unit is read as acres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandArea {
    pub quantity: Decimal,
    pub unit: AreaUnit,
}

impl LandArea {
    pub fn parse(raw: &str) -> Result<Option<LandArea>, FieldIssue> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return Ok(None);
        }
        let quantity = leading_number(&lowered)
            .ok_or_else(|| FieldIssue::new("land_area", "No digits found in land area"))?;
        if quantity > MAX_LAND_QUANTITY {
            return Err(FieldIssue::new("land_area", "Land area is implausibly large"));
        }
        let unit = if lowered.contains("gunta") {
            AreaUnit::Gunta
        } else if lowered.contains("cent") {
            AreaUnit::Cent
        } else {
            AreaUnit::Acre
        };
        Ok(Some(LandArea { quantity, unit }))
    }

    pub fn acres(&self) -> Decimal {
        self.quantity * self.unit.acre_factor()
    }
}

/// Read a numeric profile field, treating blank and unreadable values as
/// absent.
pub fn amount(value: &Option<NumericField>) -> Option<Money> {
    value.as_ref().and_then(|v| v.parse("").ok().flatten())
}

/// Lower-cased, trimmed text, or `None` when absent or blank.
pub fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// True when the text field is present and non-blank.
pub fn has_text(value: &Option<String>) -> bool {
    text(value).is_some()
}

/// A plain yes/no answer that reads as yes.
pub fn is_affirmative(value: &Option<String>) -> bool {
    matches!(text(value).as_deref(), Some("yes" | "y" | "true"))
}

fn within_bound(field: &str, value: Decimal) -> Result<Decimal, FieldIssue> {
    if value > MAX_FIELD_AMOUNT {
        return Err(FieldIssue::new(field, "Value is implausibly large"));
    }
    Ok(value)
}

/// First number in free text. Thousands separators are skipped and at most
/// one decimal point is accepted.
fn leading_number(raw: &str) -> Option<Decimal> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let mut digits = String::new();
    let mut seen_point = false;
    let mut chars = raw[start..].chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => digits.push(c),
            ',' => continue,
            '.' if !seen_point && chars.peek().is_some_and(|n| n.is_ascii_digit()) => {
                seen_point = true;
                digits.push('.');
            }
            _ => break,
        }
    }
    Decimal::from_str(&digits).ok()
}
