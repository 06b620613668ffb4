use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CreditEngineError;
use crate::types::Money;
use crate::CreditEngineResult;

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandClass {
    Commercial,
    Residential,
    Agricultural,
}

impl LandClass {
    /// Unclassified land is valued at the agricultural rate, the lowest.
    pub fn classify(land_type: Option<&str>) -> LandClass {
        match land_type {
            Some(t) if t.contains("commercial") => LandClass::Commercial,
            Some(t) if t.contains("residential") => LandClass::Residential,
            _ => LandClass::Agricultural,
        }
    }
}

impl std::fmt::Display for LandClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandClass::Commercial => write!(f, "commercial"),
            LandClass::Residential => write!(f, "residential"),
            LandClass::Agricultural => write!(f, "agricultural"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Concrete,
    Pucca,
    SemiPucca,
    Kachcha,
}

impl StructureType {
    /// Most specific wording first: "semi-pucca" must not read as "pucca".
    pub fn classify(house_type: &str) -> Option<StructureType> {
        if house_type.contains("semi") {
            Some(StructureType::SemiPucca)
        } else if house_type.contains("kachcha") || house_type.contains("temporary") {
            Some(StructureType::Kachcha)
        } else if house_type.contains("concrete") {
            Some(StructureType::Concrete)
        } else if house_type.contains("pucca") {
            Some(StructureType::Pucca)
        } else {
            None
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureType::Concrete => write!(f, "concrete"),
            StructureType::Pucca => write!(f, "pucca"),
            StructureType::SemiPucca => write!(f, "semi-pucca"),
            StructureType::Kachcha => write!(f, "kachcha"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTier {
    Metro,
    Other,
}

// ---------------------------------------------------------------------------
// Rate tables
// ---------------------------------------------------------------------------

/// Per-acre rate split by location tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRates {
    pub metro: Money,
    pub other: Money,
}

impl TierRates {
    pub fn get(&self, tier: LocationTier) -> Money {
        match tier {
            LocationTier::Metro => self.metro,
            LocationTier::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandRates {
    pub commercial: TierRates,
    pub residential: TierRates,
    pub agricultural: TierRates,
}

impl LandRates {
    pub fn per_acre(&self, class: LandClass, tier: LocationTier) -> Money {
        match class {
            LandClass::Commercial => self.commercial.get(tier),
            LandClass::Residential => self.residential.get(tier),
            LandClass::Agricultural => self.agricultural.get(tier),
        }
    }
}

/// Base value of a dwelling by construction type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureValues {
    pub concrete: Money,
    pub pucca: Money,
    pub semi_pucca: Money,
    pub kachcha: Money,
}

impl StructureValues {
    pub fn get(&self, kind: StructureType) -> Money {
        match kind {
            StructureType::Concrete => self.concrete,
            StructureType::Pucca => self.pucca,
            StructureType::SemiPucca => self.semi_pucca,
            StructureType::Kachcha => self.kachcha,
        }
    }
}

/// A named city that lifts structure values; `metro` cities also use the
/// metro land rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRule {
    pub name: String,
    pub keywords: Vec<String>,
    pub multiplier: Decimal,
    pub metro: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub city: Option<String>,
    pub tier: LocationTier,
    pub multiplier: Decimal,
}

/// Ceiling on any per-acre land rate or structure base value.
pub const MAX_RATE: Money = dec!(1_000_000_000_000);
pub const MAX_LOCATION_MULTIPLIER: Decimal = dec!(10);

/// Bank-assessment rates and the open-market rates they are held below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollateralRates {
    pub bank_land: LandRates,
    pub market_land: LandRates,
    pub bank_structure: StructureValues,
    pub market_structure: StructureValues,
    pub locations: Vec<LocationRule>,
}

impl Default for CollateralRates {
    fn default() -> Self {
        CollateralRates {
            bank_land: LandRates {
                commercial: TierRates { metro: dec!(3_000_000), other: dec!(800_000) },
                residential: TierRates { metro: dec!(2_000_000), other: dec!(500_000) },
                agricultural: TierRates { metro: dec!(800_000), other: dec!(200_000) },
            },
            market_land: LandRates {
                commercial: TierRates { metro: dec!(7_500_000), other: dec!(2_000_000) },
                residential: TierRates { metro: dec!(5_000_000), other: dec!(1_250_000) },
                agricultural: TierRates { metro: dec!(2_000_000), other: dec!(500_000) },
            },
            bank_structure: StructureValues {
                concrete: dec!(1_000_000),
                pucca: dec!(800_000),
                semi_pucca: dec!(400_000),
                kachcha: dec!(150_000),
            },
            market_structure: StructureValues {
                concrete: dec!(2_000_000),
                pucca: dec!(1_600_000),
                semi_pucca: dec!(800_000),
                kachcha: dec!(300_000),
            },
            locations: vec![
                location("Bengaluru", &["bangalore", "bengaluru"], dec!(1.8), true),
                location("Mysuru", &["mysore", "mysuru"], dec!(1.4), false),
                location("Mangaluru", &["mangalore", "mangaluru"], dec!(1.4), false),
                location("Hubballi", &["hubli", "hubballi"], dec!(1.3), false),
                location("Belagavi", &["belgaum", "belagavi"], dec!(1.3), false),
            ],
        }
    }
}

fn location(name: &str, keywords: &[&str], multiplier: Decimal, metro: bool) -> LocationRule {
    LocationRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        multiplier,
        metro,
    }
}

impl CollateralRates {
    /// Match a lower-cased location against the named cities. Unnamed places
    /// get the non-metro tier and a multiplier of 1.
    pub fn locate(&self, location: Option<&str>) -> LocationMatch {
        let rule = location.and_then(|loc| {
            self.locations
                .iter()
                .find(|rule| rule.keywords.iter().any(|k| loc.contains(k.as_str())))
        });
        match rule {
            Some(rule) => LocationMatch {
                city: Some(rule.name.clone()),
                tier: if rule.metro { LocationTier::Metro } else { LocationTier::Other },
                multiplier: rule.multiplier,
            },
            None => LocationMatch {
                city: None,
                tier: LocationTier::Other,
                multiplier: Decimal::ONE,
            },
        }
    }

    /// Every bank rate must sit strictly below its market counterpart, and
    /// no rate or multiplier may exceed its ceiling.
    pub fn validate(&self) -> CreditEngineResult<()> {
        let classes = [LandClass::Commercial, LandClass::Residential, LandClass::Agricultural];
        for class in classes {
            for tier in [LocationTier::Metro, LocationTier::Other] {
                let bank = self.bank_land.per_acre(class, tier);
                let market = self.market_land.per_acre(class, tier);
                if market > MAX_RATE {
                    return Err(CreditEngineError::InvalidInput {
                        field: format!("market_land.{class}"),
                        reason: format!("Land rate cannot exceed {MAX_RATE} per acre"),
                    });
                }
                if bank < Decimal::ZERO || bank >= market {
                    return Err(CreditEngineError::InvalidInput {
                        field: format!("bank_land.{class}"),
                        reason: "Bank land rate must be non-negative and below the market rate"
                            .into(),
                    });
                }
            }
        }
        let kinds = [
            StructureType::Concrete,
            StructureType::Pucca,
            StructureType::SemiPucca,
            StructureType::Kachcha,
        ];
        for kind in kinds {
            let bank = self.bank_structure.get(kind);
            let market = self.market_structure.get(kind);
            if market > MAX_RATE {
                return Err(CreditEngineError::InvalidInput {
                    field: format!("market_structure.{kind}"),
                    reason: format!("Structure value cannot exceed {MAX_RATE}"),
                });
            }
            if bank < Decimal::ZERO || bank >= market {
                return Err(CreditEngineError::InvalidInput {
                    field: format!("bank_structure.{kind}"),
                    reason: "Bank structure value must be non-negative and below the market value"
                        .into(),
                });
            }
        }
        let out_of_range = self
            .locations
            .iter()
            .find(|r| r.multiplier < Decimal::ONE || r.multiplier > MAX_LOCATION_MULTIPLIER);
        if let Some(rule) = out_of_range {
            return Err(CreditEngineError::InvalidInput {
                field: format!("locations.{}", rule.name),
                reason: format!("Location multiplier must be within [1, {MAX_LOCATION_MULTIPLIER}]"),
            });
        }
        Ok(())
    }
}
