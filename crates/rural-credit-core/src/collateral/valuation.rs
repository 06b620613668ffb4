use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::rates::{CollateralRates, LandClass, LocationMatch, StructureType};
use crate::profile::fields::{is_affirmative, text};
use crate::profile::ApplicantProfile;
use crate::types::{whole_units, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandValuation {
    pub acres: Decimal,
    pub classification: LandClass,
    pub rate_per_acre: Money,
    pub assessed_value: Money,
    pub market_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureValuation {
    pub structure_type: StructureType,
    pub base_value: Money,
    pub location_multiplier: Decimal,
    pub assessed_value: Money,
    pub market_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralValuation {
    /// Bank-assessed land plus structure value.
    pub total_value: Money,
    pub land_value: Money,
    pub structure_value: Money,
    /// The same assets priced at open-market rates; always >= `total_value`.
    pub market_value_estimate: Money,
    pub location: LocationMatch,
    pub land: Option<LandValuation>,
    pub structure: Option<StructureValuation>,
    pub details: Vec<String>,
}

/// Value collateral with the published rate tables.
pub fn value_collateral(profile: &ApplicantProfile) -> CollateralValuation {
    value_collateral_with_rates(profile, &CollateralRates::default())
}

/// Value declared land (only when the applicant owns it) and the dwelling.
/// Anything missing or unreadable contributes zero.
pub fn value_collateral_with_rates(
    profile: &ApplicantProfile,
    rates: &CollateralRates,
) -> CollateralValuation {
    let place = text(&profile.district).or_else(|| text(&profile.property_location));
    let location = rates.locate(place.as_deref());
    let mut details = Vec::new();

    let land = value_land(profile, rates, &location);
    if let Some(l) = &land {
        details.push(format!(
            "Land: {} acres of {} land at {} per acre = {}",
            l.acres.round_dp(2),
            l.classification,
            l.rate_per_acre,
            l.assessed_value
        ));
    }

    let structure = value_structure(profile, rates, &location);
    if let Some(s) = &structure {
        details.push(format!(
            "Structure: {} house, base {} x {} location multiplier = {}",
            s.structure_type, s.base_value, s.location_multiplier, s.assessed_value
        ));
    }

    let land_value = land.as_ref().map_or(Decimal::ZERO, |l| l.assessed_value);
    let structure_value = structure.as_ref().map_or(Decimal::ZERO, |s| s.assessed_value);
    let market_value_estimate = land.as_ref().map_or(Decimal::ZERO, |l| l.market_value)
        + structure.as_ref().map_or(Decimal::ZERO, |s| s.market_value);

    debug!(
        %land_value,
        %structure_value,
        %market_value_estimate,
        city = ?location.city,
        "collateral valued"
    );

    CollateralValuation {
        total_value: land_value + structure_value,
        land_value,
        structure_value,
        market_value_estimate,
        location,
        land,
        structure,
        details,
    }
}

fn value_land(
    profile: &ApplicantProfile,
    rates: &CollateralRates,
    location: &LocationMatch,
) -> Option<LandValuation> {
    if !is_affirmative(&profile.owns_land) {
        return None;
    }
    let area = profile.land_area()?;
    let acres = area.acres();
    let classification = LandClass::classify(text(&profile.land_type).as_deref());
    let rate_per_acre = rates.bank_land.per_acre(classification, location.tier);
    let market_rate = rates.market_land.per_acre(classification, location.tier);

    let (Some(assessed), Some(market)) =
        (acres.checked_mul(rate_per_acre), acres.checked_mul(market_rate))
    else {
        warn!(%acres, %rate_per_acre, "land value overflows, land left unvalued");
        return None;
    };

    Some(LandValuation {
        acres,
        classification,
        rate_per_acre,
        assessed_value: whole_units(assessed),
        market_value: whole_units(market),
    })
}

fn value_structure(
    profile: &ApplicantProfile,
    rates: &CollateralRates,
    location: &LocationMatch,
) -> Option<StructureValuation> {
    let house = text(&profile.house_type)?;
    let structure_type = StructureType::classify(&house)?;
    let base_value = rates.bank_structure.get(structure_type);
    let market_base = rates.market_structure.get(structure_type);

    let (Some(assessed), Some(market)) = (
        base_value.checked_mul(location.multiplier),
        market_base.checked_mul(location.multiplier),
    ) else {
        warn!(%base_value, multiplier = %location.multiplier, "structure value overflows, structure left unvalued");
        return None;
    };

    Some(StructureValuation {
        structure_type,
        base_value,
        location_multiplier: location.multiplier,
        assessed_value: whole_units(assessed),
        market_value: whole_units(market),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn landowner(area: &str, land_type: &str, district: &str) -> ApplicantProfile {
        ApplicantProfile {
            owns_land: Some("yes".into()),
            land_area: Some(area.into()),
            land_type: Some(land_type.into()),
            district: Some(district.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_agricultural_land_non_metro() {
        let v = value_collateral(&landowner("2 acres", "agricultural", "Mandya"));
        // 2 acres x 2,00,000
        assert_eq!(v.land_value, dec!(400_000));
        assert_eq!(v.structure_value, Decimal::ZERO);
        assert_eq!(v.total_value, dec!(400_000));
        assert_eq!(v.market_value_estimate, dec!(1_000_000));
    }

    #[test]
    fn test_commercial_land_in_metro_guntas() {
        let v = value_collateral(&landowner("20 guntas", "commercial", "Bengaluru Rural"));
        // 20 guntas = 0.5 acre x 30,00,000
        assert_eq!(v.land_value, dec!(1_500_000));
    }

    #[test]
    fn test_land_ignored_without_ownership() {
        let mut profile = landowner("5 acres", "agricultural", "Mandya");
        profile.owns_land = Some("no".into());
        let v = value_collateral(&profile);
        assert_eq!(v.land_value, Decimal::ZERO);
        assert!(v.land.is_none());
    }

    #[test]
    fn test_semi_pucca_in_mysuru() {
        let profile = ApplicantProfile {
            house_type: Some("Semi-Pucca".into()),
            district: Some("Mysore".into()),
            ..Default::default()
        };
        let v = value_collateral(&profile);
        // 4,00,000 x 1.4
        assert_eq!(v.structure_value, dec!(560_000));
        assert_eq!(v.market_value_estimate, dec!(1_120_000));
    }

    #[test]
    fn test_unknown_house_type_contributes_zero() {
        let profile = ApplicantProfile {
            house_type: Some("tent".into()),
            ..Default::default()
        };
        let v = value_collateral(&profile);
        assert_eq!(v.total_value, Decimal::ZERO);
        assert!(v.details.is_empty());
    }

    #[test]
    fn test_blank_profile_has_no_collateral() {
        let v = value_collateral(&ApplicantProfile::default());
        assert_eq!(v.total_value, Decimal::ZERO);
        assert_eq!(v.market_value_estimate, Decimal::ZERO);
    }

    #[test]
    fn test_absurd_land_area_contributes_zero() {
        let profile = landowner("99999999999999999999999999 acres", "commercial", "Bengaluru");
        let v = value_collateral(&profile);
        assert!(v.land.is_none());
        assert_eq!(v.land_value, Decimal::ZERO);
        assert_eq!(v.total_value, Decimal::ZERO);
        assert!(profile.field_issues().iter().any(|i| i.field == "land_area"));
    }

    #[test]
    fn test_oversized_rate_leaves_land_unvalued() {
        let mut rates = CollateralRates::default();
        rates.bank_land.agricultural.other = Decimal::MAX;
        rates.market_land.agricultural.other = Decimal::MAX;
        let v = value_collateral_with_rates(&landowner("900000 acres", "agricultural", "Mandya"), &rates);
        assert!(v.land.is_none());
        assert_eq!(v.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_property_location_used_when_district_missing() {
        let profile = ApplicantProfile {
            house_type: Some("pucca".into()),
            property_location: Some("Hubli".into()),
            ..Default::default()
        };
        let v = value_collateral(&profile);
        assert_eq!(v.structure_value, dec!(1_040_000));
    }
}
