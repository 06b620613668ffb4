use rural_credit_core::collateral::{
    value_collateral, value_collateral_with_rates, CollateralRates, LandClass, LocationTier,
    StructureType,
};
use rural_credit_core::profile::ApplicantProfile;
use rural_credit_core::CreditEngineError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn property(
    area: Option<&str>,
    land_type: Option<&str>,
    house: Option<&str>,
    district: Option<&str>,
) -> ApplicantProfile {
    ApplicantProfile {
        owns_land: area.map(|_| "yes".to_string()),
        land_area: area.map(str::to_string),
        land_type: land_type.map(str::to_string),
        house_type: house.map(str::to_string),
        district: district.map(str::to_string),
        ..Default::default()
    }
}

#[test]
fn test_smallholder_land_and_house() {
    let v = value_collateral(&property(
        Some("2 acres"),
        Some("agricultural"),
        Some("semi-pucca"),
        Some("Mandya"),
    ));
    assert_eq!(v.land_value, dec!(400_000));
    assert_eq!(v.structure_value, dec!(400_000));
    assert_eq!(v.total_value, dec!(800_000));
    assert_eq!(v.location.tier, LocationTier::Other);
    assert_eq!(v.details.len(), 2);
}

#[test]
fn test_metro_residential_plot_in_cents() {
    let v = value_collateral(&property(
        Some("50 cents"),
        Some("Residential"),
        Some("Concrete"),
        Some("Bangalore Urban"),
    ));
    let land = v.land.as_ref().unwrap();
    assert_eq!(land.acres, dec!(0.50));
    assert_eq!(land.classification, LandClass::Residential);
    // 0.5 x 20,00,000
    assert_eq!(v.land_value, dec!(1_000_000));
    // 10,00,000 x 1.8
    assert_eq!(v.structure_value, dec!(1_800_000));
    assert_eq!(v.location.city.as_deref(), Some("Bengaluru"));
}

#[test]
fn test_property_location_used_when_district_missing() {
    let profile = ApplicantProfile {
        house_type: Some("Kachcha".into()),
        property_location: Some("Near Hubli bus stand".into()),
        ..Default::default()
    };
    let v = value_collateral(&profile);
    // 1,50,000 x 1.3
    assert_eq!(v.structure_value, dec!(195_000));
    assert_eq!(
        v.structure.as_ref().unwrap().structure_type,
        StructureType::Kachcha
    );
}

#[test]
fn test_missing_inputs_contribute_zero() {
    let v = value_collateral(&ApplicantProfile::default());
    assert_eq!(v.total_value, Decimal::ZERO);
    assert_eq!(v.market_value_estimate, Decimal::ZERO);
    assert!(v.details.is_empty());
}

#[test]
fn test_unreadable_area_contributes_zero() {
    let v = value_collateral(&property(Some("some land"), Some("agricultural"), None, None));
    assert_eq!(v.land_value, Decimal::ZERO);
}

#[test]
fn test_assessed_always_below_market() {
    let cases = [
        ("1 acre", "commercial", "pucca", "Mysuru"),
        ("10 guntas", "residential", "kachcha", "Raichur"),
        ("3.5 acres", "dry land", "concrete", "Bengaluru"),
    ];
    for (area, kind, house, district) in cases {
        let v = value_collateral(&property(Some(area), Some(kind), Some(house), Some(district)));
        assert!(v.total_value > Decimal::ZERO);
        assert!(
            v.total_value < v.market_value_estimate,
            "{area} {kind} in {district}: {} !< {}",
            v.total_value,
            v.market_value_estimate
        );
    }
}

#[test]
fn test_custom_rates_rejected_when_bank_exceeds_market() {
    let mut rates = CollateralRates::default();
    rates.bank_land.agricultural.other = dec!(600_000);
    match rates.validate().unwrap_err() {
        CreditEngineError::InvalidInput { field, .. } => {
            assert!(field.starts_with("bank_land"))
        }
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_custom_rates_applied() {
    let mut rates = CollateralRates::default();
    rates.bank_land.agricultural.other = dec!(250_000);
    let v = value_collateral_with_rates(
        &property(Some("2 acres"), Some("agricultural"), None, Some("Tumakuru")),
        &rates,
    );
    assert_eq!(v.land_value, dec!(500_000));
}
