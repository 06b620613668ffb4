//! Conservative bank valuation of declared land and housing.
//!
//! Usable on its own (asset summaries) as well as inside the eligibility
//! stage.

pub mod rates;
pub mod valuation;

pub use rates::{CollateralRates, LandClass, LocationMatch, LocationTier, StructureType};
pub use valuation::{
    value_collateral, value_collateral_with_rates, CollateralValuation, LandValuation,
    StructureValuation,
};
