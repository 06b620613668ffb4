pub mod amortization;
pub mod collateral;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod policy;
pub mod profile;
pub mod scoring;
pub mod types;

pub use error::CreditEngineError;
pub use types::*;

pub use amortization::{amortize, AmortizationSchedule};
pub use collateral::{value_collateral, CollateralValuation};
pub use eligibility::{assess_loan_request, compute_eligibility, LoanEligibility};
pub use engine::{evaluate, ApplicantEvaluation};
pub use policy::{FactorWeights, ScoringPolicy};
pub use profile::completeness::{check_completeness, CompletenessReport};
pub use profile::ApplicantProfile;
pub use scoring::{score, CreditAssessment};

/// Standard result type for all engine operations
pub type CreditEngineResult<T> = Result<T, CreditEngineError>;
