pub mod applicant;
pub mod loan;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rural_credit_core::policy::ScoringPolicy;
use rural_credit_core::profile::ApplicantProfile;

use crate::input;

/// Applicant profile source shared by every per-applicant command.
#[derive(Args)]
pub struct ProfileArgs {
    /// Applicant profile JSON file (stdin is read when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

impl ProfileArgs {
    pub fn load(&self) -> Result<ApplicantProfile, Box<dyn std::error::Error>> {
        let value = self.load_value()?;
        Ok(ApplicantProfile::from_value(value)?)
    }

    fn load_value(&self) -> Result<Value, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            input::file::read_json_value(path)
        } else if let Some(data) = input::stdin::read_stdin()? {
            Ok(data)
        } else {
            Err("--input <profile.json> or stdin required".into())
        }
    }
}

#[derive(Args)]
pub struct PolicyArgs {
    /// Policy document (JSON, or YAML by extension); the published policy when omitted
    #[arg(long)]
    pub policy: Option<String>,

    /// Factor weights in percent: income, repayment, social, assets, financial
    #[arg(long, value_delimiter = ',')]
    pub weights: Option<Vec<Decimal>>,
}

impl PolicyArgs {
    pub fn load(&self) -> Result<ScoringPolicy, Box<dyn std::error::Error>> {
        match self.policy {
            Some(ref path) => input::file::read_policy(path),
            None => Ok(ScoringPolicy::default()),
        }
    }

    pub fn weights_override(&self) -> Option<&[Decimal]> {
        self.weights.as_deref()
    }
}
