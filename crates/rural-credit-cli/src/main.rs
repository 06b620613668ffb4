mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::applicant::{CollateralArgs, CompletenessArgs, EvaluateArgs, ScoreArgs};
use commands::loan::{AmortizeArgs, EligibilityArgs, RequestArgs};

/// Rural credit scoring and loan eligibility
#[derive(Parser)]
#[command(
    name = "rce",
    version,
    about = "Rural credit scoring and loan eligibility",
    long_about = "Scores rural loan applicants from a JSON profile with decimal precision. \
                  Reports profile completeness, a 300-900 credit score, collateral value, \
                  the maximum safe loan amount and its repayment schedule."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "rural_credit_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check how much of the applicant profile is filled in
    Completeness(CompletenessArgs),
    /// Score an applicant (300-900) with risk category and recommendation
    Score(ScoreArgs),
    /// Bank valuation of declared land and housing
    Collateral(CollateralArgs),
    /// Maximum safe loan amount from income and collateral
    Eligibility(EligibilityArgs),
    /// Fixed-installment repayment schedule
    Amortize(AmortizeArgs),
    /// Run the full applicant evaluation
    Evaluate(EvaluateArgs),
    /// Compare a requested loan amount with eligibility
    Request(RequestArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(2);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Completeness(args) => commands::applicant::run_completeness(args),
        Commands::Score(args) => commands::applicant::run_score(args),
        Commands::Collateral(args) => commands::applicant::run_collateral(args),
        Commands::Eligibility(args) => commands::loan::run_eligibility(args),
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Evaluate(args) => commands::applicant::run_evaluate(args),
        Commands::Request(args) => commands::loan::run_request(args),
        Commands::Version => {
            println!("rce {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
