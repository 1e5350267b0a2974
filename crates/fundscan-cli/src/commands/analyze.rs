use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::Value;

use fundscan_core::analyze::{analyze_portfolio, PortfolioInput};
use fundscan_core::types::CasSnapshot;

use crate::input;

/// Arguments for portfolio analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a normalized CAS snapshot JSON file (folios -> schemes ->
    /// transactions, as produced by the statement parser)
    #[arg(long)]
    pub input: Option<String>,

    /// Valuation date for terminal cash flows (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: CasSnapshot = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(piped) = input::read_stdin()? {
        serde_json::from_value(piped)?
    } else {
        return Err("Provide --input FILE or pipe snapshot JSON via stdin".into());
    };

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let output = analyze_portfolio(&PortfolioInput { snapshot, as_of })?;
    Ok(serde_json::to_value(&output)?)
}
