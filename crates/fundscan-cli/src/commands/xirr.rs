use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fundscan_core::solver;
use fundscan_core::types::CashFlow;

use crate::input;

/// Arguments for standalone XIRR solving
#[derive(Args)]
pub struct XirrArgs {
    /// Path to a JSON file with [{"date": "YYYY-MM-DD", "amount": "-1000"}, ...]
    #[arg(long)]
    pub input: Option<String>,

    /// Inline flows as DATE:AMOUNT pairs
    /// (e.g. "2024-01-01:-1000,2025-01-01:1100")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub flow: Option<Vec<String>>,

    /// Initial guess for the solver
    #[arg(long, default_value = "0.1")]
    pub guess: Decimal,
}

pub fn run_xirr(args: XirrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flows = get_flows(&args)?;
    let rate = solver::xirr(&flows, args.guess)?;

    Ok(serde_json::json!({
        "rate": rate.to_string(),
        "rate_pct": (rate * Decimal::from(100)).to_string(),
        "flows": flows.len(),
    }))
}

fn get_flows(args: &XirrArgs) -> Result<Vec<CashFlow>, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let flows: Vec<CashFlow> = input::read_json(path)?;
        Ok(flows)
    } else if let Some(ref pairs) = args.flow {
        pairs.iter().map(|p| parse_flow(p)).collect()
    } else if let Some(piped) = input::read_stdin()? {
        let flows: Vec<CashFlow> = serde_json::from_value(piped)?;
        Ok(flows)
    } else {
        Err("Provide --flow pairs, --input FILE, or pipe flow JSON via stdin".into())
    }
}

fn parse_flow(pair: &str) -> Result<CashFlow, Box<dyn std::error::Error>> {
    // DATE:AMOUNT, where AMOUNT may be negative. The date itself contains
    // no colons, so the first one is the separator.
    let (date_str, amount_str) = pair
        .split_once(':')
        .ok_or_else(|| format!("Expected DATE:AMOUNT, got '{}'", pair))?;

    let date: NaiveDate = date_str
        .parse()
        .map_err(|e| format!("Invalid date '{}': {}", date_str, e))?;
    let amount: Decimal = amount_str
        .parse()
        .map_err(|e| format!("Invalid amount '{}': {}", amount_str, e))?;

    Ok(CashFlow { date, amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flow_pair() {
        let flow = parse_flow("2024-01-01:-1000").unwrap();
        assert_eq!(flow.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(flow.amount, Decimal::from(-1000));
    }

    #[test]
    fn test_parse_flow_rejects_malformed_pairs() {
        assert!(parse_flow("2024-01-01").is_err());
        assert!(parse_flow("not-a-date:100").is_err());
        assert!(parse_flow("2024-01-01:abc").is_err());
    }
}
