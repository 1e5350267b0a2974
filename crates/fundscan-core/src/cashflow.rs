use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{CashFlow, Money, Transaction};

/// Description tokens marking a transaction as money leaving the investor's
/// pocket (lump-sum purchases and SIP instalments). Anything that matches
/// none of these counts as an inflow: redemptions, dividends, switch-outs.
pub const ACQUISITION_TOKENS: &[&str] = &["PURCHASE", "SIP"];

fn is_acquisition(description: &str) -> bool {
    let desc = description.to_uppercase();
    ACQUISITION_TOKENS.iter().any(|t| desc.contains(t))
}

/// Build the dated cash-flow sequence for one holding.
///
/// Transactions with a missing date, or a missing or zero amount, are
/// dropped; the rest keep their supplied order. The final entry is always
/// a notional full liquidation at `as_of`, so the sequence is never empty
/// and the terminal valuation comes last regardless of transaction
/// chronology.
pub fn build_cash_flows(
    transactions: &[Transaction],
    current_value: Money,
    as_of: NaiveDate,
) -> Vec<CashFlow> {
    let mut flows = Vec::with_capacity(transactions.len() + 1);

    for txn in transactions {
        let amount = txn.amount.unwrap_or(Decimal::ZERO);
        if amount.is_zero() {
            continue;
        }
        let Some(date) = txn.date else {
            // An undated flow cannot be discounted.
            continue;
        };
        let signed = match &txn.description {
            Some(desc) if is_acquisition(desc) => -amount,
            _ => amount,
        };
        flows.push(CashFlow {
            date,
            amount: signed,
        });
    }

    flows.push(CashFlow {
        date: as_of,
        amount: current_value,
    });
    flows
}
