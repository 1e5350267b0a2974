use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentages (10.0 = 10%), used where the upstream contract reports
/// annualized returns in percent rather than as a decimal rate.
pub type Percent = Decimal;

/// A single dated transaction as reported by the statement parser.
///
/// Every field is optional: the upstream contract tolerates partial rows,
/// and unusable ones are dropped during cash-flow construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub description: Option<String>,
}

/// Current valuation of a scheme. Missing fields are treated as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Valuation {
    pub value: Option<Money>,
    pub cost: Option<Money>,
}

/// One mutual-fund scheme held within a folio.
///
/// Transactions keep the order the parser supplied them in; upstream order
/// is not guaranteed chronological and is never re-sorted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeHolding {
    pub scheme: String,
    #[serde(default)]
    pub valuation: Option<Valuation>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl SchemeHolding {
    pub fn current_value(&self) -> Money {
        self.valuation
            .as_ref()
            .and_then(|v| v.value)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn invested_cost(&self) -> Money {
        self.valuation
            .as_ref()
            .and_then(|v| v.cost)
            .unwrap_or(Decimal::ZERO)
    }
}

/// An account-level grouping within a consolidated account statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folio: Option<String>,
    pub schemes: Vec<SchemeHolding>,
}

/// The normalized holdings tree handed over by the external statement
/// parser. This is the only shape the analysis core consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasSnapshot {
    pub folios: Vec<Folio>,
}

/// A single cash flow at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
