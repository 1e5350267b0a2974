use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cashflow::build_cash_flows;
use crate::classify::{asset_class_of, plan_type_of, AssetClass, PlanType};
use crate::commission::{annual_commission_loss, REGULAR_PLAN_DRAG};
use crate::rating::{rating_for, Rating};
use crate::solver;
use crate::types::{with_metadata, CasSnapshot, ComputationOutput, Money, Percent, Rate};
use crate::FundscanResult;

/// Holdings below this current value are dust: excluded from the result
/// list and from every summary total.
pub const DUST_THRESHOLD: Decimal = dec!(100);

/// Initial guess handed to the solver for every holding.
const DEFAULT_GUESS: Rate = dec!(0.1);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One full analysis invocation: a holdings snapshot plus the explicit
/// valuation date used for every terminal cash flow. Building a fresh
/// input is the reset operation; the core keeps no state across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub snapshot: CasSnapshot,
    pub as_of: NaiveDate,
}

/// Per-holding analysis row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scheme: String,
    pub asset_class: AssetClass,
    pub plan_type: PlanType,
    pub current_value: Money,
    pub invested_cost: Money,
    pub annualized_return_pct: Percent,
    pub rating: Rating,
    pub annual_commission_loss: Money,
}

/// Valuation total for one asset class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub asset_class: AssetClass,
    pub value: Money,
}

/// Two-valued cleanliness signal: clean exactly when total commission
/// loss is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cleanliness {
    Clean,
    NeedsFix,
}

impl std::fmt::Display for Cleanliness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cleanliness::Clean => write!(f, "Clean"),
            Cleanliness::NeedsFix => write!(f, "Needs Fix"),
        }
    }
}

/// Portfolio-level reduction of the per-holding rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: Money,
    pub total_invested: Money,
    pub total_gain: Money,
    /// Gain over invested cost, in percent; an explicit zero when invested
    /// cost is zero.
    pub gain_pct: Percent,
    pub total_commission_loss: Money,
    pub allocation: Vec<AllocationSlice>,
    pub regular_count: usize,
    pub direct_count: usize,
    pub holdings_analyzed: usize,
    pub cleanliness: Cleanliness,
}

/// Full output: summary plus per-holding rows in input order after dust
/// filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub summary: PortfolioSummary,
    pub holdings: Vec<AnalysisResult>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Analyze one holdings snapshot: dust-filter, run the per-holding
/// pipeline (cash flows → XIRR → classification → commission → rating),
/// and reduce into a portfolio summary.
///
/// Per-holding failures never abort the batch: a holding whose cash flow
/// the solver rejects gets a substituted 0% return and a warning in the
/// envelope, which is how "could not compute" stays distinguishable from
/// a genuine zero return.
pub fn analyze_portfolio(
    input: &PortfolioInput,
) -> FundscanResult<ComputationOutput<PortfolioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut holdings: Vec<AnalysisResult> = Vec::new();

    for folio in &input.snapshot.folios {
        for scheme in &folio.schemes {
            let current_value = scheme.current_value();
            if current_value < DUST_THRESHOLD {
                continue;
            }

            let flows = build_cash_flows(&scheme.transactions, current_value, input.as_of);
            let return_pct = match solver::xirr(&flows, DEFAULT_GUESS) {
                Ok(rate) => rate * dec!(100),
                Err(e) => {
                    warnings.push(format!(
                        "{}: annualized return could not be computed ({e}); reporting 0",
                        scheme.scheme
                    ));
                    Decimal::ZERO
                }
            };

            let plan_type = plan_type_of(&scheme.scheme);
            holdings.push(AnalysisResult {
                scheme: scheme.scheme.clone(),
                asset_class: asset_class_of(&scheme.scheme),
                plan_type,
                current_value,
                invested_cost: scheme.invested_cost(),
                annualized_return_pct: return_pct,
                rating: rating_for(Some(return_pct)),
                annual_commission_loss: annual_commission_loss(plan_type, current_value),
            });
        }
    }

    let summary = summarize(&holdings);
    let result = PortfolioAnalysis { summary, holdings };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash-flow XIRR (Newton-Raphson with bisection fallback), keyword asset/plan classification, flat trail-commission estimate",
        &serde_json::json!({
            "as_of": input.as_of,
            "dust_threshold": DUST_THRESHOLD.to_string(),
            "commission_drag": REGULAR_PLAN_DRAG.to_string(),
            "day_count_basis": "act/365",
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn summarize(holdings: &[AnalysisResult]) -> PortfolioSummary {
    let total_value: Money = holdings.iter().map(|h| h.current_value).sum();
    let total_invested: Money = holdings.iter().map(|h| h.invested_cost).sum();
    let total_commission_loss: Money = holdings.iter().map(|h| h.annual_commission_loss).sum();
    let total_gain = total_value - total_invested;

    let gain_pct = if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        total_gain / total_invested * dec!(100)
    };

    let allocation = AssetClass::ALL
        .iter()
        .filter_map(|class| {
            let value: Money = holdings
                .iter()
                .filter(|h| h.asset_class == *class)
                .map(|h| h.current_value)
                .sum();
            (!value.is_zero()).then_some(AllocationSlice {
                asset_class: *class,
                value,
            })
        })
        .collect();

    let regular_count = holdings
        .iter()
        .filter(|h| h.plan_type.is_commission_bearing())
        .count();
    let direct_count = holdings.len() - regular_count;

    let cleanliness = if total_commission_loss.is_zero() {
        Cleanliness::Clean
    } else {
        Cleanliness::NeedsFix
    };

    PortfolioSummary {
        total_value,
        total_invested,
        total_gain,
        gain_pct,
        total_commission_loss,
        allocation,
        regular_count,
        direct_count,
        holdings_analyzed: holdings.len(),
        cleanliness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Folio, SchemeHolding, Transaction, Valuation};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn purchase(date: NaiveDate, amount: Decimal) -> Transaction {
        Transaction {
            date: Some(date),
            amount: Some(amount),
            description: Some("Purchase".to_string()),
        }
    }

    fn holding(
        name: &str,
        value: Decimal,
        cost: Decimal,
        transactions: Vec<Transaction>,
    ) -> SchemeHolding {
        SchemeHolding {
            scheme: name.to_string(),
            valuation: Some(Valuation {
                value: Some(value),
                cost: Some(cost),
            }),
            transactions,
        }
    }

    fn input_of(schemes: Vec<SchemeHolding>, as_of: NaiveDate) -> PortfolioInput {
        PortfolioInput {
            snapshot: CasSnapshot {
                folios: vec![Folio {
                    folio: Some("XYZ/123".to_string()),
                    schemes,
                }],
            },
            as_of,
        }
    }

    // Purchases dated 2024-06-30 are exactly 365 days before this.
    fn valuation_date() -> NaiveDate {
        d(2025, 6, 30)
    }

    #[test]
    fn test_one_holding_ten_percent_on_track() {
        let as_of = valuation_date();
        let input = input_of(
            vec![holding(
                "HDFC Flexi Cap Fund",
                dec!(1100),
                dec!(1000),
                vec![purchase(d(2024, 6, 30), dec!(1000))],
            )],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let row = &output.result.holdings[0];
        assert!(
            (row.annualized_return_pct - dec!(10.0)).abs() < dec!(0.01),
            "return = {}",
            row.annualized_return_pct
        );
        assert_eq!(row.rating, Rating::OffTrack);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_dust_holdings_are_excluded_everywhere() {
        let as_of = valuation_date();
        let input = input_of(
            vec![
                holding("Dust Fund", dec!(50), dec!(40), vec![]),
                holding(
                    "HDFC Equity Fund",
                    dec!(1100),
                    dec!(1000),
                    vec![purchase(d(2024, 6, 30), dec!(1000))],
                ),
            ],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let analysis = &output.result;
        assert_eq!(analysis.holdings.len(), 1);
        assert_eq!(analysis.holdings[0].scheme, "HDFC Equity Fund");
        assert_eq!(analysis.summary.total_value, dec!(1100));
        assert_eq!(analysis.summary.total_invested, dec!(1000));
        assert_eq!(analysis.summary.holdings_analyzed, 1);
    }

    #[test]
    fn test_terminal_only_flow_degrades_to_zero_out_of_form() {
        let as_of = valuation_date();
        let input = input_of(
            vec![holding("Orphan Fund", dec!(1000), dec!(900), vec![])],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let row = &output.result.holdings[0];
        assert_eq!(row.annualized_return_pct, Decimal::ZERO);
        assert_eq!(row.rating, Rating::OutOfForm);
        // The substitution is recorded, distinguishing it from a real 0%.
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("Orphan Fund"));
    }

    #[test]
    fn test_degenerate_holding_does_not_abort_the_batch() {
        let as_of = valuation_date();
        let input = input_of(
            vec![
                holding("Orphan Fund", dec!(1000), dec!(900), vec![]),
                holding(
                    "HDFC Equity Fund",
                    dec!(1100),
                    dec!(1000),
                    vec![purchase(d(2024, 6, 30), dec!(1000))],
                ),
            ],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        assert_eq!(output.result.holdings.len(), 2);
        assert!(output.result.holdings[1].annualized_return_pct > dec!(9));
    }

    #[test]
    fn test_two_holding_aggregate_scenario() {
        let as_of = valuation_date();
        // A: Regular equity, 4000 -> 5000 in one year = 25%.
        // B: Direct equity, 4629.63 -> 5000 in one year ≈ 8%.
        let input = input_of(
            vec![
                holding(
                    "HDFC Top 100 Fund - Growth",
                    dec!(5000),
                    dec!(4000),
                    vec![purchase(d(2024, 6, 30), dec!(4000))],
                ),
                holding(
                    "Axis Bluechip Fund - Direct Plan",
                    dec!(5000),
                    dec!(4629.63),
                    vec![purchase(d(2024, 6, 30), dec!(4629.63))],
                ),
            ],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let analysis = &output.result;

        let a = &analysis.holdings[0];
        assert!((a.annualized_return_pct - dec!(25.0)).abs() < dec!(0.01));
        assert_eq!(a.rating, Rating::InForm);
        assert_eq!(a.plan_type, PlanType::Regular);
        assert_eq!(a.annual_commission_loss, dec!(50));

        let b = &analysis.holdings[1];
        assert!((b.annualized_return_pct - dec!(8.0)).abs() < dec!(0.01));
        assert_eq!(b.rating, Rating::OffTrack);
        assert_eq!(b.plan_type, PlanType::Direct);
        assert_eq!(b.annual_commission_loss, Decimal::ZERO);

        let summary = &analysis.summary;
        assert_eq!(summary.total_value, dec!(10000));
        assert_eq!(summary.total_commission_loss, dec!(50));
        assert_eq!(summary.regular_count, 1);
        assert_eq!(summary.direct_count, 1);
        assert_eq!(summary.cleanliness, Cleanliness::NeedsFix);

        let allocated: Decimal = summary.allocation.iter().map(|s| s.value).sum();
        assert_eq!(allocated, dec!(10000));
    }

    #[test]
    fn test_all_direct_portfolio_is_clean() {
        let as_of = valuation_date();
        let input = input_of(
            vec![holding(
                "Axis Bluechip Fund - Direct Plan",
                dec!(5000),
                dec!(4000),
                vec![purchase(d(2024, 6, 30), dec!(4000))],
            )],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let summary = &output.result.summary;
        assert_eq!(summary.total_commission_loss, Decimal::ZERO);
        assert_eq!(summary.cleanliness, Cleanliness::Clean);
    }

    #[test]
    fn test_zero_invested_cost_reports_zero_gain_pct() {
        let as_of = valuation_date();
        let input = input_of(
            vec![SchemeHolding {
                scheme: "Mystery Fund".to_string(),
                valuation: Some(Valuation {
                    value: Some(dec!(1000)),
                    cost: None,
                }),
                transactions: vec![],
            }],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let summary = &output.result.summary;
        assert_eq!(summary.total_invested, Decimal::ZERO);
        assert_eq!(summary.gain_pct, Decimal::ZERO);
        assert_eq!(summary.total_gain, dec!(1000));
    }

    #[test]
    fn test_allocation_groups_by_asset_class() {
        let as_of = valuation_date();
        let input = input_of(
            vec![
                holding("HDFC Equity Fund", dec!(6000), dec!(6000), vec![]),
                holding("ABC Liquid Fund", dec!(3000), dec!(3000), vec![]),
                holding("XYZ Gold Fund", dec!(1000), dec!(1000), vec![]),
            ],
            as_of,
        );

        let output = analyze_portfolio(&input).unwrap();
        let allocation = &output.result.summary.allocation;
        assert_eq!(allocation.len(), 3);
        assert_eq!(allocation[0].asset_class, AssetClass::Equity);
        assert_eq!(allocation[0].value, dec!(6000));
        assert_eq!(allocation[1].asset_class, AssetClass::Debt);
        assert_eq!(allocation[1].value, dec!(3000));
        assert_eq!(allocation[2].asset_class, AssetClass::Gold);
        assert_eq!(allocation[2].value, dec!(1000));
    }

    #[test]
    fn test_holdings_keep_input_order_across_folios() {
        let as_of = valuation_date();
        let input = PortfolioInput {
            snapshot: CasSnapshot {
                folios: vec![
                    Folio {
                        folio: None,
                        schemes: vec![holding("Fund B", dec!(200), dec!(200), vec![])],
                    },
                    Folio {
                        folio: None,
                        schemes: vec![holding("Fund A", dec!(300), dec!(300), vec![])],
                    },
                ],
            },
            as_of,
        };

        let output = analyze_portfolio(&input).unwrap();
        let names: Vec<&str> = output
            .result
            .holdings
            .iter()
            .map(|h| h.scheme.as_str())
            .collect();
        assert_eq!(names, vec!["Fund B", "Fund A"]);
    }

    #[test]
    fn test_repeated_invocations_are_deterministic() {
        let as_of = valuation_date();
        let input = input_of(
            vec![holding(
                "HDFC Equity Fund",
                dec!(1100),
                dec!(1000),
                vec![purchase(d(2024, 6, 30), dec!(1000))],
            )],
            as_of,
        );

        let first = analyze_portfolio(&input).unwrap();
        let second = analyze_portfolio(&input).unwrap();
        assert_eq!(
            first.result.holdings[0].annualized_return_pct,
            second.result.holdings[0].annualized_return_pct
        );
        assert_eq!(
            serde_json::to_value(&first.result).unwrap(),
            serde_json::to_value(&second.result).unwrap()
        );
    }
}
