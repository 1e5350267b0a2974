use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::FundscanError;
use crate::types::{CashFlow, Rate};
use crate::FundscanResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_NEWTON_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;

/// Day-count basis: signed day offsets divided by 365, no leap adjustment.
const DAYS_PER_YEAR: Decimal = dec!(365);

const MIN_RATE: Decimal = dec!(-0.99);
const MAX_RATE: Decimal = dec!(100.0);

/// Probe grid for the bisection fallback, ascending. A sign change between
/// two adjacent probes gives the initial bracket.
const BRACKET_PROBES: [Decimal; 13] = [
    dec!(-0.99),
    dec!(-0.9),
    dec!(-0.5),
    dec!(-0.25),
    dec!(0),
    dec!(0.25),
    dec!(0.5),
    dec!(1),
    dec!(2),
    dec!(5),
    dec!(10),
    dec!(25),
    dec!(100),
];

struct NpvEval {
    npv: Decimal,
    dnpv: Decimal,
}

/// NPV and its derivative in `rate`, discounting each flow by
/// (1+rate)^(days/365) from the earliest date. Returns `None` when the
/// rate cannot be discounted at all (1+rate not positive).
fn npv_and_derivative(flows: &[CashFlow], base_date: NaiveDate, rate: Rate) -> Option<NpvEval> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;

    for flow in flows {
        let days = (flow.date - base_date).num_days();
        let years = Decimal::from(days) / DAYS_PER_YEAR;

        // Contributions whose factors leave Decimal range are skipped;
        // they only arise at extreme probe rates where the NPV is
        // astronomically far from zero anyway.
        let Some(discount) = one_plus_r.checked_powd(years) else {
            continue;
        };
        if discount.is_zero() {
            continue;
        }

        let Some(term) = flow.amount.checked_div(discount) else {
            continue;
        };
        npv = npv.saturating_add(term);

        if let Some(dterm) = one_plus_r
            .checked_mul(discount)
            .and_then(|d| years.checked_mul(flow.amount)?.checked_div(d))
        {
            dnpv = dnpv.saturating_sub(dterm);
        }
    }

    Some(NpvEval { npv, dnpv })
}

fn npv_at(flows: &[CashFlow], base_date: NaiveDate, rate: Rate) -> Option<Decimal> {
    npv_and_derivative(flows, base_date, rate).map(|e| e.npv)
}

/// Solve for the annualized rate r > -1 that zeroes the NPV of a dated
/// cash-flow sequence.
///
/// Newton-Raphson with clamped steps does the work; when it stalls (zero
/// derivative, pinned at a bound, iteration cap) a bracketing bisection
/// over a fixed probe grid takes over. Sequences without both an outflow
/// and an inflow, and sequences where no bracket exists (e.g. all dates
/// coincide with a nonzero net amount), fail with an error the caller is
/// expected to recover from.
///
/// Convergence is judged relative to the total cash-flow magnitude, so the
/// solved rate does not depend on the currency scale of the inputs.
pub fn xirr(flows: &[CashFlow], guess: Rate) -> FundscanResult<Rate> {
    if flows.is_empty() {
        return Err(FundscanError::InsufficientData(
            "XIRR requires at least one cash flow".into(),
        ));
    }
    let has_outflow = flows.iter().any(|f| f.amount < Decimal::ZERO);
    let has_inflow = flows.iter().any(|f| f.amount > Decimal::ZERO);
    if !has_outflow || !has_inflow {
        return Err(FundscanError::InsufficientData(
            "XIRR requires at least one outflow and one inflow".into(),
        ));
    }
    if guess <= dec!(-1) {
        return Err(FundscanError::InvalidInput {
            field: "guess".into(),
            reason: "Initial guess must be greater than -100%".into(),
        });
    }

    // Signed amounts that cancel exactly have r = 0 as an exact root;
    // answering directly keeps degenerate sequences off the iterative
    // paths.
    let net: Decimal = flows.iter().map(|f| f.amount).sum();
    if net.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let base_date = flows
        .iter()
        .map(|f| f.date)
        .min()
        .unwrap_or(flows[0].date);
    let scale: Decimal = flows.iter().map(|f| f.amount.abs()).sum();
    let npv_tol = CONVERGENCE_THRESHOLD * scale;

    let mut rate = guess;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let Some(eval) = npv_and_derivative(flows, base_date, rate) else {
            break;
        };
        if eval.npv.abs() < npv_tol {
            return Ok(rate);
        }
        if eval.dnpv.is_zero() {
            break;
        }

        let next = match eval
            .npv
            .checked_div(eval.dnpv)
            .and_then(|step| rate.checked_sub(step))
        {
            Some(r) => r.clamp(MIN_RATE, MAX_RATE),
            None => break,
        };
        if next == rate {
            // Pinned at a bound; Newton cannot make progress.
            break;
        }
        rate = next;
    }

    bisect(flows, base_date, npv_tol)
}

fn bisect(flows: &[CashFlow], base_date: NaiveDate, npv_tol: Decimal) -> FundscanResult<Rate> {
    let mut bracket: Option<(Decimal, Decimal, Decimal)> = None;
    let mut prev: Option<(Decimal, Decimal)> = None;

    for probe in BRACKET_PROBES {
        let Some(f) = npv_at(flows, base_date, probe) else {
            continue;
        };
        if f.abs() < npv_tol {
            return Ok(probe);
        }
        if let Some((prev_rate, prev_f)) = prev {
            if (prev_f < Decimal::ZERO) != (f < Decimal::ZERO) {
                bracket = Some((prev_rate, prev_f, probe));
                break;
            }
        }
        prev = Some((probe, f));
    }

    let Some((mut lo, mut f_lo, mut hi)) = bracket else {
        return Err(FundscanError::ConvergenceFailure {
            function: "XIRR".into(),
            iterations: MAX_NEWTON_ITERATIONS,
            last_delta: prev.map(|(_, f)| f).unwrap_or(Decimal::ZERO),
        });
    };

    for i in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let Some(f_mid) = npv_at(flows, base_date, mid) else {
            return Err(FundscanError::ConvergenceFailure {
                function: "XIRR".into(),
                iterations: MAX_NEWTON_ITERATIONS + i,
                last_delta: hi - lo,
            });
        };
        if f_mid.abs() < npv_tol || (hi - lo) < CONVERGENCE_THRESHOLD {
            return Ok(mid);
        }
        if (f_mid < Decimal::ZERO) == (f_lo < Decimal::ZERO) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(FundscanError::ConvergenceFailure {
        function: "XIRR".into(),
        iterations: MAX_NEWTON_ITERATIONS + MAX_BISECTION_ITERATIONS,
        last_delta: hi - lo,
    })
}
