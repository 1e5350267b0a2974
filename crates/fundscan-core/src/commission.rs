use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::classify::PlanType;
use crate::types::{Money, Rate};

/// Assumed annual trail-commission differential between the Regular and
/// Direct share classes of an otherwise identical scheme. A flat estimate,
/// not a real expense-ratio lookup.
pub const REGULAR_PLAN_DRAG: Rate = dec!(0.01);

/// Estimated annual commission loss for a holding: a fixed share of
/// current value for Regular plans, zero for Direct plans. Always based
/// on current value, never invested cost.
pub fn annual_commission_loss(plan: PlanType, current_value: Money) -> Money {
    match plan {
        PlanType::Regular => current_value * REGULAR_PLAN_DRAG,
        PlanType::Direct => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_regular_plan_loses_one_percent() {
        assert_eq!(
            annual_commission_loss(PlanType::Regular, dec!(10000)),
            dec!(100)
        );
    }

    #[test]
    fn test_direct_plan_loses_nothing() {
        assert_eq!(
            annual_commission_loss(PlanType::Direct, dec!(10000)),
            Decimal::ZERO
        );
    }
}
