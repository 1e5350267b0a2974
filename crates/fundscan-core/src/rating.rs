use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Percent;

/// Qualitative health tier for a holding's annualized return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "N/A")]
    NotAvailable,
    #[serde(rename = "IN-FORM")]
    InForm,
    #[serde(rename = "ON-TRACK")]
    OnTrack,
    #[serde(rename = "OFF-TRACK")]
    OffTrack,
    #[serde(rename = "OUT-OF-FORM")]
    OutOfForm,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::NotAvailable => write!(f, "N/A"),
            Rating::InForm => write!(f, "IN-FORM"),
            Rating::OnTrack => write!(f, "ON-TRACK"),
            Rating::OffTrack => write!(f, "OFF-TRACK"),
            Rating::OutOfForm => write!(f, "OUT-OF-FORM"),
        }
    }
}

const IN_FORM_FLOOR: Decimal = dec!(20.0);
const ON_TRACK_FLOOR: Decimal = dec!(12.0);

/// Map an annualized return percentage to its tier.
///
/// Exactly 0.0 is OUT-OF-FORM: OFF-TRACK requires a strictly positive
/// return. `None` means the return could not be computed at all.
pub fn rating_for(return_pct: Option<Percent>) -> Rating {
    match return_pct {
        None => Rating::NotAvailable,
        Some(r) if r >= IN_FORM_FLOOR => Rating::InForm,
        Some(r) if r >= ON_TRACK_FLOOR => Rating::OnTrack,
        Some(r) if r > Decimal::ZERO => Rating::OffTrack,
        Some(_) => Rating::OutOfForm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_boundaries_are_exact() {
        assert_eq!(rating_for(Some(dec!(20.0))), Rating::InForm);
        assert_eq!(rating_for(Some(dec!(19.999))), Rating::OnTrack);
        assert_eq!(rating_for(Some(dec!(12.0))), Rating::OnTrack);
        assert_eq!(rating_for(Some(dec!(11.999))), Rating::OffTrack);
        assert_eq!(rating_for(Some(dec!(0.0001))), Rating::OffTrack);
        assert_eq!(rating_for(Some(dec!(0.0))), Rating::OutOfForm);
        assert_eq!(rating_for(Some(dec!(-5.0))), Rating::OutOfForm);
    }

    #[test]
    fn test_unavailable_return() {
        assert_eq!(rating_for(None), Rating::NotAvailable);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Rating::InForm.to_string(), "IN-FORM");
        assert_eq!(Rating::OutOfForm.to_string(), "OUT-OF-FORM");
        assert_eq!(Rating::NotAvailable.to_string(), "N/A");
    }
}
