use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad asset bucket for a scheme, derived from its free-text name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Debt,
    Gold,
    Equity,
}

impl AssetClass {
    /// Every class, in the stable order used for allocation reporting.
    pub const ALL: [AssetClass; 3] = [AssetClass::Equity, AssetClass::Debt, AssetClass::Gold];
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Debt => write!(f, "Debt"),
            AssetClass::Gold => write!(f, "Gold"),
            AssetClass::Equity => write!(f, "Equity"),
        }
    }
}

/// Keyword-priority rules for asset classification, evaluated top-down;
/// the first rule with a matching token wins. Debt deliberately outranks
/// Gold, so "SBI Gold Liquid Fund" classifies as Debt.
pub const ASSET_CLASS_RULES: &[(AssetClass, &[&str])] = &[
    (AssetClass::Debt, &["LIQUID", "DEBT", "BOND", "OVERNIGHT"]),
    (AssetClass::Gold, &["GOLD"]),
];

/// Classify a scheme name by case-insensitive substring match against the
/// rule table, defaulting to Equity when nothing matches.
pub fn asset_class_of(scheme_name: &str) -> AssetClass {
    let name = scheme_name.to_uppercase();
    for (class, tokens) in ASSET_CLASS_RULES {
        if tokens.iter().any(|t| name.contains(t)) {
            return *class;
        }
    }
    AssetClass::Equity
}

/// Share class of a scheme: Direct carries no distributor commission,
/// Regular embeds it in the expense ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    Direct,
    Regular,
}

impl PlanType {
    pub fn is_commission_bearing(&self) -> bool {
        matches!(self, PlanType::Regular)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanType::Direct => write!(f, "Direct"),
            PlanType::Regular => write!(f, "Regular"),
        }
    }
}

const DIRECT_TOKEN: &str = "DIRECT";

/// Heuristic plan detection over uncontrolled free text: the DIRECT token
/// anywhere in the name means a Direct plan, everything else is Regular.
/// Deliberately simple; non-standard scheme names can misclassify.
pub fn plan_type_of(scheme_name: &str) -> PlanType {
    if scheme_name.to_uppercase().contains(DIRECT_TOKEN) {
        PlanType::Direct
    } else {
        PlanType::Regular
    }
}
