use clap::Args;
use serde_json::Value;

use fundscan_core::classify::{asset_class_of, plan_type_of};
use fundscan_core::commission::REGULAR_PLAN_DRAG;

/// Arguments for scheme-name classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Scheme name as printed on the statement
    pub name: String,
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let asset_class = asset_class_of(&args.name);
    let plan_type = plan_type_of(&args.name);

    Ok(serde_json::json!({
        "scheme": args.name,
        "asset_class": asset_class.to_string(),
        "plan_type": plan_type.to_string(),
        "commission_bearing": plan_type.is_commission_bearing(),
        "assumed_annual_drag": if plan_type.is_commission_bearing() {
            REGULAR_PLAN_DRAG.to_string()
        } else {
            "0".to_string()
        },
    }))
}
