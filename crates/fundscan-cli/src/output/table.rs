use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Column order for the per-holding table, mapped to `AnalysisResult`
/// field names in the envelope.
const HOLDING_COLUMNS: &[(&str, &str)] = &[
    ("scheme", "Scheme"),
    ("asset_class", "Class"),
    ("plan_type", "Plan"),
    ("current_value", "Value"),
    ("invested_cost", "Invested"),
    ("annualized_return_pct", "XIRR %"),
    ("rating", "Rating"),
    ("annual_commission_loss", "Est. Loss/yr"),
];

/// Format output as tables using the tabled crate.
///
/// Portfolio-analysis envelopes get a three-block layout (summary,
/// allocation, holdings); anything else falls back to a generic
/// field/value table.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    if let Some(result) = map.get("result") {
        let summary = result.get("summary");
        let holdings = result.get("holdings").and_then(Value::as_array);

        if let (Some(summary), Some(holdings)) = (summary, holdings) {
            print_summary(summary);
            print_allocation(summary);
            print_holdings(holdings);
        } else {
            print_flat_object(result);
        }
        print_warnings(map);
        print_methodology(map);
        return;
    }

    print_flat_object(value);
}

fn print_summary(summary: &Value) {
    let Some(map) = summary.as_object() else {
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        // Allocation gets its own table below.
        if key == "allocation" {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_allocation(summary: &Value) {
    let Some(slices) = summary.get("allocation").and_then(Value::as_array) else {
        return;
    };
    if slices.is_empty() {
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Asset Class", "Value"]);
    for slice in slices {
        let class = slice.get("asset_class").map(format_value).unwrap_or_default();
        let value = slice.get("value").map(format_value).unwrap_or_default();
        builder.push_record([class, value]);
    }
    println!("\nAllocation:\n{}", Table::from(builder));
}

fn print_holdings(holdings: &[Value]) {
    if holdings.is_empty() {
        println!("\n(no holdings above the dust threshold)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(HOLDING_COLUMNS.iter().map(|(_, header)| *header));
    for holding in holdings {
        let row: Vec<String> = HOLDING_COLUMNS
            .iter()
            .map(|(key, _)| holding.get(*key).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("\nHoldings:\n{}", Table::from(builder));
}

fn print_warnings(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}

fn print_methodology(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}
