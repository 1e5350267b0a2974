use serde_json::Value;

use super::format_value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority
/// (checking the summary of an analysis envelope first), then fall back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // The analysis envelope nests the headline numbers under "summary".
    let search_obj = result_obj.get("summary").unwrap_or(result_obj);

    let priority_keys = [
        "total_value",
        "rate_pct",
        "asset_class",
        "total_commission_loss",
        "cleanliness",
    ];

    if let Value::Object(map) = search_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(search_obj));
}
