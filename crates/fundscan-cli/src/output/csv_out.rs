use serde_json::Value;
use std::io;

use super::format_value;

/// Write output as CSV to stdout.
///
/// Portfolio-analysis envelopes emit one row per holding; anything else
/// degrades to two-column field/value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let holdings = value
        .get("result")
        .and_then(|r| r.get("holdings"))
        .and_then(Value::as_array);

    match (holdings, value) {
        (Some(rows), _) => write_rows(&mut wtr, rows),
        (None, Value::Array(rows)) => write_rows(&mut wtr, rows),
        (None, Value::Object(map)) => {
            let flat = map
                .get("result")
                .and_then(Value::as_object)
                .unwrap_or(map);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flat {
                let _ = wtr.write_record([key.as_str(), &format_value(val)]);
            }
        }
        (None, other) => {
            let _ = wtr.write_record([&format_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            let _ = wtr.write_record([&format_value(row)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
