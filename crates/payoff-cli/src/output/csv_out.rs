use serde_json::Value;
use std::io;

use super::{flatten, format_value, result_of};

/// Lists worth exporting on their own, most useful first.
const PRIMARY_SERIES: &[&str] = &["rows", "points", "monthly_data", "accelerated.monthly_data"];

/// Write output as CSV to stdout.
///
/// Results that carry a time series (sweep rows, preview points, a
/// trajectory) export that series; anything else becomes field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => {
            let mut scalars = Vec::new();
            let mut series = Vec::new();
            flatten(map, "", &mut scalars, &mut series);

            let primary = PRIMARY_SERIES
                .iter()
                .find_map(|want| series.iter().find(|(path, _)| path.as_str() == *want));
            match primary {
                Some((_, rows)) => write_array_csv(&mut wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (path, val) in scalars {
                        let _ = wtr.write_record([path.as_str(), &format_value(val)]);
                    }
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([&format_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
