use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_value, result_of};

/// Trajectories run to hundreds of rows; tables show them only on request
/// through CSV or JSON output.
const SKIPPED_SERIES: &[&str] = &["monthly_data"];

/// Format output as tables: one Field/Value table for scalar results, then
/// one table per embedded list (milestones, payoff order, sweep rows).
pub fn print_table(value: &Value) {
    let result = result_of(value);
    match result {
        Value::Object(map) => {
            let mut scalars = Vec::new();
            let mut series = Vec::new();
            flatten(map, "", &mut scalars, &mut series);

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (path, val) in &scalars {
                if SKIPPED_SERIES.iter().any(|s| path.ends_with(s)) {
                    continue;
                }
                builder.push_record([path.as_str(), &format_value(val)]);
            }
            println!("{}", Table::from(builder));

            for (path, rows) in series {
                if SKIPPED_SERIES.iter().any(|s| path.ends_with(s)) {
                    continue;
                }
                println!("\n{}:", path);
                print_array_table(rows);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", format_value(result)),
    }

    print_envelope_notes(value);
}

fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}
