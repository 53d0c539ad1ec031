use serde_json::Value;

use super::{format_value, result_of};

/// Headline field per command, in priority order. Dotted paths reach into
/// nested results.
const PRIORITY_PATHS: &[&str] = &[
    "interest_saved",
    "recommended",
    "suggested_extra",
    "payoff_date",
    "baseline_months",
    "blended_monthly_rate",
];

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result, path) {
            if !val.is_null() {
                println!("{}", format_value(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_dotted_path() {
        let v = json!({"accelerated": {"payoff_date": "2026-06-15"}});
        assert_eq!(
            lookup(&v, "accelerated.payoff_date"),
            Some(&json!("2026-06-15"))
        );
        assert_eq!(lookup(&v, "accelerated.missing"), None);
    }
}
