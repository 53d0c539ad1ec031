pub mod budget;
pub mod payoff;
pub mod preview;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::input;

/// Parse a `--debt` flag of the form `name:principal:rate[:min_payment]`
/// (e.g. "Visa:5000:18.99:150").
pub fn parse_debt_flag(flag: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = flag.split(':').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) || parts[0].is_empty() {
        return Err(format!(
            "--debt must be name:principal:rate[:min_payment], got '{}'",
            flag
        )
        .into());
    }

    let number = |label: &str, raw: &str| -> Result<Decimal, Box<dyn std::error::Error>> {
        raw.parse::<Decimal>()
            .map_err(|e| format!("--debt '{}': invalid {} '{}': {}", flag, label, raw, e).into())
    };

    let mut debt = Map::new();
    debt.insert("name".into(), Value::String(parts[0].to_string()));
    debt.insert(
        "principal".into(),
        Value::String(number("principal", parts[1])?.to_string()),
    );
    debt.insert(
        "rate".into(),
        Value::String(number("rate", parts[2])?.to_string()),
    );
    if let Some(min) = parts.get(3) {
        debt.insert(
            "min_payment".into(),
            Value::String(number("min_payment", min)?.to_string()),
        );
    }
    Ok(Value::Object(debt))
}

/// Merge the request document with flag overrides.
///
/// `--debt` flags replace any debts from the document. A missing start date
/// becomes today's local date; this is the only place a clock is read.
pub struct RequestBuilder {
    doc: Map<String, Value>,
}

impl RequestBuilder {
    pub fn load(
        path: Option<&str>,
        debt_flags: &[String],
        what: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_document(input::load(path)?, debt_flags, what)
    }

    pub fn from_document(
        document: Option<Value>,
        debt_flags: &[String],
        what: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = match document {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(format!("{what} input must be a JSON/YAML object").into()),
            None if !debt_flags.is_empty() => Map::new(),
            None => {
                return Err(format!(
                    "--input <file.json|file.yaml>, stdin, or --debt flags required for {what}"
                )
                .into())
            }
        };

        let mut builder = RequestBuilder { doc };
        if !debt_flags.is_empty() {
            let debts = debt_flags
                .iter()
                .map(|s| parse_debt_flag(s))
                .collect::<Result<Vec<_>, _>>()?;
            builder.doc.insert("debts".into(), Value::Array(debts));
        }
        builder.doc.entry("debts").or_insert_with(|| Value::Array(Vec::new()));
        Ok(builder)
    }

    pub fn set_decimal(&mut self, key: &str, value: Option<Decimal>) -> &mut Self {
        if let Some(v) = value {
            self.doc.insert(key.into(), Value::String(v.to_string()));
        }
        self
    }

    /// Insert a flag value in its serde wire form (e.g. `Strategy` as "snowball").
    pub fn set_serialized<T: serde::Serialize>(
        &mut self,
        key: &str,
        value: Option<T>,
    ) -> Result<&mut Self, Box<dyn std::error::Error>> {
        if let Some(v) = value {
            self.doc.insert(key.into(), serde_json::to_value(v)?);
        }
        Ok(self)
    }

    pub fn set_u32(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(v) = value {
            self.doc.insert(key.into(), Value::from(v));
        }
        self
    }

    /// Override a field of the nested engine `config` object.
    pub fn set_config_u32(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(v) = value {
            let config = self
                .doc
                .entry("config")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(map) = config {
                map.insert(key.into(), Value::from(v));
            }
        }
        self
    }

    pub fn start_date(&mut self, value: Option<NaiveDate>) -> &mut Self {
        if let Some(date) = value {
            self.doc.insert("start_date".into(), Value::String(date.to_string()));
        } else if !self.doc.contains_key("start_date") {
            let today = chrono::Local::now().date_naive();
            log::info!("no start date supplied, anchoring projection at {today}");
            self.doc.insert("start_date".into(), Value::String(today.to_string()));
        }
        self
    }

    pub fn build<T: serde::de::DeserializeOwned>(&self) -> Result<T, Box<dyn std::error::Error>> {
        Ok(serde_json::from_value(Value::Object(self.doc.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_flag_uses_wire_names() {
        let flags = vec!["Card:2000:24:60".to_string()];
        let mut builder = RequestBuilder::from_document(None, &flags, "test").unwrap();
        builder
            .set_serialized("strategy", Some(payoff_core::Strategy::Avalanche))
            .unwrap();
        assert_eq!(builder.doc["strategy"], "avalanche");
        builder
            .set_serialized::<payoff_core::Strategy>("strategy", None)
            .unwrap();
        assert_eq!(builder.doc["strategy"], "avalanche");
        builder
            .set_serialized("strategy", Some(payoff_core::Strategy::Snowball))
            .unwrap();
        assert_eq!(builder.doc["strategy"], "snowball");
    }

    #[test]
    fn test_document_required_without_flags() {
        assert!(RequestBuilder::from_document(None, &[], "plan").is_err());
        assert!(RequestBuilder::from_document(Some(Value::Bool(true)), &[], "plan").is_err());
    }

    #[test]
    fn test_parse_debt_flag_full() {
        let v = parse_debt_flag("Visa:5000:18.99:150").unwrap();
        assert_eq!(v["name"], "Visa");
        assert_eq!(v["principal"], "5000");
        assert_eq!(v["rate"], "18.99");
        assert_eq!(v["min_payment"], "150");
    }

    #[test]
    fn test_parse_debt_flag_without_minimum() {
        let v = parse_debt_flag("Medical:1234:0").unwrap();
        assert!(v.get("min_payment").is_none());
    }

    #[test]
    fn test_parse_debt_flag_rejects_bad_shapes() {
        assert!(parse_debt_flag("Visa:5000").is_err());
        assert!(parse_debt_flag(":5000:10").is_err());
        assert!(parse_debt_flag("Visa:lots:10").is_err());
    }

    #[test]
    fn test_builder_overrides_and_start_date() {
        let flags = vec!["Card:2000:24:60".to_string()];
        let mut builder = RequestBuilder::from_document(None, &flags, "test").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        builder
            .set_decimal("extra_payment", Some(Decimal::new(100, 0)))
            .set_serialized("strategy", Some(payoff_core::Strategy::Snowball))
            .unwrap()
            .set_config_u32("month_cap", Some(120))
            .start_date(Some(date));

        let input: payoff_core::payoff::plan::SimulationInput = builder.build().unwrap();
        assert_eq!(input.debts.len(), 1);
        assert_eq!(input.config.month_cap, 120);
        assert_eq!(input.start_date, date);
        assert_eq!(input.strategy, payoff_core::Strategy::Snowball);
    }
}
