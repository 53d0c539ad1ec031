use serde_json::Value;
use std::io::{self, Read};

/// Read a piped request (JSON, or YAML as a fallback) from stdin.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?;
            Ok(Some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_document() {
        let v = parse_document(r#"{"extra_payment": 100}"#).unwrap().unwrap();
        assert_eq!(v["extra_payment"], 100);
    }

    #[test]
    fn test_parse_yaml_document() {
        let v = parse_document("extra_payment: 100\nstrategy: snowball\n")
            .unwrap()
            .unwrap();
        assert_eq!(v["strategy"], "snowball");
    }

    #[test]
    fn test_blank_document_is_none() {
        assert!(parse_document("  \n").unwrap().is_none());
    }
}
