pub mod file;
pub mod stdin;

use serde_json::Value;

/// Load the request document from `--input` or piped stdin.
pub fn load(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_value(path)?));
    }
    stdin::read_stdin()
}
