//! File and stream handling for CLI commands

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::args::InputFormat;
use super::errors::{CliError, CliResult};

/// Resolve `auto` from the file extension.
pub fn resolve_format(format: InputFormat, path: &Path) -> InputFormat {
    match format {
        InputFormat::Auto => {
            let is_json = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if is_json {
                InputFormat::Json
            } else {
                InputFormat::Text
            }
        }
        explicit => explicit,
    }
}

/// Read a whole input file
pub fn read_input(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

/// Split `key=value`. Values that parse as JSON keep their JSON type;
/// anything else is stored as a string.
pub fn parse_entry(raw: &str) -> CliResult<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::invalid_argument(format!("Entry '{}' is not key=value", raw)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::invalid_argument(format!("Entry '{}' has an empty key", raw)));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Write command output to stdout, followed by a newline
pub fn write_stdout(content: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", content)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("a.JSON")), InputFormat::Json);
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("dynamo_explanation.txt")), InputFormat::Text);
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("noext")), InputFormat::Text);
        assert_eq!(resolve_format(InputFormat::Json, Path::new("a.txt")), InputFormat::Json);
    }

    #[test]
    fn test_parse_entry_types() {
        assert_eq!(parse_entry("model_name=bert").unwrap(), ("model_name".to_string(), json!("bert")));
        assert_eq!(parse_entry("commit=42").unwrap(), ("commit".to_string(), json!(42)));
        assert_eq!(parse_entry("tags=[\"a\"]").unwrap(), ("tags".to_string(), json!(["a"])));
        assert_eq!(parse_entry("note=a=b").unwrap(), ("note".to_string(), json!("a=b")));
        assert_eq!(parse_entry("empty=").unwrap(), ("empty".to_string(), json!("")));
    }

    #[test]
    fn test_parse_entry_errors() {
        assert!(parse_entry("no_separator").is_err());
        assert!(parse_entry("=value").is_err());
    }
}
