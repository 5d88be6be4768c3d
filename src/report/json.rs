//! JSON output for explain results

use std::fs;
use std::path::Path;

use crate::explain::ExplainResult;

use super::errors::{ReportError, ReportResult};

/// Compact single-line JSON, suitable for log and metrics pipelines.
pub fn to_json(result: &ExplainResult) -> ReportResult<String> {
    Ok(serde_json::to_string(result)?)
}

/// Indented JSON for human reading.
pub fn to_json_pretty(result: &ExplainResult) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write pretty JSON to `path`, creating parent directories.
pub fn write_json(result: &ExplainResult, path: &Path) -> ReportResult<()> {
    let content = to_json_pretty(result)?;
    write_file(path, &content)
}

pub(crate) fn write_file(path: &Path, content: &str) -> ReportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ReportError::io(path, e))
}
