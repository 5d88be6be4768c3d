//! Directory-wide aggregation of compilation metric pages

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{TlparseError, TlparseResult};
use super::page::{parse_compilation_metrics, CompilationMetrics};

fn page_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^compilation_metrics_(\d+)\.html$").expect("static pattern"))
}

/// Attempt id encoded in a page file name, if it is a metrics page.
pub fn attempt_id(file_name: &str) -> Option<&str> {
    page_name_pattern()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse every metrics page under `dir`, keyed by attempt id.
///
/// Unreadable pages contribute default metrics and a warning; an
/// unreadable directory is an error.
pub fn aggregate_metrics(dir: &Path) -> TlparseResult<BTreeMap<String, CompilationMetrics>> {
    let mut aggregated = BTreeMap::new();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|e| TlparseError::ReadDir {
            path: current.clone(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TlparseError::ReadDir {
                path: current.clone(),
                source: e,
            })?;
            let path = entry.path();

            if path.is_dir() {
                pending.push(path);
                continue;
            }

            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(attempt_id) else {
                continue;
            };

            let metrics = match fs::read_to_string(&path) {
                Ok(html) => parse_compilation_metrics(&html),
                Err(e) => {
                    let path_str = path.display().to_string();
                    let err_str = e.to_string();
                    log_event_with_fields(
                        Event::TlparseFileUnreadable,
                        &[("path", path_str.as_str()), ("error", err_str.as_str())],
                    );
                    CompilationMetrics::default()
                }
            };
            aggregated.insert(id.to_string(), metrics);
        }
    }

    let pages = aggregated.len().to_string();
    let dir_str = dir.display().to_string();
    log_event_with_fields(
        Event::TlparseAggregated,
        &[("dir", dir_str.as_str()), ("pages", pages.as_str())],
    );

    Ok(aggregated)
}

/// `(attempt id, compile seconds)` sorted numerically by id.
///
/// Missing or non-numeric compile times count as zero.
pub fn compile_time_series(aggregated: &BTreeMap<String, CompilationMetrics>) -> Vec<(String, f64)> {
    let mut series: Vec<(String, f64)> = aggregated
        .iter()
        .map(|(id, metrics)| {
            let seconds = metrics
                .compile_time
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            (id.clone(), seconds)
        })
        .collect();

    series.sort_by_key(|(id, _)| id.parse::<u64>().unwrap_or(u64::MAX));
    series
}

/// Write the aggregate as pretty JSON, creating parent directories.
pub fn write_aggregate(aggregated: &BTreeMap<String, CompilationMetrics>, path: &Path) -> TlparseResult<()> {
    let content = serde_json::to_string_pretty(aggregated)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TlparseError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, content).map_err(|e| TlparseError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
