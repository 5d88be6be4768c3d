//! Key/value extraction from one `compilation_metrics_<id>.html` page
//!
//! Only table rows with exactly two cells are considered. The first cell
//! is the key (compared lowercase), the second the value.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Restart/failure count: an integer when the cell holds one, the raw text
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Count(i64),
    Text(String),
}

impl Default for CountValue {
    fn default() -> Self {
        CountValue::Count(0)
    }
}

impl CountValue {
    fn from_cell(cell: &str) -> Self {
        cell.parse::<i64>()
            .map(CountValue::Count)
            .unwrap_or_else(|_| CountValue::Text(cell.to_string()))
    }
}

/// Metrics extracted from one compilation attempt page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationMetrics {
    pub compile_time: Option<String>,
    pub backend_time: Option<String>,
    pub restarts: CountValue,
    pub failures: CountValue,
}

fn row_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("static pattern"))
}

fn cell_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<t[hd]\b[^>]*>(.*?)</t[hd]\s*>").expect("static pattern"))
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"))
}

/// Extract metrics from the page source.
pub fn parse_compilation_metrics(html: &str) -> CompilationMetrics {
    let mut metrics = CompilationMetrics::default();

    for row in row_pattern().captures_iter(html) {
        let cells: Vec<String> = cell_pattern()
            .captures_iter(&row[1])
            .map(|cell| cell_text(&cell[1]))
            .collect();
        if cells.len() != 2 {
            continue;
        }

        let key = cells[0].to_lowercase();
        let value = &cells[1];
        if key.contains("compile time") {
            metrics.compile_time = Some(value.clone());
        } else if key.contains("backend") {
            metrics.backend_time = Some(value.clone());
        } else if key.contains("restart") {
            metrics.restarts = CountValue::from_cell(value);
        } else if key.contains("failure") {
            metrics.failures = CountValue::from_cell(value);
        }
    }

    metrics
}

/// Visible text of a cell: tags removed, common entities decoded, trimmed.
fn cell_text(inner: &str) -> String {
    let stripped = tag_pattern().replace_all(inner, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
