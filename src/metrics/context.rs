//! Graph-break metrics context
//!
//! Counts graph breaks per (model, commit, reason) and keeps a logfmt
//! line per recorded break.
//!
//! - Created explicitly by the caller and passed where needed
//! - Counters only, monotonic for the life of the context
//! - Nothing touches disk until `flush` or `close`

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::explain::ExplainResult;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{MetricsError, MetricsResult};

/// Counter family name.
pub const BREAKS_METRIC: &str = "compile_breaks_total";

/// Counter family help text.
pub const BREAKS_HELP: &str = "Torch.compile breaks per commit";

/// Output locations for a metrics context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Prometheus text file, rewritten on every flush.
    pub prom_path: PathBuf,
    /// logfmt file, appended on every flush.
    pub log_path: PathBuf,
}

impl MetricsConfig {
    pub fn new(prom_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            prom_path: prom_path.into(),
            log_path: log_path.into(),
        }
    }
}

/// Label set of one counter sample.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreakLabels {
    pub model: String,
    pub commit: String,
    pub reason: String,
}

/// One counter sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakSample {
    pub labels: BreakLabels,
    pub count: u64,
}

/// Explicitly constructed metrics state for one process run.
#[derive(Debug)]
pub struct MetricsContext {
    config: MetricsConfig,
    breaks: BTreeMap<BreakLabels, u64>,
    pending_log: Vec<String>,
}

impl MetricsContext {
    /// Create an empty context
    pub fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            breaks: BTreeMap::new(),
            pending_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Count one graph break and queue its log line
    pub fn record(&mut self, model: &str, commit: &str, reason: &str) {
        let labels = BreakLabels {
            model: model.to_string(),
            commit: commit.to_string(),
            reason: reason.to_string(),
        };
        *self.breaks.entry(labels).or_insert(0) += 1;

        let ts = Utc::now().timestamp_nanos_opt().unwrap_or(0);
        self.pending_log.push(logfmt_line(ts, model, commit, reason));
    }

    /// Record every break reason of a result. Returns how many were recorded.
    pub fn record_result(&mut self, model: &str, commit: &str, result: &ExplainResult) -> usize {
        for br in result.break_reasons() {
            self.record(model, commit, br.reason());
        }
        result.break_reasons().len()
    }

    /// Current count for one label set
    pub fn count(&self, model: &str, commit: &str, reason: &str) -> u64 {
        let labels = BreakLabels {
            model: model.to_string(),
            commit: commit.to_string(),
            reason: reason.to_string(),
        };
        self.breaks.get(&labels).copied().unwrap_or(0)
    }

    /// Sum over every label set
    pub fn total(&self) -> u64 {
        self.breaks.values().sum()
    }

    /// All samples, sorted by labels
    pub fn snapshot(&self) -> Vec<BreakSample> {
        self.breaks
            .iter()
            .map(|(labels, count)| BreakSample {
                labels: labels.clone(),
                count: *count,
            })
            .collect()
    }

    /// Log lines recorded since the last flush
    pub fn pending_log(&self) -> &[String] {
        &self.pending_log
    }

    /// Prometheus text exposition of the counter family
    pub fn render_exposition(&self) -> String {
        let mut out = format!("# HELP {} {}\n# TYPE {} counter\n", BREAKS_METRIC, BREAKS_HELP, BREAKS_METRIC);
        for (labels, count) in &self.breaks {
            out.push_str(&format!(
                "{}{{model=\"{}\",commit=\"{}\",reason=\"{}\"}} {}.0\n",
                BREAKS_METRIC,
                escape_label(&labels.model),
                escape_label(&labels.commit),
                escape_label(&labels.reason),
                count
            ));
        }
        out
    }

    /// Rewrite the `.prom` file and append queued log lines
    pub fn flush(&mut self) -> MetricsResult<()> {
        write_prom(&self.config.prom_path, &self.render_exposition())?;
        append_log(&self.config.log_path, &self.pending_log)?;

        let flushed = self.pending_log.len().to_string();
        let samples = self.breaks.len().to_string();
        log_event_with_fields(
            Event::MetricsFlushed,
            &[("log_lines", flushed.as_str()), ("samples", samples.as_str())],
        );

        self.pending_log.clear();
        Ok(())
    }

    /// Flush and release the context
    pub fn close(mut self) -> MetricsResult<()> {
        self.flush()
    }
}

fn logfmt_line(ts: i64, model: &str, commit: &str, reason: &str) -> String {
    format!(
        "time={} model={} commit={} reason=\"{}\"",
        ts,
        model,
        commit,
        escape_label(reason)
    )
}

/// Escape backslash, double quote and newline for a quoted value
fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn ensure_parent(path: &Path) -> MetricsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MetricsError::write(parent, e))?;
    }
    Ok(())
}

fn write_prom(path: &Path, content: &str) -> MetricsResult<()> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| MetricsError::write(path, e))
}

fn append_log(path: &Path, lines: &[String]) -> MetricsResult<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MetricsError::write(path, e))?;

    let mut buffer = String::new();
    for line in lines {
        buffer.push_str(line);
        buffer.push('\n');
    }
    file.write_all(buffer.as_bytes())
        .map_err(|e| MetricsError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(tmp: &TempDir) -> MetricsContext {
        MetricsContext::new(MetricsConfig::new(
            tmp.path().join("metrics").join("compile_breaks.prom"),
            tmp.path().join("metrics").join("compile_breaks.log"),
        ))
    }

    #[test]
    fn test_new_context_is_empty() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        assert_eq!(ctx.total(), 0);
        assert!(ctx.snapshot().is_empty());
        assert_eq!(
            ctx.render_exposition(),
            "# HELP compile_breaks_total Torch.compile breaks per commit\n# TYPE compile_breaks_total counter\n"
        );
    }

    #[test]
    fn test_record_counts_per_label_set() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp);
        ctx.record("bert-tiny", "1", "generic_jump");
        ctx.record("bert-tiny", "1", "generic_jump");
        ctx.record("bert-tiny", "2", "generic_jump");

        assert_eq!(ctx.count("bert-tiny", "1", "generic_jump"), 2);
        assert_eq!(ctx.count("bert-tiny", "2", "generic_jump"), 1);
        assert_eq!(ctx.count("bert-tiny", "3", "generic_jump"), 0);
        assert_eq!(ctx.total(), 3);
        assert_eq!(ctx.pending_log().len(), 3);
    }

    #[test]
    fn test_exposition_sorted_and_escaped() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp);
        ctx.record("m", "1", "zeta");
        ctx.record("m", "1", "say \"hi\"\nnow");

        let text = ctx.render_exposition();
        let samples: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(
            samples,
            vec![
                r#"compile_breaks_total{model="m",commit="1",reason="say \"hi\"\nnow"} 1.0"#,
                r#"compile_breaks_total{model="m",commit="1",reason="zeta"} 1.0"#,
            ]
        );
    }

    #[test]
    fn test_logfmt_line_shape() {
        let line = logfmt_line(1700000000000000000, "bert", "abc", "call \"print\"");
        assert_eq!(
            line,
            r#"time=1700000000000000000 model=bert commit=abc reason="call \"print\"""#
        );
    }

    #[test]
    fn test_flush_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp);
        ctx.record("bert", "1", "generic_jump");
        ctx.flush().unwrap();

        let prom = fs::read_to_string(&ctx.config().prom_path).unwrap();
        assert!(prom.contains(r#"compile_breaks_total{model="bert",commit="1",reason="generic_jump"} 1.0"#));

        let log = fs::read_to_string(&ctx.config().log_path).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("model=bert commit=1 reason=\"generic_jump\""));
        assert!(ctx.pending_log().is_empty());
    }

    #[test]
    fn test_log_appends_across_flushes_and_prom_rewrites() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp);
        ctx.record("bert", "1", "a");
        ctx.flush().unwrap();
        ctx.record("bert", "1", "a");
        let log_path = ctx.config().log_path.clone();
        let prom_path = ctx.config().prom_path.clone();
        ctx.close().unwrap();

        let log = fs::read_to_string(log_path).unwrap();
        assert_eq!(log.lines().count(), 2);

        let prom = fs::read_to_string(prom_path).unwrap();
        assert_eq!(prom.matches("compile_breaks_total{").count(), 1);
        assert!(prom.contains("} 2.0"));
    }
}
