//! Parsed explain record
//!
//! `ExplainResult` is built once by the parser and is read-only afterwards,
//! except for the auxiliary map which callers extend through
//! [`ExplainResult::add_custom_entry`].
//!
//! Invariants:
//! - break-reason numbers are exactly `1..=N` in order
//! - `CompileTimeSummary::total_time` equals the sum of every duration in
//!   `details`; it is recomputed on construction and on deserialization
//! - reasons, frames and every string under `ops_per_graph` / `out_guards`
//!   hold no raw markup, whether parsed, loaded or written by a caller

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ExplainError;
use super::escape::ensure_escaped;

/// Auxiliary key holding the escaped per-graph op lists.
pub const OPS_PER_GRAPH_KEY: &str = "ops_per_graph";

/// Auxiliary key holding the escaped guard list.
pub const OUT_GUARDS_KEY: &str = "out_guards";

/// One graph break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakReason {
    number: usize,
    reason: String,
    user_stack: Vec<String>,
}

impl BreakReason {
    pub(crate) fn new(number: usize, reason: String, user_stack: Vec<String>) -> Self {
        Self {
            number,
            reason,
            user_stack,
        }
    }

    /// 1-based position in parse order.
    pub fn number(&self) -> usize {
        self.number
    }

    /// HTML-escaped reason text.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// HTML-escaped stack frames.
    pub fn user_stack(&self) -> &[String] {
        &self.user_stack
    }
}

/// Per-function compile durations, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CompileTimeRecord")]
pub struct CompileTimeSummary {
    total_time: f64,
    details: BTreeMap<String, Vec<f64>>,
}

/// Stored form of a compile-time summary. Any stored total is ignored.
#[derive(Deserialize)]
struct CompileTimeRecord {
    #[serde(default)]
    details: BTreeMap<String, Vec<f64>>,
}

impl From<CompileTimeRecord> for CompileTimeSummary {
    fn from(record: CompileTimeRecord) -> Self {
        CompileTimeSummary::from_details(record.details)
    }
}

impl CompileTimeSummary {
    /// Build a summary, deriving the total from the details.
    pub fn from_details(details: BTreeMap<String, Vec<f64>>) -> Self {
        let total_time = details.values().flatten().fold(0.0, |acc, t| acc + t);
        Self {
            total_time,
            details,
        }
    }

    /// Sum of every recorded duration.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Function name to durations, in call order.
    pub fn details(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.details
    }

    /// Durations recorded for one function.
    pub fn durations(&self, function: &str) -> Option<&[f64]> {
        self.details.get(function).map(Vec::as_slice)
    }
}

/// Structured record of one explain run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExplainRecord")]
pub struct ExplainResult {
    graph_count: u64,
    graph_break_count: u64,
    op_count: u64,
    break_reasons: Vec<BreakReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compile_times: Option<CompileTimeSummary>,
    additional_data: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    graphs: Option<Vec<String>>,
}

/// Stored form of an explain result, checked before it becomes an
/// [`ExplainResult`].
#[derive(Deserialize)]
struct ExplainRecord {
    graph_count: u64,
    graph_break_count: u64,
    op_count: u64,
    #[serde(default)]
    break_reasons: Vec<BreakReason>,
    #[serde(default)]
    compile_times: Option<CompileTimeSummary>,
    #[serde(default)]
    additional_data: BTreeMap<String, Value>,
    #[serde(default)]
    graphs: Option<Vec<String>>,
}

impl TryFrom<ExplainRecord> for ExplainResult {
    type Error = ExplainError;

    fn try_from(record: ExplainRecord) -> Result<Self, Self::Error> {
        for (idx, reason) in record.break_reasons.iter().enumerate() {
            if reason.number != idx + 1 {
                return Err(ExplainError::InvalidRecord(format!(
                    "break reason at position {} is numbered {}",
                    idx + 1,
                    reason.number
                )));
            }
        }

        let break_reasons = record
            .break_reasons
            .into_iter()
            .map(|br| BreakReason {
                number: br.number,
                reason: ensure_escaped(&br.reason),
                user_stack: br.user_stack.iter().map(|f| ensure_escaped(f)).collect(),
            })
            .collect();

        let additional_data = record
            .additional_data
            .into_iter()
            .map(|(key, value)| {
                let value = checked_entry(&key, value);
                (key, value)
            })
            .collect();

        Ok(ExplainResult {
            graph_count: record.graph_count,
            graph_break_count: record.graph_break_count,
            op_count: record.op_count,
            break_reasons,
            compile_times: record.compile_times,
            additional_data,
            graphs: record.graphs,
        })
    }
}

impl ExplainResult {
    pub(crate) fn new(
        graph_count: u64,
        graph_break_count: u64,
        op_count: u64,
        break_reasons: Vec<BreakReason>,
        compile_times: Option<CompileTimeSummary>,
        graphs: Option<Vec<String>>,
    ) -> Self {
        Self {
            graph_count,
            graph_break_count,
            op_count,
            break_reasons,
            compile_times,
            additional_data: BTreeMap::new(),
            graphs,
        }
    }

    pub fn graph_count(&self) -> u64 {
        self.graph_count
    }

    pub fn graph_break_count(&self) -> u64 {
        self.graph_break_count
    }

    pub fn op_count(&self) -> u64 {
        self.op_count
    }

    /// Break reasons in parse order. Empty, never absent.
    pub fn break_reasons(&self) -> &[BreakReason] {
        &self.break_reasons
    }

    pub fn compile_times(&self) -> Option<&CompileTimeSummary> {
        self.compile_times.as_ref()
    }

    /// Auxiliary entries, ordered by key.
    pub fn additional_data(&self) -> &BTreeMap<String, Value> {
        &self.additional_data
    }

    /// Look up one auxiliary entry.
    pub fn custom_entry(&self, key: &str) -> Option<&Value> {
        self.additional_data.get(key)
    }

    /// Readable graph dumps, unescaped.
    pub fn graphs(&self) -> Option<&[String]> {
        self.graphs.as_deref()
    }

    /// Insert or overwrite one auxiliary entry. Last write wins.
    ///
    /// Strings written under `ops_per_graph` or `out_guards` are escaped
    /// unless they already are.
    pub fn add_custom_entry(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = checked_entry(&key, value.into());
        self.additional_data.insert(key, value);
    }
}

fn checked_entry(key: &str, value: Value) -> Value {
    if key == OPS_PER_GRAPH_KEY || key == OUT_GUARDS_KEY {
        escape_strings(value)
    } else {
        value
    }
}

fn escape_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(ensure_escaped(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(escape_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, escape_strings(v)))
                .collect(),
        ),
        other => other,
    }
}
