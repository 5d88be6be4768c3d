//! Reader for the diagnostic's printed form
//!
//! `str(explain_output)` on the Python side prints:
//!
//! ```text
//! Graph Count: 2
//! Graph Break Count: 1
//! Op Count: 5
//! Break Reasons:
//!   Break Reason 1:
//!     Reason: call_function BuiltinVariable(print) [] {}
//!     User Stack:
//!       <FrameSummary file model.py, line 12 in forward>
//! Ops per Graph:
//!   Ops 1:
//!     <built-in function add>
//! Out Guards:
//!   Guard 1:
//!     Name: ''
//!     Source: global
//! Compile Times: TorchDynamo compilation metrics:
//! Function, Runtimes (s)
//! _compile.compile_inner, 0.0451
//! ```
//!
//! Guard blocks are printed without a trailing newline, so the next
//! `Guard N:` header (or the compile-time marker) may share a line with
//! the previous guard's last line. Elsewhere the marker only counts at the
//! start of a line. Graph dumps are not printed.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ExplainError, ExplainOutcome};
use super::model::{ExplainOutput, UpstreamBreakReason};

const BREAK_REASONS_HEADER: &str = "Break Reasons:\n";
const OPS_PER_GRAPH_HEADER: &str = "Ops per Graph:\n";
const OUT_GUARDS_HEADER: &str = "Out Guards:\n";
const COMPILE_TIMES_MARKER: &str = "Compile Times: ";

fn break_reason_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*Break Reason \d+:[ \t]*$").expect("static pattern"))
}

fn ops_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*Ops \d+:[ \t]*$").expect("static pattern"))
}

fn guard_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*Guard \d+:[ \t]*\n").expect("static pattern"))
}

/// Read printed explain output back into the diagnostic model.
pub fn read_explain_text(text: &str) -> ExplainOutcome<ExplainOutput> {
    let text = text.replace("\r\n", "\n");

    let (head, compile_times) = match compile_times_start(&text) {
        Some(idx) => (
            &text[..idx],
            Some(text[idx + COMPILE_TIMES_MARKER.len()..].trim_end().to_string()),
        ),
        None => (text.as_str(), None),
    };

    let mut output = ExplainOutput::new(
        read_count(head, "Graph Count:", "graph_count")?,
        read_count(head, "Graph Break Count:", "graph_break_count")?,
        read_count(head, "Op Count:", "op_count")?,
    );
    output.compile_times = compile_times;

    let breaks = section(head, BREAK_REASONS_HEADER, &[OPS_PER_GRAPH_HEADER, OUT_GUARDS_HEADER])
        .ok_or(ExplainError::MissingField("break_reasons"))?;
    output.break_reasons = read_break_reasons(breaks)?;

    output.ops_per_graph =
        section(head, OPS_PER_GRAPH_HEADER, &[OUT_GUARDS_HEADER]).map(read_ops_per_graph);
    output.out_guards = section(head, OUT_GUARDS_HEADER, &[]).map(read_guards);

    Ok(output)
}

/// Byte offset of the last compile-time marker that opens the table.
fn compile_times_start(text: &str) -> Option<usize> {
    let guards = text.find(OUT_GUARDS_HEADER);

    text.match_indices(COMPILE_TIMES_MARKER)
        .map(|(idx, _)| idx)
        .filter(|&idx| {
            let line_prefix = text[..idx].rsplit('\n').next().unwrap_or("");
            line_prefix.trim().is_empty() || guards.is_some_and(|g| idx > g)
        })
        .last()
}

fn read_count(text: &str, label: &str, field: &'static str) -> ExplainOutcome<u64> {
    let value = text
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(label))
        .ok_or(ExplainError::MissingField(field))?
        .trim();

    value
        .parse::<u64>()
        .map_err(|_| ExplainError::invalid_field(field, value))
}

/// Body of the section opened by `header`, up to the first following header.
fn section<'a>(text: &'a str, header: &str, following: &[&str]) -> Option<&'a str> {
    let start = text.find(header)? + header.len();
    let rest = &text[start..];
    let end = following
        .iter()
        .filter_map(|next| rest.find(next))
        .min()
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn read_break_reasons(body: &str) -> ExplainOutcome<Vec<UpstreamBreakReason>> {
    break_reason_header()
        .split(body)
        .skip(1)
        .map(read_break_reason)
        .collect()
}

fn read_break_reason(block: &str) -> ExplainOutcome<UpstreamBreakReason> {
    let mut reason: Option<String> = None;
    let mut user_stack = Vec::new();
    let mut in_stack = false;

    for line in block.lines() {
        let trimmed = line.trim();
        if in_stack {
            if !trimmed.is_empty() {
                user_stack.push(trimmed.to_string());
            }
        } else if trimmed == "User Stack:" {
            in_stack = true;
        } else if let Some(text) = trimmed.strip_prefix("Reason:") {
            reason = Some(text.trim().to_string());
        } else if let Some(text) = reason.as_mut() {
            // multi-line reason
            if !trimmed.is_empty() {
                text.push('\n');
                text.push_str(trimmed);
            }
        }
    }

    let reason = reason.ok_or(ExplainError::MissingField("reason"))?;
    Ok(UpstreamBreakReason::new(reason, user_stack))
}

fn read_ops_per_graph(body: &str) -> Vec<Vec<String>> {
    ops_header()
        .split(body)
        .skip(1)
        .map(|block| non_empty_lines(block).map(str::to_string).collect())
        .collect()
}

fn read_guards(body: &str) -> Vec<String> {
    guard_header()
        .split(body)
        .skip(1)
        .map(|block| non_empty_lines(block).collect::<Vec<_>>().join("\n"))
        .collect()
}

fn non_empty_lines(block: &str) -> impl Iterator<Item = &str> {
    block.lines().map(str::trim).filter(|line| !line.is_empty())
}
