//! Explain-output parser
//!
//! Turns one [`ExplainOutput`] into an [`ExplainResult`]. The transformation
//! is pure: no I/O, no logging, no shared state, so independent diagnostics
//! may be parsed in parallel.

use serde_json::Value;

use super::compile_times::parse_compile_times;
use super::errors::ExplainOutcome;
use super::escape::html_escape;
use super::model::ExplainOutput;
use super::result::{BreakReason, ExplainResult, OPS_PER_GRAPH_KEY, OUT_GUARDS_KEY};
use super::text::read_explain_text;

/// Stateless parser for explain diagnostics.
pub struct ExplainParser;

impl ExplainParser {
    /// Parse a diagnostic into a result record.
    ///
    /// Break reasons are numbered from 1 in input order and escaped
    /// together with their stack frames. The compile-time summary and the
    /// `ops_per_graph` / `out_guards` entries exist only when the
    /// diagnostic carried the corresponding data.
    pub fn parse(diagnostic: &ExplainOutput) -> ExplainResult {
        let break_reasons = diagnostic
            .break_reasons
            .iter()
            .enumerate()
            .map(|(idx, upstream)| {
                BreakReason::new(
                    idx + 1,
                    html_escape(&upstream.reason),
                    upstream.user_stack.iter().map(|f| html_escape(f)).collect(),
                )
            })
            .collect();

        let compile_times = diagnostic.compile_times.as_deref().map(parse_compile_times);

        let mut result = ExplainResult::new(
            diagnostic.graph_count,
            diagnostic.graph_break_count,
            diagnostic.op_count,
            break_reasons,
            compile_times,
            diagnostic.graphs.clone(),
        );

        if let Some(ops_per_graph) = &diagnostic.ops_per_graph {
            let escaped: Vec<Value> = ops_per_graph
                .iter()
                .map(|ops| Value::from(ops.iter().map(|op| html_escape(op)).collect::<Vec<_>>()))
                .collect();
            result.add_custom_entry(OPS_PER_GRAPH_KEY, escaped);
        }

        if let Some(guards) = &diagnostic.out_guards {
            let escaped: Vec<String> = guards.iter().map(|g| html_escape(g)).collect();
            result.add_custom_entry(OUT_GUARDS_KEY, escaped);
        }

        result
    }

    /// Decode a JSON-exported diagnostic and parse it.
    pub fn parse_json(json: &str) -> ExplainOutcome<ExplainResult> {
        let diagnostic: ExplainOutput = serde_json::from_str(json)?;
        Ok(Self::parse(&diagnostic))
    }

    /// Read the diagnostic's printed text and parse it.
    pub fn parse_text(text: &str) -> ExplainOutcome<ExplainResult> {
        let diagnostic = read_explain_text(text)?;
        Ok(Self::parse(&diagnostic))
    }

    /// Insert or overwrite one auxiliary entry on a result.
    pub fn add_custom_entry(result: &mut ExplainResult, key: impl Into<String>, value: impl Into<Value>) {
        result.add_custom_entry(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::model::UpstreamBreakReason;
    use crate::explain::ExplainError;
    use serde_json::json;

    fn diagnostic_with_breaks(n: usize) -> ExplainOutput {
        let mut output = ExplainOutput::new(n as u64 + 1, n as u64, 10);
        for i in 0..n {
            output = output.with_break_reason(UpstreamBreakReason::new(
                format!("reason {}", i),
                vec![format!("model.py:{}", i)],
            ));
        }
        output
    }

    #[test]
    fn test_numbers_are_dense_from_one() {
        let result = ExplainParser::parse(&diagnostic_with_breaks(5));
        let numbers: Vec<usize> = result.break_reasons().iter().map(|b| b.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(result.break_reasons()[3].reason(), "reason 3");
    }

    #[test]
    fn test_reason_and_frames_escaped() {
        let output = ExplainOutput::new(2, 1, 3).with_break_reason(UpstreamBreakReason::new(
            "call_function <built-in function print> & more",
            vec!["<FrameSummary file a.py, line 3 in f>".to_string()],
        ));
        let result = ExplainParser::parse(&output);
        let reason = &result.break_reasons()[0];
        assert_eq!(
            reason.reason(),
            "call_function &lt;built-in function print&gt; &amp; more"
        );
        assert_eq!(
            reason.user_stack()[0],
            "&lt;FrameSummary file a.py, line 3 in f&gt;"
        );
    }

    #[test]
    fn test_zero_breaks() {
        let result = ExplainParser::parse(&ExplainOutput::new(1, 0, 4));
        assert!(result.break_reasons().is_empty());
        assert_eq!(result.graph_break_count(), 0);
        assert!(result.compile_times().is_none());
        assert!(result.additional_data().is_empty());
        assert!(result.graphs().is_none());
    }

    #[test]
    fn test_compile_times_parsed() {
        let output = ExplainOutput::new(1, 0, 1)
            .with_compile_times("TorchDynamo compilation metrics:\nFunction, Runtimes (s)\nf,1.0,2.0\ng,3.0");
        let result = ExplainParser::parse(&output);
        let summary = result.compile_times().unwrap();
        assert_eq!(summary.total_time(), 6.0);
        assert_eq!(summary.durations("g"), Some(&[3.0][..]));
    }

    #[test]
    fn test_ops_and_guards_escaped_under_fixed_keys() {
        let output = ExplainOutput::new(1, 0, 2)
            .with_ops_per_graph(vec![vec!["<built-in function add>".into(), "aten.mm".into()]])
            .with_out_guards(vec!["Name: 'x' Guarded Class: <class 'Tensor'>".into()]);
        let result = ExplainParser::parse(&output);
        assert_eq!(
            result.custom_entry(OPS_PER_GRAPH_KEY),
            Some(&json!([["&lt;built-in function add&gt;", "aten.mm"]]))
        );
        assert_eq!(
            result.custom_entry(OUT_GUARDS_KEY),
            Some(&json!(["Name: &#x27;x&#x27; Guarded Class: &lt;class &#x27;Tensor&#x27;&gt;"]))
        );
    }

    #[test]
    fn test_absent_ops_leave_no_entry() {
        let output = ExplainOutput::new(1, 0, 2).with_out_guards(vec![]);
        let result = ExplainParser::parse(&output);
        assert!(result.custom_entry(OPS_PER_GRAPH_KEY).is_none());
        assert_eq!(result.custom_entry(OUT_GUARDS_KEY), Some(&json!([])));
    }

    #[test]
    fn test_graphs_copied_verbatim() {
        let graph = "class GraphModule(torch.nn.Module):\n    def forward(self, L_x_ : torch.Tensor):".to_string();
        let output = ExplainOutput::new(1, 0, 1).with_graphs(vec![graph.clone()]);
        let result = ExplainParser::parse(&output);
        assert_eq!(result.graphs(), Some(&[graph][..]));
    }

    #[test]
    fn test_add_custom_entry_overwrites() {
        let mut result = ExplainParser::parse(&ExplainOutput::new(1, 0, 0));
        ExplainParser::add_custom_entry(&mut result, "analysis_timestamp", "2024-04-04");
        ExplainParser::add_custom_entry(&mut result, "analysis_timestamp", "2024-04-05");
        assert_eq!(result.custom_entry("analysis_timestamp"), Some(&json!("2024-04-05")));
    }

    #[test]
    fn test_parse_json_missing_required_field() {
        let err = ExplainParser::parse_json(r#"{"graph_break_count": 0, "op_count": 0, "break_reasons": []}"#)
            .unwrap_err();
        assert!(matches!(err, ExplainError::Json(_)));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let output = diagnostic_with_breaks(3).with_compile_times("h\nh\nf,0.1");
        assert_eq!(ExplainParser::parse(&output), ExplainParser::parse(&output));
    }
}
