//! Upstream diagnostic model
//!
//! Mirrors the object returned by TorchDynamo's `explain()`. Graphs,
//! guards and ops arrive already stringified; the exporter on the Python
//! side is responsible for that.
//!
//! Required fields: the three counts and `break_reasons`. Every other
//! field may be missing or `null`, which both mean absent.

use serde::{Deserialize, Serialize};

/// One graph-break record as emitted by the diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamBreakReason {
    /// Why the compiler fell back to interpreted execution.
    pub reason: String,
    /// User stack frames, outermost first.
    #[serde(default)]
    pub user_stack: Vec<String>,
}

impl UpstreamBreakReason {
    /// Create a break reason with the given frames.
    pub fn new(reason: impl Into<String>, user_stack: Vec<String>) -> Self {
        Self {
            reason: reason.into(),
            user_stack,
        }
    }
}

/// The diagnostic object handed to the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainOutput {
    /// Readable form of every compiled graph.
    #[serde(default)]
    pub graphs: Option<Vec<String>>,
    pub graph_count: u64,
    pub graph_break_count: u64,
    pub op_count: u64,
    pub break_reasons: Vec<UpstreamBreakReason>,
    /// Multi-line table: two header lines, then `name, t1, t2, ...`.
    #[serde(default)]
    pub compile_times: Option<String>,
    #[serde(default)]
    pub ops_per_graph: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub out_guards: Option<Vec<String>>,
}

impl ExplainOutput {
    /// Create a diagnostic with counts only and every optional field absent.
    pub fn new(graph_count: u64, graph_break_count: u64, op_count: u64) -> Self {
        Self {
            graphs: None,
            graph_count,
            graph_break_count,
            op_count,
            break_reasons: Vec::new(),
            compile_times: None,
            ops_per_graph: None,
            out_guards: None,
        }
    }

    /// Append a break reason.
    pub fn with_break_reason(mut self, reason: UpstreamBreakReason) -> Self {
        self.break_reasons.push(reason);
        self
    }

    /// Set the compile-time table.
    pub fn with_compile_times(mut self, table: impl Into<String>) -> Self {
        self.compile_times = Some(table.into());
        self
    }

    /// Set the per-graph op lists.
    pub fn with_ops_per_graph(mut self, ops: Vec<Vec<String>>) -> Self {
        self.ops_per_graph = Some(ops);
        self
    }

    /// Set the guard list.
    pub fn with_out_guards(mut self, guards: Vec<String>) -> Self {
        self.out_guards = Some(guards);
        self
    }

    /// Set the graph dumps.
    pub fn with_graphs(mut self, graphs: Vec<String>) -> Self {
        self.graphs = Some(graphs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal() {
        let value = json!({
            "graph_count": 1,
            "graph_break_count": 0,
            "op_count": 3,
            "break_reasons": []
        });
        let output: ExplainOutput = serde_json::from_value(value).unwrap();
        assert_eq!(output, ExplainOutput::new(1, 0, 3));
    }

    #[test]
    fn test_null_optionals_are_absent() {
        let value = json!({
            "graphs": null,
            "graph_count": 2,
            "graph_break_count": 1,
            "op_count": 5,
            "break_reasons": [{"reason": "generic_jump", "user_stack": ["f.py:3"]}],
            "compile_times": null,
            "ops_per_graph": null,
            "out_guards": null
        });
        let output: ExplainOutput = serde_json::from_value(value).unwrap();
        assert!(output.ops_per_graph.is_none());
        assert!(output.out_guards.is_none());
        assert!(output.compile_times.is_none());
        assert_eq!(output.break_reasons[0].user_stack, vec!["f.py:3"]);
    }

    #[test]
    fn test_missing_required_count_fails() {
        let value = json!({
            "graph_break_count": 0,
            "op_count": 0,
            "break_reasons": []
        });
        let err = serde_json::from_value::<ExplainOutput>(value).unwrap_err();
        assert!(err.to_string().contains("graph_count"));
    }

    #[test]
    fn test_builder() {
        let output = ExplainOutput::new(2, 1, 4)
            .with_break_reason(UpstreamBreakReason::new("call_function", vec![]))
            .with_out_guards(vec!["TENSOR_MATCH".to_string()]);
        assert_eq!(output.break_reasons.len(), 1);
        assert_eq!(output.out_guards.as_deref().map(<[String]>::len), Some(1));
    }
}
