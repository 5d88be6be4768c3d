//! Explain-output parsing
//!
//! Converts a TorchDynamo `explain()` diagnostic into an [`ExplainResult`]:
//! graph, break and op counts, numbered break reasons with stack frames,
//! an optional compile-time breakdown, auxiliary tables, and graph dumps.
//!
//! The diagnostic reaches the parser as an [`ExplainOutput`], decoded from
//! JSON or read back from the printed text form.
//!
//! # Usage
//!
//! ```ignore
//! use dynexplain::explain::ExplainParser;
//!
//! let mut result = ExplainParser::parse_json(&json)?;
//! ExplainParser::add_custom_entry(&mut result, "model_name", "bert-tiny");
//! ```

mod compile_times;
mod errors;
mod escape;
mod model;
mod parser;
mod result;
mod text;

pub use compile_times::parse_compile_times;
pub use errors::{ExplainError, ExplainOutcome};
pub use escape::{ensure_escaped, html_escape};
pub use model::{ExplainOutput, UpstreamBreakReason};
pub use parser::ExplainParser;
pub use result::{BreakReason, CompileTimeSummary, ExplainResult, OPS_PER_GRAPH_KEY, OUT_GUARDS_KEY};
pub use text::read_explain_text;
