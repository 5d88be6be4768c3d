//! Trace-log metrics aggregation
//!
//! Collects the `compilation_metrics_<id>.html` pages written by the
//! trace-log parser into one map keyed by compilation attempt.

mod aggregate;
mod errors;
mod page;

pub use aggregate::{aggregate_metrics, attempt_id, compile_time_series, write_aggregate};
pub use errors::{TlparseError, TlparseResult};
pub use page::{parse_compilation_metrics, CompilationMetrics, CountValue};
