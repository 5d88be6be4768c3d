//! dynexplain - TorchDynamo explain diagnostics as structured records
//!
//! Parses `explain()` output into an [`explain::ExplainResult`] and
//! surfaces it as JSON, HTML, Prometheus counters and logfmt lines.

pub mod cli;
pub mod explain;
pub mod metrics;
pub mod observability;
pub mod report;
pub mod tlparse;
