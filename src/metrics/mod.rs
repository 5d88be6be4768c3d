//! Graph-break metrics
//!
//! A [`MetricsContext`] replaces a process-wide registry: create one at
//! start, pass it to whatever records breaks, `close` it at the end.
//!
//! ```ignore
//! let mut metrics = MetricsContext::new(MetricsConfig::new(prom, log));
//! metrics.record_result("prajjwal1/bert-tiny", "1", &result);
//! metrics.close()?;
//! ```

mod context;
mod errors;

pub use context::{BreakLabels, BreakSample, MetricsConfig, MetricsContext, BREAKS_HELP, BREAKS_METRIC};
pub use errors::{MetricsError, MetricsResult};
