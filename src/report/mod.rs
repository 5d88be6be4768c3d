//! Report output for explain results
//!
//! - JSON (compact or pretty) for persistence and metrics pipelines
//! - A standalone HTML page with collapsible stack traces
//! - Batches of stored results tagged with model identity

mod batch;
mod errors;
mod html;
mod json;

pub use batch::{load_batch, write_batch, ModelExplainRecord, ModelInfo};
pub use errors::{ReportError, ReportResult};
pub use html::{render_html, write_html};
pub use json::{to_json, to_json_pretty, write_json};
