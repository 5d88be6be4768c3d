//! Observable events
//!
//! Every lifecycle log line names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file read
    ConfigLoaded,
    /// No configuration file, defaults in effect
    ConfigDefaulted,

    // Parsing
    ExplainParseBegin,
    ExplainParseComplete,
    ExplainParseFailed,

    // Output
    /// JSON result written to a file
    ResultWritten,
    /// HTML report written
    ReportWritten,

    // Metrics
    /// Break reasons recorded into the metrics context
    MetricsRecorded,
    MetricsFlushed,

    // Trace-log aggregation
    TlparseFileUnreadable,
    TlparseAggregated,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::ExplainParseBegin => "EXPLAIN_PARSE_BEGIN",
            Event::ExplainParseComplete => "EXPLAIN_PARSE_COMPLETE",
            Event::ExplainParseFailed => "EXPLAIN_PARSE_FAILED",
            Event::ResultWritten => "RESULT_WRITTEN",
            Event::ReportWritten => "REPORT_WRITTEN",
            Event::MetricsRecorded => "METRICS_RECORDED",
            Event::MetricsFlushed => "METRICS_FLUSHED",
            Event::TlparseFileUnreadable => "TLPARSE_FILE_UNREADABLE",
            Event::TlparseAggregated => "TLPARSE_AGGREGATED",
        }
    }

    /// Failure events log at WARN or above
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::ExplainParseFailed | Event::TlparseFileUnreadable)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
