//! Observability for dynexplain
//!
//! - Structured JSON logging on stderr
//! - Typed lifecycle events
//! - Scopes that log begin/complete/failed
//!
//! Logging happens at the command boundary and in output writers. The
//! explain parser never logs.
//!
//! ```ignore
//! use dynexplain::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ReportWritten, &[("path", "reports/run.html")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
