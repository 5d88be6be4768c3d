//! CLI module for dynexplain
//!
//! Provides command-line interface for:
//! - parse: diagnostic to JSON result
//! - report: diagnostic to HTML page
//! - record: diagnostic graph breaks to Prometheus/logfmt files
//! - tlparse: trace-log metric pages to JSON

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, InputArgs, InputFormat};
pub use commands::{load_result, parse, record, report, run, run_command, tlparse};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_entry, resolve_format};
