//! CLI argument definitions using clap
//!
//! Commands:
//! - dynexplain parse --input <file>
//! - dynexplain report --input <file>
//! - dynexplain record --input <file> --model <name> --commit <id>
//! - dynexplain tlparse --dir <dir>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dynexplain - TorchDynamo explain diagnostics as JSON, HTML and metrics
#[derive(Parser, Debug)]
#[command(name = "dynexplain")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./dynexplain.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// How to read the input file
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `.json` files as JSON, anything else as printed text
    #[default]
    Auto,
    /// Exported diagnostic object as JSON
    Json,
    /// Printed `explain()` output
    Text,
}

/// Diagnostic input shared by every parsing command
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Diagnostic file to read
    #[arg(long)]
    pub input: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Extra auxiliary entry as key=value; repeatable
    #[arg(long = "entry", value_name = "KEY=VALUE")]
    pub entries: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a diagnostic and emit the JSON result
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse a diagnostic and write an HTML report
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Report path (default: <report_dir>/<input stem>.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse a diagnostic and record its graph breaks as metrics
    Record {
        #[command(flatten)]
        input: InputArgs,

        /// Model the diagnostic was produced for
        #[arg(long)]
        model: String,

        /// Commit or build identifier
        #[arg(long)]
        commit: String,
    },

    /// Aggregate trace-log compilation metric pages
    Tlparse {
        /// Trace-log output directory
        #[arg(long)]
        dir: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
