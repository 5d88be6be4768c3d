//! CLI command implementations
//!
//! Each command loads config, parses the diagnostic once, and hands the
//! result to exactly one sink: stdout/JSON file, HTML report, or metrics.

use std::path::{Path, PathBuf};

use crate::explain::{ExplainParser, ExplainResult};
use crate::metrics::MetricsContext;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::report::{to_json_pretty, write_html, write_json};
use crate::tlparse::{aggregate_metrics, write_aggregate};

use super::args::{Cli, Command, InputArgs, InputFormat};
use super::config::Config;
use super::errors::CliResult;
use super::io::{parse_entry, read_input, resolve_format, write_stdout};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Command::Parse { input, output } => parse(&input, output.as_deref()),
        Command::Report { input, output } => report(&config, &input, output),
        Command::Record { input, model, commit } => record(&config, &input, &model, &commit),
        Command::Tlparse { dir, output } => tlparse(&dir, output.as_deref()),
    }
}

/// Read, parse and tag a diagnostic with the requested custom entries
pub fn load_result(input: &InputArgs) -> CliResult<ExplainResult> {
    let path_str = input.input.display().to_string();
    let format = resolve_format(input.format, &input.input);
    let format_str = match format {
        InputFormat::Json => "json",
        _ => "text",
    };

    log_event_with_fields(
        Event::ExplainParseBegin,
        &[("format", format_str), ("input", path_str.as_str())],
    );

    let content = read_input(&input.input)?;
    let parsed = match format {
        InputFormat::Json => ExplainParser::parse_json(&content),
        _ => ExplainParser::parse_text(&content),
    };

    let mut result = match parsed {
        Ok(result) => result,
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::ExplainParseFailed,
                &[("input", path_str.as_str()), ("reason", reason.as_str())],
            );
            return Err(e.into());
        }
    };

    for raw in &input.entries {
        let (key, value) = parse_entry(raw)?;
        ExplainParser::add_custom_entry(&mut result, key, value);
    }

    let breaks = result.break_reasons().len().to_string();
    let graphs = result.graph_count().to_string();
    log_event_with_fields(
        Event::ExplainParseComplete,
        &[
            ("breaks", breaks.as_str()),
            ("graphs", graphs.as_str()),
            ("input", path_str.as_str()),
        ],
    );

    Ok(result)
}

/// `dynexplain parse`
pub fn parse(input: &InputArgs, output: Option<&Path>) -> CliResult<()> {
    let result = load_result(input)?;

    match output {
        Some(path) => {
            write_json(&result, path)?;
            let path_str = path.display().to_string();
            log_event_with_fields(Event::ResultWritten, &[("path", path_str.as_str())]);
            Ok(())
        }
        None => write_stdout(&to_json_pretty(&result)?),
    }
}

/// `dynexplain report`
pub fn report(config: &Config, input: &InputArgs, output: Option<PathBuf>) -> CliResult<()> {
    let result = load_result(input)?;
    let path = output.unwrap_or_else(|| config.report_path(&input.input));
    let path_str = path.display().to_string();

    let scope = ObservationScope::with_fields("REPORT_RENDER", &[("path", path_str.as_str())]);
    if let Err(e) = write_html(&result, &path) {
        scope.fail(&e.to_string());
        return Err(e.into());
    }
    scope.complete();

    log_event_with_fields(Event::ReportWritten, &[("path", path_str.as_str())]);
    Ok(())
}

/// `dynexplain record`
pub fn record(config: &Config, input: &InputArgs, model: &str, commit: &str) -> CliResult<()> {
    let result = load_result(input)?;

    let mut metrics = MetricsContext::new(config.metrics_config());
    let recorded = metrics.record_result(model, commit, &result).to_string();
    log_event_with_fields(
        Event::MetricsRecorded,
        &[("breaks", recorded.as_str()), ("commit", commit), ("model", model)],
    );

    metrics.close()?;
    Ok(())
}

/// `dynexplain tlparse`
pub fn tlparse(dir: &Path, output: Option<&Path>) -> CliResult<()> {
    let aggregated = aggregate_metrics(dir)?;

    match output {
        Some(path) => {
            write_aggregate(&aggregated, path)?;
            let path_str = path.display().to_string();
            log_event_with_fields(Event::ResultWritten, &[("path", path_str.as_str())]);
            Ok(())
        }
        None => write_stdout(&serde_json::to_string_pretty(&aggregated)?),
    }
}
