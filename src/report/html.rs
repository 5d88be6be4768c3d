//! HTML report rendering
//!
//! Produces one self-contained page per result. Reasons, frames, ops and
//! guards are stored escaped and pass through `ensure_escaped`, so stored
//! entities are kept and raw markup never is. Every other string (custom
//! entries, function names, graph dumps) is escaped here.

use std::path::Path;

use serde_json::Value;

use crate::explain::{ensure_escaped, html_escape, ExplainResult, OPS_PER_GRAPH_KEY, OUT_GUARDS_KEY};

use super::errors::ReportResult;
use super::json::write_file;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { border-bottom: 2px solid #ee4c2c; padding-bottom: .3em; }
section { margin-bottom: 2em; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
.summary-item { margin: .3em 0; font-weight: 600; }
.stack-trace { font-family: monospace; font-size: 0.9em; white-space: pre-wrap; background: #fafafa; padding: .5em; }
pre.graph-content { background: #f6f8fa; padding: 1em; overflow-x: auto; }
"#;

/// Render a result as a complete HTML document.
pub fn render_html(result: &ExplainResult) -> String {
    let mut page = String::with_capacity(4096);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Dynamo Explain Report</title>\n");
    page.push_str(&format!("<style>{}</style>\n", STYLE));
    page.push_str("</head>\n<body>\n<h1>Dynamo Explain Report</h1>\n");

    page.push_str(&summary_section(result));
    page.push_str(&break_reasons_section(result));
    page.push_str(&compile_times_section(result));
    page.push_str(&ops_per_graph_section(result));
    page.push_str(&out_guards_section(result));
    page.push_str(&additional_data_section(result));
    page.push_str(&graphs_section(result));

    page.push_str("</body>\n</html>\n");
    page
}

/// Render and write the page to `path`, creating parent directories.
pub fn write_html(result: &ExplainResult, path: &Path) -> ReportResult<()> {
    write_file(path, &render_html(result))
}

fn summary_section(result: &ExplainResult) -> String {
    format!(
        "<section id=\"summary\">\n<h2>Summary</h2>\n\
         <div class=\"summary-item\">Graph Count: {}</div>\n\
         <div class=\"summary-item\">Graph Break Count: {}</div>\n\
         <div class=\"summary-item\">Op Count: {}</div>\n</section>\n",
        result.graph_count(),
        result.graph_break_count(),
        result.op_count()
    )
}

fn break_reasons_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"break-reasons\">\n<h2>Break Reasons</h2>\n");

    if result.break_reasons().is_empty() {
        html.push_str("<p>No graph breaks.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr><th>#</th><th>Reason</th><th>User Stack</th></tr></thead>\n<tbody>\n");
        for br in result.break_reasons() {
            let frames: Vec<String> = br.user_stack().iter().map(|f| ensure_escaped(f)).collect();
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td><details><summary>{} frame(s)</summary>\
                 <div class=\"stack-trace\">{}</div></details></td></tr>\n",
                br.number(),
                ensure_escaped(br.reason()),
                frames.len(),
                frames.join("<br>")
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</section>\n");
    html
}

fn compile_times_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"compile-times\">\n<h2>Compile Times</h2>\n");

    match result.compile_times() {
        Some(summary) => {
            html.push_str(&format!(
                "<div class=\"summary-item\">Total Compile Time: {}s</div>\n<ul>\n",
                summary.total_time()
            ));
            for (name, times) in summary.details() {
                let joined: Vec<String> = times.iter().map(|t| t.to_string()).collect();
                html.push_str(&format!(
                    "<li>{}: {}s</li>\n",
                    html_escape(name),
                    joined.join(", ")
                ));
            }
            html.push_str("</ul>\n");
        }
        None => html.push_str("<p>No compile time data available.</p>\n"),
    }

    html.push_str("</section>\n");
    html
}

fn ops_per_graph_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"ops-per-graph\">\n<h2>Ops per Graph</h2>\n");

    let graphs = result
        .custom_entry(OPS_PER_GRAPH_KEY)
        .and_then(Value::as_array)
        .filter(|graphs| !graphs.is_empty());

    match graphs {
        Some(graphs) => {
            for (idx, ops) in graphs.iter().enumerate() {
                html.push_str(&format!("<h3>Ops {}</h3>\n<div class=\"stack-trace\">\n", idx + 1));
                for op in ops.as_array().into_iter().flatten() {
                    html.push_str(&format!("<div>{}</div>\n", escaped_value(op)));
                }
                html.push_str("</div>\n");
            }
        }
        None => html.push_str("<p>No operations per graph data available.</p>\n"),
    }

    html.push_str("</section>\n");
    html
}

fn out_guards_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"out-guards\">\n<h2>Out Guards</h2>\n");

    let guards = result
        .custom_entry(OUT_GUARDS_KEY)
        .and_then(Value::as_array)
        .filter(|guards| !guards.is_empty());

    match guards {
        Some(guards) => {
            html.push_str("<table>\n<thead><tr><th>#</th><th>Guard</th></tr></thead>\n<tbody>\n");
            for (idx, guard) in guards.iter().enumerate() {
                html.push_str(&format!(
                    "<tr><td>Guard {}</td><td class=\"stack-trace\">{}</td></tr>\n",
                    idx + 1,
                    escaped_value(guard)
                ));
            }
            html.push_str("</tbody>\n</table>\n");
        }
        None => html.push_str("<p>No out guards data available.</p>\n"),
    }

    html.push_str("</section>\n");
    html
}

fn additional_data_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"additional-data\">\n<h2>Additional Data</h2>\n");

    let entries: Vec<(&String, &Value)> = result
        .additional_data()
        .iter()
        .filter(|(key, _)| key.as_str() != OPS_PER_GRAPH_KEY && key.as_str() != OUT_GUARDS_KEY)
        .collect();

    if entries.is_empty() {
        html.push_str("<p>No additional data available.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr><th>Key</th><th>Value</th></tr></thead>\n<tbody>\n");
        for (key, value) in entries {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                html_escape(key),
                html_escape(&display_value(value))
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</section>\n");
    html
}

fn graphs_section(result: &ExplainResult) -> String {
    let mut html = String::from("<section id=\"graphs\">\n<h2>Graphs</h2>\n");

    match result.graphs().filter(|graphs| !graphs.is_empty()) {
        Some(graphs) => {
            for (idx, graph) in graphs.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"graph-item\">\n<h3>Graph {}</h3>\n<pre class=\"graph-content\">{}</pre>\n</div>\n",
                    idx + 1,
                    html_escape(graph)
                ));
            }
        }
        None => html.push_str("<p>No graph data available.</p>\n"),
    }

    html.push_str("</section>\n");
    html
}

/// Strings keep their entities; anything else is serialized and escaped.
fn escaped_value(value: &Value) -> String {
    match value {
        Value::String(s) => ensure_escaped(s),
        other => html_escape(&other.to_string()),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
