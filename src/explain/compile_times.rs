//! Compile-time table parsing
//!
//! The diagnostic renders compile times as:
//!
//! ```text
//! TorchDynamo compilation metrics:
//! Function, Runtimes (s)
//! _compile.compile_inner, 0.0451, 0.0102
//! OutputGraph.call_user_compiler, 0.0213
//! ```
//!
//! Parsing is best-effort: a line with fewer than two fields or a
//! non-numeric duration is dropped whole and the next line is tried.
//! `nan` and `inf` count as non-numeric.

use std::collections::BTreeMap;

use super::result::CompileTimeSummary;

/// Number of header lines preceding the data rows.
pub const HEADER_LINES: usize = 2;

/// Parse a compile-time table into a summary.
pub fn parse_compile_times(table: &str) -> CompileTimeSummary {
    let mut details: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for line in table.split('\n').skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((name, durations)) = parse_line(line) {
            // repeated names accumulate so the total stays the sum of details
            details.entry(name).or_default().extend(durations);
        }
    }

    CompileTimeSummary::from_details(details)
}

fn parse_line(line: &str) -> Option<(String, Vec<f64>)> {
    let mut fields = line.split(',');
    let name = fields.next()?.trim().to_string();

    let durations = fields
        .map(|field| field.trim().parse::<f64>().ok().filter(|t| t.is_finite()))
        .collect::<Option<Vec<f64>>>()?;

    if durations.is_empty() {
        return None;
    }
    Some((name, durations))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "TorchDynamo compilation metrics:\nFunction, Runtimes (s)\n";

    #[test]
    fn test_parses_rows_after_header() {
        let summary = parse_compile_times(&format!("{}f,1.0,2.0\ng,3.0", HEADER));
        assert_eq!(summary.total_time(), 6.0);
        assert_eq!(summary.durations("f"), Some(&[1.0, 2.0][..]));
        assert_eq!(summary.durations("g"), Some(&[3.0][..]));
        assert_eq!(summary.details().len(), 2);
    }

    #[test]
    fn test_line_without_comma_skipped() {
        let summary = parse_compile_times(&format!("{}badline\nf, 0.5", HEADER));
        assert_eq!(summary.total_time(), 0.5);
        assert_eq!(summary.details().len(), 1);
    }

    #[test]
    fn test_non_numeric_duration_skips_whole_line() {
        let summary = parse_compile_times(&format!("{}f,1.0,abc\ng,2.0", HEADER));
        assert!(summary.durations("f").is_none());
        assert_eq!(summary.total_time(), 2.0);
    }

    #[test]
    fn test_trailing_comma_skips_line() {
        let summary = parse_compile_times(&format!("{}f,1.0,\n", HEADER));
        assert!(summary.details().is_empty());
    }

    #[test]
    fn test_header_only() {
        let summary = parse_compile_times(HEADER);
        assert!(summary.details().is_empty());
        assert_eq!(summary.total_time(), 0.0);
    }

    #[test]
    fn test_fewer_than_header_lines() {
        let summary = parse_compile_times("only one line");
        assert!(summary.details().is_empty());
    }

    #[test]
    fn test_header_rows_never_parsed() {
        let summary = parse_compile_times("a,1.0\nb,2.0\nc,4.0");
        assert_eq!(summary.total_time(), 4.0);
        assert!(summary.durations("a").is_none());
    }

    #[test]
    fn test_repeated_function_accumulates() {
        let summary = parse_compile_times(&format!("{}f,1.0\nf,2.5", HEADER));
        assert_eq!(summary.durations("f"), Some(&[1.0, 2.5][..]));
        assert_eq!(summary.total_time(), 3.5);
    }

    #[test]
    fn test_blank_and_whitespace_lines_ignored() {
        let summary = parse_compile_times(&format!("{}\n   \n f , 0.25 \n", HEADER));
        assert_eq!(summary.durations("f"), Some(&[0.25][..]));
    }

    #[test]
    fn test_non_finite_duration_skips_line() {
        let summary = parse_compile_times(&format!("{}f,nan\ng,1.0\nh,inf\nk,0.5,-infinity", HEADER));
        assert_eq!(summary.details().len(), 1);
        assert_eq!(summary.total_time(), 1.0);

        let json = serde_json::to_string(&summary).unwrap();
        let back: CompileTimeSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
