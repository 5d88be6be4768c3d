//! Configuration file
//!
//! ```json
//! {
//!   "metrics_dir": "metrics",
//!   "prom_file": "compile_breaks.prom",
//!   "log_file": "compile_breaks.log",
//!   "report_dir": "reports"
//! }
//! ```
//!
//! Every field is optional. A missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsConfig;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the metrics files
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: String,

    /// Prometheus text file name inside `metrics_dir`
    #[serde(default = "default_prom_file")]
    pub prom_file: String,

    /// logfmt file name inside `metrics_dir`
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Default directory for HTML reports
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

fn default_metrics_dir() -> String {
    "metrics".to_string()
}
fn default_prom_file() -> String {
    "compile_breaks.prom".to_string()
}
fn default_log_file() -> String {
    "compile_breaks.log".to_string()
}
fn default_report_dir() -> String {
    "reports".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_dir: default_metrics_dir(),
            prom_file: default_prom_file(),
            log_file: default_log_file(),
            report_dir: default_report_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        let path_str = path.display().to_string();
        if path.exists() {
            let config = Self::load(path)?;
            log_event_with_fields(Event::ConfigLoaded, &[("path", path_str.as_str())]);
            Ok(config)
        } else {
            log_event_with_fields(Event::ConfigDefaulted, &[("path", path_str.as_str())]);
            Ok(Self::default())
        }
    }

    fn validate(&self) -> CliResult<()> {
        for (name, value) in [
            ("metrics_dir", &self.metrics_dir),
            ("prom_file", &self.prom_file),
            ("log_file", &self.log_file),
            ("report_dir", &self.report_dir),
        ] {
            if value.trim().is_empty() {
                return Err(CliError::config_error(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    pub fn prom_path(&self) -> PathBuf {
        Path::new(&self.metrics_dir).join(&self.prom_file)
    }

    pub fn log_path(&self) -> PathBuf {
        Path::new(&self.metrics_dir).join(&self.log_file)
    }

    pub fn report_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dynamo_explain".to_string());
        Path::new(&self.report_dir).join(format!("{}.html", stem))
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig::new(self.prom_path(), self.log_path())
    }
}
