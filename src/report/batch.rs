//! Batches of stored results tagged with the model they came from
//!
//! A batch file is a JSON array. Each element carries a `model_info`
//! object next to the usual result fields:
//!
//! ```json
//! [{
//!   "model_info": {"model_family": "bert", "model_name": "prajjwal1/bert-tiny",
//!                  "model_commit_hash": "6f75de8"},
//!   "graph_count": 2, "graph_break_count": 1, "op_count": 14,
//!   "break_reasons": [{"number": 1, "reason": "...", "user_stack": []}]
//! }]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::explain::ExplainResult;

use super::errors::{ReportError, ReportResult};
use super::json::write_file;

/// Identity of the model a result was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_family: String,
    pub model_name: String,
    pub model_commit_hash: String,
}

/// One stored result with its model identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExplainRecord {
    pub model_info: ModelInfo,
    #[serde(flatten)]
    pub result: ExplainResult,
}

/// Load a batch file. Any record that breaks a result invariant fails
/// the whole load.
pub fn load_batch(path: &Path) -> ReportResult<Vec<ModelExplainRecord>> {
    let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a batch file, creating parent directories.
pub fn write_batch(records: &[ModelExplainRecord], path: &Path) -> ReportResult<()> {
    let content = serde_json::to_string_pretty(records)?;
    write_file(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_batch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("batch.json");
        let batch = json!([{
            "model_info": {
                "model_family": "bert",
                "model_name": "prajjwal1/bert-tiny",
                "model_commit_hash": "6f75de8"
            },
            "graph_count": 2,
            "graph_break_count": 1,
            "op_count": 14,
            "break_reasons": [{"number": 1, "reason": "generic_jump", "user_stack": ["a.py:1"]}],
            "compile_times": {"total_time": 0.0, "details": {"f": [0.5, 0.5]}},
            "additional_data": {"model_name": "bert-tiny"}
        }]);
        fs::write(&path, batch.to_string()).unwrap();

        let records = load_batch(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].model_info.model_family, "bert");
        assert_eq!(records[0].result.graph_break_count(), 1);
        assert_eq!(records[0].result.compile_times().unwrap().total_time(), 1.0);
        assert!(records[0].result.graphs().is_none());
    }

    #[test]
    fn test_load_batch_rejects_bad_numbering() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("batch.json");
        let batch = json!([{
            "model_info": {"model_family": "f", "model_name": "n", "model_commit_hash": "c"},
            "graph_count": 1,
            "graph_break_count": 1,
            "op_count": 0,
            "break_reasons": [{"number": 2, "reason": "r", "user_stack": []}]
        }]);
        fs::write(&path, batch.to_string()).unwrap();

        assert!(matches!(load_batch(&path), Err(ReportError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_batch(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
