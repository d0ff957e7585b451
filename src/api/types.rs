//! Wire types for the synthetic API endpoints
//!
//! Request and response bodies other than the monitor document itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body returned by the create endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMonitor {
    pub entity_id: String,
}

/// Body returned by the list endpoint.
///
/// Entries stay raw so each one can be classified by its `type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorList {
    #[serde(default)]
    pub monitors: Vec<Value>,
}

/// Outcome of a full-document replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub status: u16,
    pub entity_id: String,
    /// Response body when the status was not 204
    pub message: Option<String>,
}

impl UpdateResult {
    pub fn is_success(&self) -> bool {
        self.status == super::transport::NO_CONTENT
    }
}

/// Results of a bulk update, split by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateSummary {
    pub success_count: usize,
    pub failure_count: usize,
    pub success: Vec<UpdateResult>,
    pub failure: Vec<UpdateResult>,
}

impl BulkUpdateSummary {
    /// Sort results into the success and failure lists
    pub fn from_results(results: impl IntoIterator<Item = UpdateResult>) -> Self {
        let (success, failure): (Vec<_>, Vec<_>) =
            results.into_iter().partition(UpdateResult::is_success);
        Self {
            success_count: success.len(),
            failure_count: failure.len(),
            success,
            failure,
        }
    }
}

/// Execution batch request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub processing_mode: String,
    pub fail_on_performance_issue: bool,
    /// Only sent for HTTP monitors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on_ssl_warning: Option<bool>,
    pub stop_on_problem: bool,
    pub take_screenshots_on_success: bool,
    pub metadata: Map<String, Value>,
    pub monitors: Vec<MonitorExecution>,
}

/// Per-monitor entry of an execution batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorExecution {
    pub monitor_id: String,
    pub execution_count: u32,
    pub repeat_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_script: Option<Value>,
}

/// Execution batch response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionBatch {
    #[serde(default)]
    pub triggered_count: u32,
    #[serde(default)]
    pub triggering_problems_count: u32,
    #[serde(default)]
    pub triggered: Vec<Value>,
    #[serde(default)]
    pub triggering_problems_details: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(status: u16, id: &str) -> UpdateResult {
        UpdateResult {
            status,
            entity_id: id.to_string(),
            message: if status == 204 {
                None
            } else {
                Some("rejected".to_string())
            },
        }
    }

    #[test]
    fn test_bulk_partition() {
        let summary = BulkUpdateSummary::from_results(vec![
            result(204, "A"),
            result(204, "B"),
            result(400, "C"),
        ]);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.failure, vec![result(400, "C")]);
    }

    #[test]
    fn test_other_2xx_is_not_update_success() {
        assert!(!result(200, "A").is_success());
    }

    #[test]
    fn test_execution_request_omits_unset() {
        let request = ExecutionRequest {
            processing_mode: "STANDARD".into(),
            fail_on_performance_issue: false,
            fail_on_ssl_warning: None,
            stop_on_problem: false,
            take_screenshots_on_success: false,
            metadata: Map::new(),
            monitors: vec![MonitorExecution {
                monitor_id: "SYNTHETIC_TEST-1".into(),
                execution_count: 1,
                repeat_mode: "SEQUENTIAL".into(),
                locations: None,
                customized_script: None,
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "processingMode": "STANDARD",
                "failOnPerformanceIssue": false,
                "stopOnProblem": false,
                "takeScreenshotsOnSuccess": false,
                "metadata": {},
                "monitors": [{
                    "monitorId": "SYNTHETIC_TEST-1",
                    "executionCount": 1,
                    "repeatMode": "SEQUENTIAL"
                }]
            })
        );
    }

    #[test]
    fn test_execution_batch_defaults() {
        let batch: ExecutionBatch = serde_json::from_value(json!({"triggeredCount": 1})).unwrap();
        assert_eq!(batch.triggered_count, 1);
        assert!(batch.triggered.is_empty());
    }
}
