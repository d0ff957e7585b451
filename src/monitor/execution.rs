//! On-demand execution options

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::types::{ExecutionRequest, MonitorExecution};

/// Overrides for an on-demand execution; unset fields use platform defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteOptions {
    /// Default 1
    pub execution_count: Option<u32>,
    /// Default "SEQUENTIAL"
    pub repeat_mode: Option<String>,
    /// Default "STANDARD"
    pub processing_mode: Option<String>,
    pub fail_on_performance_issue: Option<bool>,
    /// HTTP monitors only
    pub fail_on_ssl_warning: Option<bool>,
    pub stop_on_problem: Option<bool>,
    pub take_screenshots_on_success: Option<bool>,
    pub metadata: Option<Map<String, Value>>,
    /// Run from these locations instead of the configured ones
    pub locations: Option<Vec<String>>,
    pub customized_script: Option<Value>,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execution_count(mut self, count: u32) -> Self {
        self.execution_count = Some(count);
        self
    }

    pub fn repeat_mode(mut self, mode: impl Into<String>) -> Self {
        self.repeat_mode = Some(mode.into());
        self
    }

    pub fn processing_mode(mut self, mode: impl Into<String>) -> Self {
        self.processing_mode = Some(mode.into());
        self
    }

    pub fn fail_on_performance_issue(mut self, fail: bool) -> Self {
        self.fail_on_performance_issue = Some(fail);
        self
    }

    pub fn fail_on_ssl_warning(mut self, fail: bool) -> Self {
        self.fail_on_ssl_warning = Some(fail);
        self
    }

    pub fn stop_on_problem(mut self, stop: bool) -> Self {
        self.stop_on_problem = Some(stop);
        self
    }

    pub fn take_screenshots_on_success(mut self, take: bool) -> Self {
        self.take_screenshots_on_success = Some(take);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn locations(mut self, locations: Vec<String>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn customized_script(mut self, script: Value) -> Self {
        self.customized_script = Some(script);
        self
    }

    /// Batch request for a single monitor
    pub(crate) fn to_request(
        &self,
        monitor_id: &str,
        reports_ssl_warnings: bool,
    ) -> ExecutionRequest {
        ExecutionRequest {
            processing_mode: self
                .processing_mode
                .clone()
                .unwrap_or_else(|| "STANDARD".to_string()),
            fail_on_performance_issue: self.fail_on_performance_issue.unwrap_or(false),
            fail_on_ssl_warning: reports_ssl_warnings
                .then(|| self.fail_on_ssl_warning.unwrap_or(false)),
            stop_on_problem: self.stop_on_problem.unwrap_or(false),
            take_screenshots_on_success: self.take_screenshots_on_success.unwrap_or(false),
            metadata: self.metadata.clone().unwrap_or_default(),
            monitors: vec![MonitorExecution {
                monitor_id: monitor_id.to_string(),
                execution_count: self.execution_count.unwrap_or(1),
                repeat_mode: self
                    .repeat_mode
                    .clone()
                    .unwrap_or_else(|| "SEQUENTIAL".to_string()),
                locations: self.locations.clone(),
                customized_script: self.customized_script.clone(),
            }],
        }
    }
}
