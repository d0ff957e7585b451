//! HTTP monitor scripts: an ordered list of request steps

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{present, Script};
use crate::error::Result;
use crate::monitor::MonitorType;

/// One request step of an HTTP script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub description: String,
    pub url: String,
    pub method: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<Value>,
    /// Validation rules applied to the response
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub validation: Option<Value>,
    /// Certificate and redirect policy
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub configuration: Option<Value>,
    #[serde(default)]
    pub pre_processing_script: String,
    #[serde(default)]
    pub post_processing_script: String,
}

impl HttpRequest {
    /// Create a request step with no optional fields set
    pub fn new(
        url: impl Into<String>,
        description: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            url: url.into(),
            method: method.into(),
            request_body: None,
            validation: None,
            configuration: None,
            pre_processing_script: String::new(),
            post_processing_script: String::new(),
        }
    }

    /// Build from a request document
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Request document with exactly the fields that are set
    pub fn data(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Optional fields for [`HttpScript::add_request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub request_body: Option<Value>,
    pub validation: Option<Value>,
    pub configuration: Option<Value>,
    pub pre_processing_script: Option<String>,
    pub post_processing_script: Option<String>,
}

impl RequestOptions {
    pub fn request_body(mut self, body: impl Into<Value>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    pub fn validation(mut self, validation: Value) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn configuration(mut self, configuration: Value) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn pre_processing_script(mut self, script: impl Into<String>) -> Self {
        self.pre_processing_script = Some(script.into());
        self
    }

    pub fn post_processing_script(mut self, script: impl Into<String>) -> Self {
        self.post_processing_script = Some(script.into());
        self
    }
}

/// Script of an HTTP monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpScript {
    pub version: String,
    /// Steps in execution order
    pub requests: Vec<HttpRequest>,
}

impl HttpScript {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            requests: Vec::new(),
        }
    }

    /// Append a request step and return it
    pub fn add_request(
        &mut self,
        url: impl Into<String>,
        description: impl Into<String>,
        method: impl Into<String>,
        options: RequestOptions,
    ) -> &mut HttpRequest {
        let mut request = HttpRequest::new(url, description, method);
        request.request_body = options.request_body;
        request.validation = options.validation;
        request.configuration = options.configuration;
        if let Some(script) = options.pre_processing_script {
            request.pre_processing_script = script;
        }
        if let Some(script) = options.post_processing_script {
            request.post_processing_script = script;
        }
        self.requests.push(request);
        let last = self.requests.len() - 1;
        &mut self.requests[last]
    }
}

impl Script for HttpScript {
    const MONITOR_TYPE: MonitorType = MonitorType::Http;
    const REPORTS_SSL_WARNINGS: bool = true;

    fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
