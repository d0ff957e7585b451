//! Synthetic monitors
//!
//! Monitors come in two kinds (HTTP and browser) and two lifecycle stages:
//! [`DraftMonitor`] before creation and [`Monitor`] once the platform has
//! assigned an entity ID. The kind is a type parameter, so
//! `Monitor<HttpScript>` and `Monitor<BrowserScript>` share one
//! implementation. [`AnyMonitor`] and [`AnyDraft`] hold either kind when it
//! is only known at runtime.

pub mod draft;
pub mod execution;
pub mod materialized;
pub mod settings;
pub mod tags;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::{ExecutionBatch, UpdateResult};
use crate::api::ConnectionContext;
use crate::error::{Error, Result};
use crate::script::{BrowserScript, HttpScript};

pub use draft::{CreateOutcome, DraftMonitor};
pub use execution::ExecuteOptions;
pub use materialized::Monitor;
pub use settings::MonitorSettings;
pub use tags::{Tag, Tags};

pub type DraftHttpMonitor = DraftMonitor<HttpScript>;
pub type DraftBrowserMonitor = DraftMonitor<BrowserScript>;
pub type HttpMonitor = Monitor<HttpScript>;
pub type BrowserMonitor = Monitor<BrowserScript>;

/// The `type` field of a monitor document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorType {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "BROWSER")]
    Browser,
}

impl MonitorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorType::Http => "HTTP",
            MonitorType::Browser => "BROWSER",
        }
    }

    /// Read the `type` field of a raw monitor document
    pub fn of_document(document: &Value) -> Result<Self> {
        match document.get("type").and_then(Value::as_str) {
            Some("HTTP") => Ok(MonitorType::Http),
            Some("BROWSER") => Ok(MonitorType::Browser),
            Some(other) => Err(Error::UnknownMonitorType(other.to_string())),
            None => Err(Error::MissingField("type")),
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every monitor offers regardless of kind or stage
pub trait SyntheticMonitor {
    fn name(&self) -> &str;

    fn monitor_type(&self) -> MonitorType;

    fn tags(&self) -> &Tags;

    /// Monitor document as the API expects it
    fn data(&self) -> Result<Value>;

    /// Tag with this key exists, and carries `value` when one is given
    fn has_tag(&self, key: &str, value: Option<&str>) -> bool {
        self.tags().contains(key, value)
    }
}

/// A materialized monitor of either kind
#[derive(Debug, Clone)]
pub enum AnyMonitor {
    Http(HttpMonitor),
    Browser(BrowserMonitor),
}

/// Forward a call to the monitor inside either variant
macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyMonitor::Http($m) => $body,
            AnyMonitor::Browser($m) => $body,
        }
    };
}

impl AnyMonitor {
    /// Classify a summary document by its `type`
    pub fn from_document(document: Value, context: ConnectionContext) -> Result<Self> {
        match MonitorType::of_document(&document)? {
            MonitorType::Http => Ok(AnyMonitor::Http(Monitor::from_document(document, context)?)),
            MonitorType::Browser => Ok(AnyMonitor::Browser(Monitor::from_document(
                document, context,
            )?)),
        }
    }

    pub fn entity_id(&self) -> &str {
        dispatch!(self, m => m.entity_id())
    }

    pub fn is_detailed(&self) -> bool {
        dispatch!(self, m => m.is_detailed())
    }

    pub fn is_enabled(&self) -> bool {
        dispatch!(self, m => m.enabled)
    }

    pub fn settings(&self) -> &MonitorSettings {
        dispatch!(self, m => &m.settings)
    }

    pub fn settings_mut(&mut self) -> &mut MonitorSettings {
        dispatch!(self, m => &mut m.settings)
    }

    pub async fn get_details(&mut self) -> Result<()> {
        dispatch!(self, m => m.get_details().await)
    }

    pub async fn update(&self) -> Result<UpdateResult> {
        dispatch!(self, m => m.update().await)
    }

    pub async fn enable(&mut self) -> Result<UpdateResult> {
        dispatch!(self, m => m.enable().await)
    }

    pub async fn disable(&mut self) -> Result<UpdateResult> {
        dispatch!(self, m => m.disable().await)
    }

    pub async fn execute(&mut self, options: &ExecuteOptions) -> Result<ExecutionBatch> {
        dispatch!(self, m => m.execute(options).await)
    }

    pub fn add_tag(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        dispatch!(self, m => m.add_tag(key, value))
    }

    pub fn remove_tag(&mut self, key: &str) -> Result<()> {
        dispatch!(self, m => m.remove_tag(key))
    }

    pub async fn add_tag_and_update(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<UpdateResult> {
        dispatch!(self, m => m.add_tag_and_update(key, value).await)
    }

    pub async fn remove_tag_and_update(&mut self, key: &str) -> Result<UpdateResult> {
        dispatch!(self, m => m.remove_tag_and_update(key).await)
    }

    pub fn change_tag(&mut self, key: &str, value: Option<&str>) -> bool {
        dispatch!(self, m => m.change_tag(key, value))
    }

    pub fn as_http(&self) -> Option<&HttpMonitor> {
        match self {
            AnyMonitor::Http(m) => Some(m),
            AnyMonitor::Browser(_) => None,
        }
    }

    pub fn as_browser(&self) -> Option<&BrowserMonitor> {
        match self {
            AnyMonitor::Browser(m) => Some(m),
            AnyMonitor::Http(_) => None,
        }
    }

    pub fn as_http_mut(&mut self) -> Option<&mut HttpMonitor> {
        match self {
            AnyMonitor::Http(m) => Some(m),
            AnyMonitor::Browser(_) => None,
        }
    }

    pub fn as_browser_mut(&mut self) -> Option<&mut BrowserMonitor> {
        match self {
            AnyMonitor::Browser(m) => Some(m),
            AnyMonitor::Http(_) => None,
        }
    }
}

impl SyntheticMonitor for AnyMonitor {
    fn name(&self) -> &str {
        dispatch!(self, m => m.name())
    }

    fn monitor_type(&self) -> MonitorType {
        match self {
            AnyMonitor::Http(_) => MonitorType::Http,
            AnyMonitor::Browser(_) => MonitorType::Browser,
        }
    }

    fn tags(&self) -> &Tags {
        dispatch!(self, m => m.tags())
    }

    fn data(&self) -> Result<Value> {
        dispatch!(self, m => m.data())
    }
}

/// A draft monitor of either kind
#[derive(Debug, Clone)]
pub enum AnyDraft {
    Http(DraftHttpMonitor),
    Browser(DraftBrowserMonitor),
}

impl AnyDraft {
    /// Build a draft of the kind named by the document's `type`
    pub fn new(document: Value, context: ConnectionContext) -> Result<Self> {
        match MonitorType::of_document(&document)? {
            MonitorType::Http => Ok(AnyDraft::Http(DraftMonitor::new(document, context)?)),
            MonitorType::Browser => Ok(AnyDraft::Browser(DraftMonitor::new(document, context)?)),
        }
    }

    pub fn add_tag(&mut self, key: &str, value: Option<&str>) {
        match self {
            AnyDraft::Http(d) => d.add_tag(key, value),
            AnyDraft::Browser(d) => d.add_tag(key, value),
        }
    }

    pub fn remove_tag(&mut self, key: &str) {
        match self {
            AnyDraft::Http(d) => d.remove_tag(key),
            AnyDraft::Browser(d) => d.remove_tag(key),
        }
    }

    pub async fn create(&self) -> Result<CreateOutcome<AnyMonitor>> {
        match self {
            AnyDraft::Http(d) => Ok(d.create().await?.map(AnyMonitor::Http)),
            AnyDraft::Browser(d) => Ok(d.create().await?.map(AnyMonitor::Browser)),
        }
    }
}

impl SyntheticMonitor for AnyDraft {
    fn name(&self) -> &str {
        match self {
            AnyDraft::Http(d) => &d.name,
            AnyDraft::Browser(d) => &d.name,
        }
    }

    fn monitor_type(&self) -> MonitorType {
        match self {
            AnyDraft::Http(_) => MonitorType::Http,
            AnyDraft::Browser(_) => MonitorType::Browser,
        }
    }

    fn tags(&self) -> &Tags {
        match self {
            AnyDraft::Http(d) => &d.settings.tags,
            AnyDraft::Browser(d) => &d.settings.tags,
        }
    }

    fn data(&self) -> Result<Value> {
        match self {
            AnyDraft::Http(d) => d.data(),
            AnyDraft::Browser(d) => d.data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::transport::MockTransport;

    fn context() -> ConnectionContext {
        ConnectionContext::new("https://tenant.example.com", "token", Arc::new(MockTransport::new()))
            .unwrap()
    }

    #[test]
    fn test_monitor_type_of_document() {
        assert_eq!(
            MonitorType::of_document(&json!({"type": "HTTP"})).unwrap(),
            MonitorType::Http
        );
        assert_eq!(
            MonitorType::of_document(&json!({"type": "BROWSER"})).unwrap(),
            MonitorType::Browser
        );
        assert!(matches!(
            MonitorType::of_document(&json!({"type": "MULTI_PROTOCOL"})),
            Err(Error::UnknownMonitorType(_))
        ));
        assert!(matches!(
            MonitorType::of_document(&json!({})),
            Err(Error::MissingField("type"))
        ));
    }

    #[test]
    fn test_any_monitor_classifies() {
        let monitor = AnyMonitor::from_document(
            json!({"name": "login", "entityId": "SYNTHETIC_TEST-1", "enabled": false, "type": "BROWSER"}),
            context(),
        )
        .unwrap();
        assert_eq!(monitor.monitor_type(), MonitorType::Browser);
        assert_eq!(monitor.entity_id(), "SYNTHETIC_TEST-1");
        assert!(!monitor.is_enabled());
        assert!(monitor.as_browser().is_some());
        assert!(monitor.as_http().is_none());
    }

    #[test]
    fn test_any_draft_dispatch() {
        let draft = AnyDraft::new(
            json!({
                "name": "api health",
                "enabled": true,
                "type": "HTTP",
                "frequencyMin": 1,
                "locations": ["GEOLOCATION-1"],
                "script": {"version": "1.0", "requests": []}
            }),
            context(),
        )
        .unwrap();
        assert_eq!(draft.monitor_type(), MonitorType::Http);
        assert_eq!(draft.name(), "api health");
        assert_eq!(draft.data().unwrap()["type"], "HTTP");
    }
}
