//! Monitor metadata and the monitor wire document

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tags::Tags;
use super::MonitorType;

/// Everything in a monitor document besides identity, `enabled`, `type` and
/// the script. Optional fields are written only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manually_assigned_apps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_detection: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_zones: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatically_assigned_apps: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_from: Option<String>,
    /// Browser monitors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_performance_metrics: Option<Value>,
}

/// Monitor document as exchanged with the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonitorDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    #[serde(flatten)]
    pub settings: MonitorSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Value>,
}

impl MonitorDocument {
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_value(self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
