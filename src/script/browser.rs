//! Browser monitor scripts: an ordered list of events

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::events::BrowserEvent;
use super::Script;
use crate::error::Result;
use crate::monitor::MonitorType;

/// Raw script document, events not yet classified
#[derive(Deserialize)]
struct RawBrowserScript {
    #[serde(rename = "type")]
    script_type: String,
    version: String,
    #[serde(default)]
    configuration: Option<Map<String, Value>>,
    #[serde(default)]
    events: Vec<Value>,
}

/// Script of a browser monitor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserScript {
    /// Recorder type, e.g. "clickpath" or "availability"
    #[serde(rename = "type")]
    pub script_type: String,
    pub version: String,
    /// Device, bandwidth and request settings; empty when not given
    pub configuration: Map<String, Value>,
    /// Steps in execution order
    pub events: Vec<BrowserEvent>,
}

impl BrowserScript {
    pub fn new(script_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            script_type: script_type.into(),
            version: version.into(),
            configuration: Map::new(),
            events: Vec::new(),
        }
    }
}

impl Script for BrowserScript {
    const MONITOR_TYPE: MonitorType = MonitorType::Browser;
    const REPORTS_SSL_WARNINGS: bool = false;

    fn from_value(value: Value) -> Result<Self> {
        let raw: RawBrowserScript = serde_json::from_value(value)?;
        let events = raw
            .events
            .into_iter()
            .map(BrowserEvent::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            script_type: raw.script_type,
            version: raw.version,
            configuration: raw.configuration.unwrap_or_default(),
            events,
        })
    }

    fn default_key_performance_metrics() -> Option<Value> {
        Some(serde_json::json!({
            "loadActionKpm": "VISUALLY_COMPLETE",
            "xhrActionKpm": "VISUALLY_COMPLETE"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_events_keep_order() {
        let doc = json!({
            "type": "clickpath",
            "version": "1.0",
            "configuration": {"device": {"deviceName": "Desktop", "orientation": "landscape"}},
            "events": [
                {"type": "navigate", "url": "https://example.com", "description": "open"},
                {"type": "keystrokes", "textValue": "user", "masked": false},
                {"type": "click", "button": 0},
                {"type": "javascript", "javaScript": "api.finish();"}
            ]
        });
        let script = BrowserScript::from_value(doc.clone()).unwrap();
        let kinds: Vec<_> = script.events.iter().map(|e| e.event_type()).collect();
        assert_eq!(kinds, ["navigate", "keystrokes", "click", "javascript"]);
        assert_eq!(script.data().unwrap(), doc);
    }

    #[test]
    fn test_configuration_defaults_empty() {
        let script = BrowserScript::from_value(json!({
            "type": "availability",
            "version": "1.0",
            "events": [{"type": "navigate", "url": "https://example.com"}]
        }))
        .unwrap();
        assert!(script.configuration.is_empty());
        assert_eq!(script.data().unwrap()["configuration"], json!({}));
    }

    #[test]
    fn test_unknown_event_fails_script() {
        let err = BrowserScript::from_value(json!({
            "type": "clickpath",
            "version": "1.0",
            "events": [{"type": "navigate"}, {"type": "hover"}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::UnknownEventType(ref t) if t == "hover"));
    }
}
