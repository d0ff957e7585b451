//! Draft monitors
//!
//! A monitor configured locally that the platform does not know yet. It has
//! no entity ID until [`DraftMonitor::create`] succeeds.

use serde_json::Value;

use super::materialized::Monitor;
use super::settings::{MonitorDocument, MonitorSettings};
use super::tags::Tags;
use super::{MonitorType, SyntheticMonitor};
use crate::api::types::CreatedMonitor;
use crate::api::{ConnectionContext, HttpResponse, MONITORS_PATH};
use crate::error::{Error, Result};
use crate::script::Script;

/// Result of a create call
#[derive(Debug)]
pub enum CreateOutcome<M> {
    /// The platform accepted the monitor
    Created(M),
    /// The platform answered with a non-success status
    Rejected(HttpResponse),
}

impl<M> CreateOutcome<M> {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }

    /// The created monitor, if any
    pub fn created(self) -> Option<M> {
        match self {
            CreateOutcome::Created(monitor) => Some(monitor),
            CreateOutcome::Rejected(_) => None,
        }
    }

    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> CreateOutcome<N> {
        match self {
            CreateOutcome::Created(monitor) => CreateOutcome::Created(f(monitor)),
            CreateOutcome::Rejected(response) => CreateOutcome::Rejected(response),
        }
    }
}

/// A monitor that exists only in memory
#[derive(Debug, Clone)]
pub struct DraftMonitor<S: Script> {
    pub name: String,
    pub enabled: bool,
    pub script: S,
    pub settings: MonitorSettings,
    context: ConnectionContext,
}

impl<S: Script> DraftMonitor<S> {
    /// Build a draft from a monitor document.
    ///
    /// `name`, `enabled`, `type`, `locations` and `script` are required.
    /// Missing `tags` and `manuallyAssignedApps` become empty lists, and
    /// browser drafts get the standard key performance metrics.
    pub fn new(document: Value, context: ConnectionContext) -> Result<Self> {
        let document = MonitorDocument::from_value(document)?;
        if document.monitor_type != S::MONITOR_TYPE {
            return Err(Error::type_mismatch(
                S::MONITOR_TYPE.as_str(),
                document.monitor_type.as_str(),
            ));
        }
        let script = S::from_value(document.script.ok_or(Error::MissingField("script"))?)?;

        let mut settings = document.settings;
        if settings.locations.is_none() {
            return Err(Error::MissingField("locations"));
        }
        settings.manually_assigned_apps.get_or_insert_with(Vec::new);
        if settings.key_performance_metrics.is_none() {
            settings.key_performance_metrics = S::default_key_performance_metrics();
        }

        Ok(Self {
            name: document.name,
            enabled: document.enabled,
            script,
            settings,
            context,
        })
    }

    /// Add a tag; no-op if the key exists
    pub fn add_tag(&mut self, key: &str, value: Option<&str>) {
        self.settings.tags.add(key, value);
    }

    /// Remove every tag with this key
    pub fn remove_tag(&mut self, key: &str) {
        self.settings.tags.remove(key);
    }

    /// Monitor document to send to the create endpoint
    pub fn data(&self) -> Result<Value> {
        MonitorDocument {
            name: self.name.clone(),
            entity_id: None,
            enabled: self.enabled,
            monitor_type: S::MONITOR_TYPE,
            settings: self.settings.clone(),
            script: Some(self.script.data()?),
        }
        .into_value()
    }

    /// Create the monitor on the platform.
    ///
    /// The draft is left untouched either way, so a rejected draft can be
    /// fixed and sent again.
    pub async fn create(&self) -> Result<CreateOutcome<Monitor<S>>> {
        let url = self.context.url(MONITORS_PATH);
        let response = self.context.post(url, &self.data()?).await?;
        if !response.is_success() {
            tracing::warn!(
                "Creating monitor '{}' failed with status {}",
                self.name,
                response.status
            );
            return Ok(CreateOutcome::Rejected(response));
        }

        let created: CreatedMonitor = response.json()?;
        tracing::info!(
            "Created {} monitor '{}' as {}",
            S::MONITOR_TYPE,
            self.name,
            created.entity_id
        );

        Ok(CreateOutcome::Created(Monitor::from_parts(
            self.name.clone(),
            created.entity_id,
            self.enabled,
            Some(self.script.clone()),
            self.settings.clone(),
            self.context.clone(),
        )))
    }
}

impl<S: Script> SyntheticMonitor for DraftMonitor<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn monitor_type(&self) -> MonitorType {
        S::MONITOR_TYPE
    }

    fn tags(&self) -> &Tags {
        &self.settings.tags
    }

    fn data(&self) -> Result<Value> {
        DraftMonitor::data(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::transport::MockTransport;
    use crate::api::Method;
    use crate::script::{BrowserScript, HttpScript};

    fn context(transport: MockTransport) -> ConnectionContext {
        ConnectionContext::new("https://tenant.example.com", "token", Arc::new(transport)).unwrap()
    }

    fn http_document() -> Value {
        json!({
            "name": "shop home",
            "enabled": true,
            "type": "HTTP",
            "frequencyMin": 5,
            "locations": ["GEOLOCATION-1"],
            "script": {
                "version": "1.0",
                "requests": [{
                    "description": "home",
                    "url": "https://shop.example.com",
                    "method": "GET",
                    "preProcessingScript": "",
                    "postProcessingScript": ""
                }]
            }
        })
    }

    #[test]
    fn test_http_draft_defaults() {
        let draft = DraftMonitor::<HttpScript>::new(http_document(), context(MockTransport::new()))
            .unwrap();
        let data = draft.data().unwrap();
        assert_eq!(data["tags"], json!([]));
        assert_eq!(data["manuallyAssignedApps"], json!([]));
        assert!(data.get("keyPerformanceMetrics").is_none());
        assert!(data.get("entityId").is_none());
        assert_eq!(data["script"], http_document()["script"]);
        assert_eq!(data["frequencyMin"], 5);
    }

    #[test]
    fn test_browser_draft_defaults() {
        let draft = DraftMonitor::<BrowserScript>::new(
            json!({
                "name": "login",
                "enabled": false,
                "type": "BROWSER",
                "locations": ["GEOLOCATION-1"],
                "tags": [{"key": "team", "value": "web"}],
                "script": {
                    "type": "clickpath",
                    "version": "1.0",
                    "events": [{"type": "navigate", "url": "https://example.com"}]
                }
            }),
            context(MockTransport::new()),
        )
        .unwrap();
        let data = draft.data().unwrap();
        assert_eq!(
            data["keyPerformanceMetrics"],
            json!({"loadActionKpm": "VISUALLY_COMPLETE", "xhrActionKpm": "VISUALLY_COMPLETE"})
        );
        assert_eq!(data["script"]["configuration"], json!({}));
        assert!(data.get("frequencyMin").is_none());
        assert!(draft.has_tag("team", Some("web")));
    }

    #[test]
    fn test_type_mismatch_and_missing_fields() {
        let err = DraftMonitor::<BrowserScript>::new(http_document(), context(MockTransport::new()))
            .unwrap_err();
        assert!(matches!(err, Error::MonitorTypeMismatch { .. }));

        let mut doc = http_document();
        doc.as_object_mut().unwrap().remove("locations");
        let err = DraftMonitor::<HttpScript>::new(doc, context(MockTransport::new())).unwrap_err();
        assert!(matches!(err, Error::MissingField("locations")));
    }

    #[test]
    fn test_draft_tags() {
        let mut draft =
            DraftMonitor::<HttpScript>::new(http_document(), context(MockTransport::new()))
                .unwrap();
        draft.add_tag("env", Some("prod"));
        draft.add_tag("env", Some("dev"));
        draft.add_tag("critical", None);
        assert_eq!(
            draft.data().unwrap()["tags"],
            json!([{"key": "env", "value": "prod"}, {"key": "critical"}])
        );
        draft.remove_tag("env");
        assert!(!draft.has_tag("env", None));
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Post
                    && req.url == "https://tenant.example.com/api/v1/synthetic/monitors"
                    && req.body.as_ref().map(|b| b["name"] == "shop home") == Some(true)
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"entityId":"HTTP_CHECK-99"}"#)));

        let draft = DraftMonitor::<HttpScript>::new(http_document(), context(transport)).unwrap();
        let monitor = draft.create().await.unwrap().created().unwrap();
        assert_eq!(monitor.entity_id(), "HTTP_CHECK-99");
        assert_eq!(monitor.name(), "shop home");
        assert!(monitor.is_detailed());
        assert_eq!(monitor.data().unwrap()["entityId"], "HTTP_CHECK-99");
    }

    #[tokio::test]
    async fn test_create_rejected_returns_raw_response() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(400, r#"{"error":{"code":400}}"#)));

        let draft = DraftMonitor::<HttpScript>::new(http_document(), context(transport)).unwrap();
        match draft.create().await.unwrap() {
            CreateOutcome::Rejected(response) => assert_eq!(response.status, 400),
            CreateOutcome::Created(_) => panic!("expected rejection"),
        }
    }
}
