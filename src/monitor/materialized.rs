//! Materialized monitors
//!
//! A monitor the platform knows, identified by its entity ID. Monitors built
//! from a list or get response are summaries; [`Monitor::get_details`] loads
//! the full configuration, which every full-document update needs.

use serde_json::Value;

use super::execution::ExecuteOptions;
use super::settings::{MonitorDocument, MonitorSettings};
use super::tags::Tags;
use super::{MonitorType, SyntheticMonitor};
use crate::api::transport::fetch_error;
use crate::api::types::{ExecutionBatch, UpdateResult};
use crate::api::{ConnectionContext, HttpResponse, EXECUTIONS_BATCH_PATH};
use crate::error::{Error, Result};
use crate::script::Script;

/// A monitor with a platform identity
#[derive(Debug, Clone)]
pub struct Monitor<S: Script> {
    name: String,
    entity_id: String,
    pub enabled: bool,
    /// Only known once details were fetched
    pub script: Option<S>,
    pub settings: MonitorSettings,
    detailed: bool,
    context: ConnectionContext,
}

impl<S: Script> Monitor<S> {
    /// Build a summary monitor from a list or get response entry
    pub fn from_document(document: Value, context: ConnectionContext) -> Result<Self> {
        let document = MonitorDocument::from_value(document)?;
        if document.monitor_type != S::MONITOR_TYPE {
            return Err(Error::type_mismatch(
                S::MONITOR_TYPE.as_str(),
                document.monitor_type.as_str(),
            ));
        }
        let entity_id = document.entity_id.ok_or(Error::MissingField("entityId"))?;
        let script = document.script.map(S::from_value).transpose()?;

        Ok(Self {
            name: document.name,
            entity_id,
            enabled: document.enabled,
            script,
            settings: document.settings,
            detailed: false,
            context,
        })
    }

    /// A detailed monitor from state already known in full
    pub(crate) fn from_parts(
        name: String,
        entity_id: String,
        enabled: bool,
        script: Option<S>,
        settings: MonitorSettings,
        context: ConnectionContext,
    ) -> Self {
        Self {
            name,
            entity_id,
            enabled,
            script,
            settings,
            detailed: true,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Whether the full configuration has been loaded
    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    pub fn tags(&self) -> &Tags {
        &self.settings.tags
    }

    fn require_details(&self, action: &str) -> Result<()> {
        if !self.detailed {
            return Err(Error::needs_details(action));
        }
        Ok(())
    }

    fn require_script(&self, action: &str) -> Result<()> {
        self.require_details(action)?;
        if self.script.is_none() {
            return Err(Error::needs_details(action));
        }
        Ok(())
    }

    /// Fetch the full configuration and mark the monitor detailed.
    ///
    /// Calling it again refetches.
    pub async fn get_details(&mut self) -> Result<()> {
        let response = self.context.get(self.context.monitor_url(&self.entity_id)).await?;
        if !response.is_success() {
            return Err(fetch_error(response));
        }

        let document = MonitorDocument::from_value(response.json()?)?;
        let script = document.script.ok_or(Error::MissingField("script"))?;
        self.script = Some(S::from_value(script)?);
        self.settings = document.settings;
        self.detailed = true;
        tracing::debug!("Loaded details of {}", self.entity_id);
        Ok(())
    }

    /// Replace the monitor on the platform with the local state.
    ///
    /// Only 204 counts as success; any other status comes back in the result
    /// with the response body as message.
    pub async fn update(&self) -> Result<UpdateResult> {
        self.require_details("update a script")?;
        let url = self.context.monitor_url(&self.entity_id);
        let response = self.context.put(url, &self.data()?).await?;
        Ok(self.update_result(response))
    }

    fn update_result(&self, response: HttpResponse) -> UpdateResult {
        if response.is_no_content() {
            tracing::info!("Updated monitor {}", self.entity_id);
            UpdateResult {
                status: response.status,
                entity_id: self.entity_id.clone(),
                message: None,
            }
        } else {
            tracing::warn!(
                "Updating monitor {} failed with status {}",
                self.entity_id,
                response.status
            );
            UpdateResult {
                status: response.status,
                entity_id: self.entity_id.clone(),
                message: Some(response.body),
            }
        }
    }

    /// Enable the monitor and push the change
    pub async fn enable(&mut self) -> Result<UpdateResult> {
        self.set_enabled(true).await
    }

    /// Disable the monitor and push the change
    pub async fn disable(&mut self) -> Result<UpdateResult> {
        self.set_enabled(false).await
    }

    /// The local flag keeps its old value unless the platform accepts the update
    async fn set_enabled(&mut self, enabled: bool) -> Result<UpdateResult> {
        self.require_script("edit a script")?;
        let previous = self.enabled;
        self.enabled = enabled;
        let result = self.update().await;
        if !matches!(result, Ok(ref r) if r.is_success()) {
            self.enabled = previous;
        }
        result
    }

    /// Add a tag locally; no-op if the key exists. Push with [`Monitor::update`].
    pub fn add_tag(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        self.require_details("edit a script")?;
        self.settings.tags.add(key, value);
        Ok(())
    }

    /// Remove every tag with this key locally
    pub fn remove_tag(&mut self, key: &str) -> Result<()> {
        self.require_details("edit a script")?;
        self.settings.tags.remove(key);
        Ok(())
    }

    /// [`Monitor::add_tag`] followed by [`Monitor::update`]
    pub async fn add_tag_and_update(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<UpdateResult> {
        self.add_tag(key, value)?;
        self.update().await
    }

    /// [`Monitor::remove_tag`] followed by [`Monitor::update`]
    pub async fn remove_tag_and_update(&mut self, key: &str) -> Result<UpdateResult> {
        self.remove_tag(key)?;
        self.update().await
    }

    /// Change the value of an existing tag; returns false if the key is absent
    pub fn change_tag(&mut self, key: &str, value: Option<&str>) -> bool {
        self.settings.tags.set_value(key, value)
    }

    pub fn has_tag(&self, key: &str, value: Option<&str>) -> bool {
        self.settings.tags.contains(key, value)
    }

    /// Run the monitor on demand.
    ///
    /// A disabled monitor is enabled for the run and disabled again
    /// afterwards, each through a separate update. If the execution request
    /// itself cannot be sent the error is returned before disabling.
    pub async fn execute(&mut self, options: &ExecuteOptions) -> Result<ExecutionBatch> {
        let request = options.to_request(&self.entity_id, S::REPORTS_SSL_WARNINGS);
        let url = self.context.url(EXECUTIONS_BATCH_PATH);

        if self.enabled {
            let response = self.context.post(url, &request).await?;
            return self.execution_result(response);
        }

        tracing::info!("Enabling {} for an on-demand execution", self.entity_id);
        let enabled = self.enable().await?;
        if !enabled.is_success() {
            tracing::warn!(
                "Enabling {} before execution returned status {}",
                self.entity_id,
                enabled.status
            );
        }

        let response = self.context.post(url, &request).await?;

        let disabled = self.disable().await?;
        if !disabled.is_success() {
            tracing::warn!(
                "Disabling {} after execution returned status {}",
                self.entity_id,
                disabled.status
            );
        }
        self.execution_result(response)
    }

    fn execution_result(&self, response: HttpResponse) -> Result<ExecutionBatch> {
        if !response.is_success() {
            return Err(Error::Execution {
                status: response.status,
                body: response.body,
            });
        }
        let batch: ExecutionBatch = response.json()?;
        tracing::info!(
            "Triggered {} execution(s) of {}",
            batch.triggered_count,
            self.entity_id
        );
        Ok(batch)
    }

    /// Monitor document, identity included
    pub fn data(&self) -> Result<Value> {
        MonitorDocument {
            name: self.name.clone(),
            entity_id: Some(self.entity_id.clone()),
            enabled: self.enabled,
            monitor_type: S::MONITOR_TYPE,
            settings: self.settings.clone(),
            script: self.script.as_ref().map(Script::data).transpose()?,
        }
        .into_value()
    }
}

impl<S: Script> SyntheticMonitor for Monitor<S> {
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
        Monitor::data(self)
    }
}
