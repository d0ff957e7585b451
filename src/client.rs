//! Synthetic API client
//!
//! Entry point of the crate: validates the tenant, owns the credential
//! headers and hands a [`ConnectionContext`] to every monitor it builds.

use std::sync::Arc;

use serde_json::Value;

use crate::api::connection::validate_tenant;
use crate::api::transport::fetch_error;
use crate::api::types::MonitorList;
use crate::api::{
    BulkUpdateSummary, ConnectionContext, ReqwestTransport, Transport, UpdateResult,
    MONITORS_PATH,
};
use crate::error::{Error, Result};
use crate::filter::MonitorFilter;
use crate::import::SimpleHttpRow;
use crate::monitor::{AnyDraft, AnyMonitor, DraftHttpMonitor, DraftMonitor, MonitorType};
use crate::ClientConfig;

/// Environment variable holding the tenant URL
pub const TENANT_ENV: &str = "DT_TENANT_URL";

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "DT_API_TOKEN";

/// Client for the Synthetic API of one tenant
#[derive(Debug, Clone)]
pub struct SyntheticApi {
    context: ConnectionContext,
}

impl SyntheticApi {
    /// Connect with default settings.
    ///
    /// The token needs the synthetic read and write scopes of API v1 and v2.
    pub fn new(tenant: &str, api_token: &str) -> Result<Self> {
        Self::with_config(tenant, api_token, ClientConfig::default())
    }

    /// Connect with custom HTTP settings
    pub fn with_config(tenant: &str, api_token: &str, config: ClientConfig) -> Result<Self> {
        validate_tenant(tenant)?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(tenant, api_token, Arc::new(transport))
    }

    /// Connect using `DT_TENANT_URL` and `DT_API_TOKEN`
    pub fn from_env() -> Result<Self> {
        let tenant = std::env::var(TENANT_ENV)
            .map_err(|_| Error::Config(format!("{} is not set", TENANT_ENV)))?;
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| Error::Config(format!("{} is not set", TOKEN_ENV)))?;
        Self::new(&tenant, &token)
    }

    /// Connect through a custom transport
    pub fn with_transport(
        tenant: &str,
        api_token: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let context = ConnectionContext::new(tenant, api_token, transport)?;
        tracing::debug!("Synthetic API client for {}", context.tenant());
        Ok(Self { context })
    }

    /// Validated tenant URL
    pub fn tenant(&self) -> &str {
        self.context.tenant()
    }

    /// Connection state shared with the monitors
    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Build a draft monitor of the kind named by the document's `type`
    pub fn new_monitor(&self, document: Value) -> Result<AnyDraft> {
        AnyDraft::new(document, self.context.clone())
    }

    /// Build draft HTTP monitors from bulk import rows, skipping non-HTTP rows
    pub fn new_simple_http_monitors(
        &self,
        rows: &[SimpleHttpRow],
    ) -> Result<Vec<DraftHttpMonitor>> {
        rows.iter()
            .filter(|row| {
                if !row.is_http() {
                    tracing::debug!("Skipping {} row '{}'", row.monitor_type, row.name);
                }
                row.is_http()
            })
            .map(|row| DraftMonitor::new(row.to_document()?, self.context.clone()))
            .collect()
    }

    /// Fetch one monitor, as a summary unless `detailed`
    pub async fn get_monitor(&self, entity_id: &str, detailed: bool) -> Result<AnyMonitor> {
        let response = self.context.get(self.context.monitor_url(entity_id)).await?;
        if !response.is_success() {
            return Err(fetch_error(response));
        }

        let mut monitor = AnyMonitor::from_document(response.json()?, self.context.clone())?;
        if detailed {
            monitor.get_details().await?;
        }
        Ok(monitor)
    }

    /// List monitors matching a filter.
    ///
    /// Entries of monitor types this crate does not model are skipped. With
    /// `detailed` every monitor is fetched individually afterwards.
    pub async fn list_monitors(
        &self,
        filter: &MonitorFilter,
        detailed: bool,
    ) -> Result<Vec<AnyMonitor>> {
        let url = filter.apply(&self.context.url(MONITORS_PATH));
        let response = self.context.get(url).await?;
        if !response.is_success() {
            return Err(fetch_error(response));
        }

        let list: MonitorList = response.json()?;
        let mut monitors = Vec::with_capacity(list.monitors.len());
        for entry in list.monitors {
            match MonitorType::of_document(&entry) {
                Ok(_) => monitors.push(AnyMonitor::from_document(entry, self.context.clone())?),
                Err(Error::UnknownMonitorType(kind)) => {
                    tracing::warn!("Skipping monitor of unsupported type {}", kind);
                }
                Err(e) => return Err(e),
            }
        }

        if detailed {
            for monitor in &mut monitors {
                monitor.get_details().await?;
            }
        }
        tracing::debug!("Listed {} monitors", monitors.len());
        Ok(monitors)
    }

    /// List monitors with a filter given as a JSON mapping.
    ///
    /// The filter is validated before any request is made.
    pub async fn list_monitors_matching(
        &self,
        filter: &Value,
        detailed: bool,
    ) -> Result<Vec<AnyMonitor>> {
        let filter = MonitorFilter::from_value(filter)?;
        self.list_monitors(&filter, detailed).await
    }

    /// Push every monitor, one after another.
    ///
    /// Returns `None` for an empty slice. Rejected updates and requests that
    /// fail outright are collected as failures and the batch goes on; a
    /// failure carries the HTTP status, or 0 when there was none. A monitor
    /// that was never detailed aborts the batch with
    /// [`Error::FailedPrecondition`] before anything is sent.
    pub async fn bulk_update(&self, monitors: &[AnyMonitor]) -> Result<Option<BulkUpdateSummary>> {
        if monitors.is_empty() {
            return Ok(None);
        }
        if let Some(summary) = monitors.iter().find(|m| !m.is_detailed()) {
            return Err(Error::needs_details(&format!(
                "update a script ({})",
                summary.entity_id()
            )));
        }

        let mut results = Vec::with_capacity(monitors.len());
        for monitor in monitors {
            let result = match monitor.update().await {
                Ok(result) => result,
                Err(e) if e.is_precondition() => return Err(e),
                Err(e) => {
                    tracing::warn!("Updating monitor {} failed: {}", monitor.entity_id(), e);
                    UpdateResult {
                        status: e.status().unwrap_or(0),
                        entity_id: monitor.entity_id().to_string(),
                        message: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        let summary = BulkUpdateSummary::from_results(results);
        tracing::info!(
            "Bulk update: {} succeeded, {} failed",
            summary.success_count,
            summary.failure_count
        );
        Ok(Some(summary))
    }
}
