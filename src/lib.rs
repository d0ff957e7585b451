//! # dtsynthetic
//!
//! Client for the Dynatrace Synthetic monitoring API.
//!
//! Fetch, create, edit and trigger HTTP and browser monitors as typed values
//! instead of raw JSON.
//!
//! ## Features
//!
//! - **Typed scripts** - HTTP requests and browser events with exact JSON round trips
//! - **Lifecycle checks** - summary monitors refuse edits until details are fetched
//! - **On-demand execution** - disabled monitors are enabled for the run and disabled again
//! - **Bulk operations** - sequential bulk update and spreadsheet row import
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dtsynthetic::{ExecuteOptions, MonitorFilter, SyntheticApi};
//!
//! #[tokio::main]
//! async fn main() -> dtsynthetic::Result<()> {
//!     let api = SyntheticApi::new("https://abc123.live.dynatrace.com", "dt0c01.TOKEN")?;
//!
//!     // Detailed monitors tagged env:prod
//!     let filter = MonitorFilter::new().tag_value("env", "prod");
//!     let mut monitors = api.list_monitors(&filter, true).await?;
//!
//!     for monitor in &mut monitors {
//!         monitor.change_tag("owner", Some("web-team"));
//!         monitor.update().await?;
//!     }
//!
//!     // Trigger one run, even if the monitor is disabled
//!     if let Some(monitor) = monitors.first_mut() {
//!         let batch = monitor.execute(&ExecuteOptions::default()).await?;
//!         println!("triggered {}", batch.triggered_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use dtsynthetic::{ClientConfig, SyntheticApi};
//!
//! # fn main() -> dtsynthetic::Result<()> {
//! let config = ClientConfig {
//!     request_timeout: Duration::from_secs(60),
//!     user_agent: Some("monitor-sync/1.0".into()),
//!     ..Default::default()
//! };
//!
//! let tenant = "https://abc123.live.dynatrace.com";
//! let api = SyntheticApi::with_config(tenant, "dt0c01.TOKEN", config)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod filter;
pub mod import;
pub mod monitor;
pub mod script;

use std::time::Duration;

// Re-exports
pub use api::{BulkUpdateSummary, ExecutionBatch, UpdateResult};
pub use client::SyntheticApi;
pub use error::{Error, Result};
pub use filter::{MonitorFilter, TagFilter};
pub use import::SimpleHttpRow;
pub use monitor::{
    AnyDraft, AnyMonitor, BrowserMonitor, CreateOutcome, DraftBrowserMonitor, DraftHttpMonitor,
    DraftMonitor, ExecuteOptions, HttpMonitor, Monitor, MonitorSettings, MonitorType,
    SyntheticMonitor, Tag, Tags,
};
pub use script::{BrowserEvent, BrowserScript, HttpRequest, HttpScript, Script};

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Custom user agent (None = reqwest default)
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Short timeouts for interactive tools
    pub fn quick() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
            user_agent: None,
        }
    }

    /// Long request timeout for bulk jobs on large tenants
    pub fn patient() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            ..Default::default()
        }
    }
}
