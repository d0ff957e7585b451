//! Monitor scripts
//!
//! An HTTP monitor runs a list of requests; a browser monitor replays a list
//! of events. Both kinds implement [`Script`], which is what lets the monitor
//! types be written once for either kind.

pub mod browser;
pub mod events;
pub mod http;

use std::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::monitor::MonitorType;

pub use browser::BrowserScript;
pub use events::{
    BrowserEvent, CookieEvent, InteractionEvent, InteractionKind, JavaScriptEvent,
    KeystrokesEvent, NavigateEvent, SelectOptionEvent,
};
pub use http::{HttpRequest, HttpScript, RequestOptions};

/// Optional field that can also be an explicit `null`.
///
/// `None` is an absent key, `Some(None)` a key set to `null`.
pub type Nullable<T> = Option<Option<T>>;

/// Keep a key that is present in the input as `Some`, even when it is `null`.
///
/// Used with `#[serde(default)]` so an absent key stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A script kind, and the monitor kind it belongs to
pub trait Script: Serialize + Clone + Debug + Send + Sync + Sized + 'static {
    /// `type` of monitors carrying this script
    const MONITOR_TYPE: MonitorType;

    /// Whether execution batches carry `failOnSslWarning`
    const REPORTS_SSL_WARNINGS: bool;

    /// Build from the `script` block of a monitor document
    fn from_value(value: Value) -> Result<Self>;

    /// Script document
    fn data(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// `keyPerformanceMetrics` given to new monitors that leave it out
    fn default_key_performance_metrics() -> Option<Value> {
        None
    }
}
