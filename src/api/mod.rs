//! Synthetic API plumbing: transport seam, connection context, wire types

pub mod connection;
pub mod transport;
pub mod types;

pub use connection::{ConnectionContext, EXECUTIONS_BATCH_PATH, MONITORS_PATH};
pub use transport::{ApiRequest, HttpResponse, Method, ReqwestTransport, Transport, NO_CONTENT};
pub use types::{
    BulkUpdateSummary, ExecutionBatch, ExecutionRequest, MonitorExecution, UpdateResult,
};
