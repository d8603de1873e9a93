//! MCP Tools module - defines tools exposed via JSON-RPC.
//!
//! Each tool module provides:
//! - Tool descriptor (name, description, input schema)
//! - Argument parsing and validation
//! - Execution against `AppState` and a serializable response

pub mod execute_sql;
pub mod income;
pub mod location;
pub mod population;
pub mod registry;
pub mod target_customers;
pub mod timing;

pub use registry::{ToolDescriptor, ToolRegistry};

use thiserror::Error;

use crate::db::StoreError;

/// Failures surfaced to the caller as `isError` tool results.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    NoData(String),
}
