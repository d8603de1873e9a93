//! MCP (Model Context Protocol) Module
//!
//! JSON-RPC 2.0 over stdio (default) or stateless HTTP POST.

pub mod content;
pub mod handlers;
pub mod rpc;
pub mod service;
pub mod stdio;
pub mod tools;
pub mod validation;

pub use handlers::config;
pub use service::McpService;
