//! HTTP API layer.
//!
//! - [`server`] - axum server and route handlers
//! - [`types`] - request/response types
//! - [`logs`] - broadcast logger with SSE streaming

pub mod logs;
pub mod server;
pub mod types;
