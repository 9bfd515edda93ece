//! # Userload - CSV to PostgreSQL bulk user importer
//!
//! Userload ingests delimited user exports, rebuilds nested structure
//! from dot-delimited column names, maps every row onto a fixed
//! relational schema, loads the whole batch in one all-or-nothing
//! transaction, and reports the age distribution of the stored
//! population.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  CSV File │──▶│  Parser  │──▶│ Expander │──▶│  Mapper  │──▶│  Loader  │
//! │ (auto-enc)│   │ (flat kv)│   │ (tree)   │   │ (users)  │   │ (one tx) │
//! └───────────┘   └──────────┘   └──────────┘   └──────────┘   └────┬─────┘
//!                                                                   │ commit
//!                                                             ┌─────▼─────┐
//!                                                             │  Reporter │
//!                                                             │ (buckets) │
//!                                                             └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use userload::{db, import_file};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = db::connect("postgres://localhost/app").await.unwrap();
//!     db::ensure_schema(&pool).await.unwrap();
//!     let summary = import_file(&pool, Path::new("users.csv")).await.unwrap();
//!     println!("Imported {} users", summary.inserted);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (FlatRecord, NestedValue, TargetUser)
//! - [`parser`] - Delimited-text parsing with encoding auto-detection
//! - [`transform`] - Key-path expansion and schema mapping
//! - [`db`] - Pool, schema bootstrap, transactional loader, reporter
//! - [`pipeline`] - End-to-end import orchestration
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Persistence
pub mod db;

// Orchestration
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, ImportError, LoadError, ReportError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    FlatRecord, ImportBatch, ImportRecord, NestedRecord, NestedValue, ParsedRow, TargetUser,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_encoding, parse_bytes, parse_content, parse_file, ParseResult,
    DELIMITER,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{expand_record, map_user, DEFAULT_NAME};

// =============================================================================
// Re-exports - Persistence
// =============================================================================

pub use db::loader::load_batch;
pub use db::report::{age_report, build_report, AgeBucket, AgeReport, ReportRow};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{build_batch, import_bytes, import_file, ImportSummary};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::AppConfig;

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ImportResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
