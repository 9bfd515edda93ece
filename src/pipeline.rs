//! High-level import pipeline: parse, expand, map, load, report.
//!
//! This module wires the stages together in the order the import
//! contract requires:
//!
//! 1. Parse the source into flat records (rejecting empty sources
//!    before any transaction opens).
//! 2. Expand dot-delimited keys into nested trees and map each tree
//!    onto the persisted row shape. Both steps are total; bad data
//!    degrades to defaults here, it never errors.
//! 3. Load the whole batch inside one transaction, all-or-nothing.
//! 4. After a successful commit, compute and log the age distribution
//!    report. A report failure is logged and swallowed: the import has
//!    already succeeded.
//!
//! Records are processed strictly in source order; the ordering only
//! matters for the "which row failed" diagnostics, not for the final
//! state.

use std::path::Path;

use serde::Serialize;
use sqlx::PgPool;

use crate::api::logs::{log_error, log_info, log_success};
use crate::db::{loader::load_batch, report::age_report};
use crate::error::ImportResult;
use crate::models::{ImportBatch, ImportRecord};
use crate::parser::{parse_bytes, parse_file, ParseResult};
use crate::transform::{expand_record, map_user};

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Rows inserted (the full batch; never partial).
    pub inserted: u64,
    /// Detected source encoding.
    pub encoding: String,
}

/// Import a CSV file into the `users` table.
pub async fn import_file(pool: &PgPool, path: &Path) -> ImportResult<ImportSummary> {
    log_info(format!("Reading CSV file: {}", path.display()));
    let parsed = parse_file(path)?;
    import_parsed(pool, parsed).await
}

/// Import CSV bytes (e.g. an HTTP upload) into the `users` table.
pub async fn import_bytes(pool: &PgPool, bytes: &[u8]) -> ImportResult<ImportSummary> {
    let parsed = parse_bytes(bytes)?;
    import_parsed(pool, parsed).await
}

/// Map each parsed row through the expander and schema mapper.
///
/// Total: every parsed row yields exactly one batch record.
pub fn build_batch(parsed: &ParseResult) -> ImportBatch {
    parsed
        .rows
        .iter()
        .map(|row| ImportRecord {
            user: map_user(&expand_record(&row.fields)),
            raw_line: row.raw.clone(),
            line_number: row.line_number,
        })
        .collect()
}

async fn import_parsed(pool: &PgPool, parsed: ParseResult) -> ImportResult<ImportSummary> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Read {} rows with {} columns",
        parsed.rows.len(),
        parsed.headers.len()
    ));

    let batch = build_batch(&parsed);

    let inserted = load_batch(pool, &batch).await?;
    log_success(format!("Committed {} rows", inserted));

    // Post-commit, read-only. Never turns a committed import into a
    // failure.
    match age_report(pool).await {
        Ok(report) => {
            for line in report.render().lines() {
                log_info(line);
            }
        }
        Err(err) => {
            log_error(format!("Failed to generate age report: {}", err));
        }
    }

    Ok(ImportSummary {
        inserted,
        encoding: parsed.encoding,
    })
}
