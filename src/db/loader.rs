//! Transactional batch loader.
//!
//! One import request gets exactly one transaction: every mapped record
//! is inserted in source order with a single parameterized statement,
//! and the commit happens only when all of them succeed. The first
//! rejected row aborts the rest, rolls the whole batch back, and
//! surfaces one aggregate error, so the store is only ever observed as
//! "none of these rows" or "all of these rows".
//!
//! Per-row diagnostics (ordinal, raw source line, attempted values, the
//! database's own message) go to the operator log; the caller just gets
//! the aggregate failure.

use sqlx::PgPool;

use crate::api::logs::{log_error, log_warning};
use crate::error::{LoadError, LoadResult};
use crate::models::ImportRecord;

const INSERT_USER: &str = "
    INSERT INTO users (name, age, address, additional_info)
    VALUES ($1, $2, $3::jsonb, $4::jsonb)
";

/// Insert the whole batch inside one transaction.
///
/// Returns the number of rows inserted (always the full batch length on
/// success). On any insert failure the transaction is rolled back and a
/// [`LoadError::RowRejected`] identifies the offending record.
pub async fn load_batch(pool: &PgPool, batch: &[ImportRecord]) -> LoadResult<u64> {
    let mut tx = pool.begin().await?;
    let mut inserted: u64 = 0;

    for (index, record) in batch.iter().enumerate() {
        let ordinal = index + 1;

        let result = sqlx::query(INSERT_USER)
            .bind(&record.user.name)
            .bind(record.user.age)
            .bind(record.user.address.as_deref())
            .bind(record.user.additional_info.as_deref())
            .execute(&mut *tx)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(err) => {
                log_error(format!(
                    "FAILED to insert record #{} (line {} in CSV)",
                    ordinal, record.line_number
                ));
                log_error(format!("Raw CSV line: {}", record.raw_line));
                log_error(format!(
                    "Mapped data (age, name): {}, {}",
                    record.user.age, record.user.name
                ));
                log_error(format!("PG error: {}", err));

                // The transaction also rolls back on drop; an explicit
                // rollback failure must not mask the row error.
                if let Err(rollback_err) = tx.rollback().await {
                    log_warning(format!("Rollback reported an error: {}", rollback_err));
                }

                return Err(LoadError::RowRejected {
                    ordinal,
                    line_number: record.line_number,
                    message: err.to_string(),
                });
            }
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

// Atomicity and duplication behavior are covered by the integration
// tests in `pipeline`, which need a live PostgreSQL.
