//! Age distribution report over the persisted population.
//!
//! Read-only and strictly post-commit: a failure here never undoes an
//! import that already landed. Ages are fetched with one query and
//! bucketed in Rust over four fixed ranges; buckets with no matching
//! rows are omitted, and rows are ordered by each bucket's minimum age.

use sqlx::PgPool;

use crate::error::ReportResult;

// =============================================================================
// Age Buckets
// =============================================================================

/// Fixed, non-overlapping partition of the age line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    /// age < 20
    Under20,
    /// 20 <= age <= 40
    From20To40,
    /// 40 < age <= 60
    From40To60,
    /// age > 60
    Over60,
}

impl AgeBucket {
    /// All buckets, ordered by minimum age ascending.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Under20,
        AgeBucket::From20To40,
        AgeBucket::From40To60,
        AgeBucket::Over60,
    ];

    /// The bucket a given age falls into.
    pub fn of_age(age: i32) -> Self {
        if age < 20 {
            AgeBucket::Under20
        } else if age <= 40 {
            AgeBucket::From20To40
        } else if age <= 60 {
            AgeBucket::From40To60
        } else {
            AgeBucket::Over60
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under20 => "< 20",
            AgeBucket::From20To40 => "20 to 40",
            AgeBucket::From40To60 => "40 to 60",
            AgeBucket::Over60 => "> 60",
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// One bucket with a non-zero population.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub bucket: AgeBucket,
    pub count: u64,
    /// 100 * count / total, rounded to two decimals.
    pub percentage: f64,
}

/// The full distribution report.
///
/// `rows` is empty exactly when `total` is zero; rendering then says
/// "no records" instead of an empty table.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeReport {
    pub total: u64,
    pub rows: Vec<ReportRow>,
}

impl AgeReport {
    /// Render for human/log consumption, mirroring the operator report
    /// format: bucket label column, percentage column.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("--- Age Distribution Report ---\n");

        if self.total == 0 {
            out.push_str("No records found to analyze.\n");
            out.push_str("-------------------------------\n");
            return out;
        }

        out.push_str(&format!("Total Records: {}\n", self.total));
        out.push_str("Age-Group\t\t% Distribution\n");
        out.push_str("--------------------------------\n");
        for row in &self.rows {
            out.push_str(&format!(
                "{:<15}\t{:.2}\n",
                row.bucket.label(),
                row.percentage
            ));
        }
        out.push_str("--------------------------------\n");
        out
    }
}

/// Bucket a set of ages, omitting empty buckets, ordered by bucket
/// minimum age.
pub fn build_report(ages: &[i32]) -> AgeReport {
    let total = ages.len() as u64;
    if total == 0 {
        return AgeReport {
            total: 0,
            rows: Vec::new(),
        };
    }

    let rows = AgeBucket::ALL
        .iter()
        .filter_map(|bucket| {
            let count = ages
                .iter()
                .filter(|age| AgeBucket::of_age(**age) == *bucket)
                .count() as u64;
            (count > 0).then(|| ReportRow {
                bucket: *bucket,
                count,
                percentage: round2(count as f64 * 100.0 / total as f64),
            })
        })
        .collect();

    AgeReport { total, rows }
}

/// Round to two decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the report from the persisted table.
pub async fn age_report(pool: &PgPool) -> ReportResult<AgeReport> {
    let ages: Vec<i32> = sqlx::query_scalar("SELECT age FROM users WHERE age IS NOT NULL")
        .fetch_all(pool)
        .await?;

    Ok(build_report(&ages))
}

// =============================================================================
// Tests
// =============================================================================
