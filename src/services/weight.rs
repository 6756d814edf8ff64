//! Weight record service: append-only inserts and range-filtered reads.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::weight_record::{CreateWeightRecord, WeightRecord};
use crate::services::user;

/// Inclusive calendar-date window for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build an optional range from optional query bounds.
    ///
    /// Both bounds must be supplied together. A lone bound is rejected
    /// rather than silently ignored, so a caller can never mistake an
    /// all-time result for a filtered one. An inverted range is allowed and
    /// simply matches nothing.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, AppError> {
        match (start, end) {
            (Some(start), Some(end)) => Ok(Some(Self { start, end })),
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "start and end must be provided together".to_string(),
            )),
        }
    }
}

/// Create a weight record for a worker.
///
/// The owning user must exist. The record is tagged with that user's current
/// work type and with the admin who entered it. Records are immutable after
/// this insert.
pub async fn create(
    pool: &PgPool,
    input: &CreateWeightRecord,
    created_by: i64,
) -> Result<WeightRecord, AppError> {
    let owner = user::find_by_id(pool, input.user_id).await?;

    let record = sqlx::query_as::<_, WeightRecord>(
        r#"
        INSERT INTO weight_records (user_id, weight, record_date, work_type, notes, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(owner.id)
    .bind(input.weight)
    .bind(input.date)
    .bind(owner.work_type)
    .bind(&input.notes)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// List one worker's records, newest date first, newest entry first within
/// a date. An absent range means all-time.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: i64,
    range: Option<DateRange>,
) -> Result<Vec<WeightRecord>, AppError> {
    let records = match range {
        Some(range) => {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weight_records \
                 WHERE user_id = $1 AND record_date BETWEEN $2 AND $3 \
                 ORDER BY record_date DESC, created_at DESC",
            )
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weight_records WHERE user_id = $1 \
                 ORDER BY record_date DESC, created_at DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(records)
}

/// List all workers' records with the same range semantics and ordering as
/// [`list_for_user`].
pub async fn list_all(
    pool: &PgPool,
    range: Option<DateRange>,
) -> Result<Vec<WeightRecord>, AppError> {
    let records = match range {
        Some(range) => {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weight_records WHERE record_date BETWEEN $1 AND $2 \
                 ORDER BY record_date DESC, created_at DESC",
            )
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weight_records ORDER BY record_date DESC, created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(records)
}

/// List one worker's records on a single date, newest entry first.
pub async fn list_for_user_on_date(
    pool: &PgPool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<WeightRecord>, AppError> {
    let records = sqlx::query_as::<_, WeightRecord>(
        "SELECT * FROM weight_records WHERE user_id = $1 AND record_date = $2 \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn range_requires_both_bounds() {
        let err = DateRange::from_bounds(Some(date("2024-03-01")), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = DateRange::from_bounds(None, Some(date("2024-03-31"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn range_absent_when_no_bounds() {
        assert_eq!(DateRange::from_bounds(None, None).unwrap(), None);
    }

    #[test]
    fn range_present_when_both_bounds() {
        let range = DateRange::from_bounds(Some(date("2024-03-01")), Some(date("2024-03-31")))
            .unwrap()
            .unwrap();
        assert_eq!(range.start, date("2024-03-01"));
        assert_eq!(range.end, date("2024-03-31"));
    }
}
