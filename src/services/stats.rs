//! Production statistics: daily, monthly, summary, and dashboard reports.
//!
//! Daily and monthly reports materialize the matching rows and reduce them
//! in process, since the row set itself is part of the payload or the
//! grouping. Dashboard and summary totals are plain SQL aggregates fetched
//! in parallel. Empty row sets reduce to zero totals, never errors.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::weight_record::WeightRecord;
use crate::services::weight::{self, DateRange};

/// Daily report for one worker: the day's records plus their totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_weight: f64,
    pub record_count: i64,
    pub records: Vec<WeightRecord>,
}

/// One day's slice of a monthly report.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub date: NaiveDate,
    pub weight: f64,
    pub record_count: i64,
}

/// Monthly report: per-day breakdown plus ungrouped totals for the range.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub total_weight: f64,
    pub record_count: i64,
    pub days: Vec<DayTotal>,
}

/// Org-wide dashboard report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_today: f64,
    pub active_users: i64,
    pub total_month: f64,
    pub avg_daily: f64,
}

/// Per-worker summary: today, current month, and daily average.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_today: f64,
    pub total_month: f64,
    pub avg_daily: f64,
}

/// First and last calendar day of a month. `None` for an invalid month.
///
/// The last day is the day before the first of the following month, which
/// keeps leap years correct without a day table.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some((first, next_first.pred_opt()?))
}

/// Number of days in a month, derived from the month-end date.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    month_bounds(year, month).map(|(_, last)| last.day())
}

fn weight_as_f64(record: &WeightRecord) -> f64 {
    record.weight.to_f64().unwrap_or(0.0)
}

/// Sum record weights as floating values.
fn total_weight(records: &[WeightRecord]) -> f64 {
    records.iter().map(weight_as_f64).sum()
}

/// Group records into per-day totals, ascending by date.
fn group_by_date(records: &[WeightRecord]) -> Vec<DayTotal> {
    let mut days: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
    for record in records {
        let entry = days.entry(record.record_date).or_insert((0.0, 0));
        entry.0 += weight_as_f64(record);
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(date, (weight, record_count))| DayTotal {
            date,
            weight,
            record_count,
        })
        .collect()
}

/// Month bounds for the month containing `today`.
fn current_month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    // A real date always has valid month bounds.
    month_bounds(today.year(), today.month()).unwrap_or((today, today))
}

/// Daily report: one worker's records on one date.
pub async fn daily(pool: &PgPool, user_id: i64, date: NaiveDate) -> Result<DailyStats, AppError> {
    let records = weight::list_for_user_on_date(pool, user_id, date).await?;
    Ok(DailyStats {
        total_weight: total_weight(&records),
        record_count: records.len() as i64,
        records,
    })
}

/// Monthly report: one worker's records over a calendar month, grouped per
/// day. Rejects an invalid year/month pair.
pub async fn monthly(
    pool: &PgPool,
    user_id: i64,
    year: i32,
    month: u32,
) -> Result<MonthlyStats, AppError> {
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| AppError::Validation(format!("invalid month: {year}-{month}")))?;

    let records = weight::list_for_user(
        pool,
        user_id,
        Some(DateRange {
            start: first,
            end: last,
        }),
    )
    .await?;

    Ok(MonthlyStats {
        year,
        month,
        total_weight: total_weight(&records),
        record_count: records.len() as i64,
        days: group_by_date(&records),
    })
}

/// Org-wide dashboard for the month containing `today`.
///
/// The daily average divides by the full month length, not by the days
/// elapsed so far.
pub async fn dashboard(pool: &PgPool, today: NaiveDate) -> Result<DashboardStats, AppError> {
    let (first, last) = current_month_bounds(today);

    let (total_today, active_users, total_month) = tokio::try_join!(
        fetch_total_on_date(pool, today),
        fetch_active_user_count(pool),
        fetch_total_in_range(pool, first, last),
    )?;

    Ok(DashboardStats {
        total_today,
        active_users,
        total_month,
        avg_daily: total_month / f64::from(last.day()),
    })
}

/// Per-worker summary for the month containing `today`. Same daily-average
/// formula as the dashboard, restricted to one worker's records.
pub async fn summary(
    pool: &PgPool,
    user_id: i64,
    today: NaiveDate,
) -> Result<SummaryStats, AppError> {
    let (first, last) = current_month_bounds(today);

    let (total_today, total_month) = tokio::try_join!(
        fetch_user_total_on_date(pool, user_id, today),
        fetch_user_total_in_range(pool, user_id, first, last),
    )?;

    Ok(SummaryStats {
        total_today,
        total_month,
        avg_daily: total_month / f64::from(last.day()),
    })
}

/// Sum of all weights on a single date, zero when none.
async fn fetch_total_on_date(pool: &PgPool, date: NaiveDate) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(weight), 0)::DOUBLE PRECISION FROM weight_records \
         WHERE record_date = $1",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Count users with the active flag set, admins included.
async fn fetch_active_user_count(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active = true")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Sum of all weights in an inclusive date range, zero when none.
async fn fetch_total_in_range(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(weight), 0)::DOUBLE PRECISION FROM weight_records \
         WHERE record_date BETWEEN $1 AND $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Sum of one worker's weights on a single date, zero when none.
async fn fetch_user_total_on_date(
    pool: &PgPool,
    user_id: i64,
    date: NaiveDate,
) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(weight), 0)::DOUBLE PRECISION FROM weight_records \
         WHERE user_id = $1 AND record_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Sum of one worker's weights in an inclusive date range, zero when none.
async fn fetch_user_total_in_range(
    pool: &PgPool,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(weight), 0)::DOUBLE PRECISION FROM weight_records \
         WHERE user_id = $1 AND record_date BETWEEN $2 AND $3",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::WorkType;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(id: i64, day: &str, weight: &str) -> WeightRecord {
        WeightRecord {
            id,
            user_id: 1,
            weight: weight.parse::<Decimal>().unwrap(),
            record_date: date(day),
            work_type: Some(WorkType::Filetagem),
            notes: None,
            created_by: 99,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn month_bounds_regular_months() {
        assert_eq!(
            month_bounds(2024, 1).unwrap(),
            (date("2024-01-01"), date("2024-01-31"))
        );
        assert_eq!(
            month_bounds(2024, 4).unwrap(),
            (date("2024-04-01"), date("2024-04-30"))
        );
        assert_eq!(
            month_bounds(2024, 12).unwrap(),
            (date("2024-12-01"), date("2024-12-31"))
        );
    }

    #[test]
    fn month_bounds_february_leap_and_common() {
        assert_eq!(month_bounds(2024, 2).unwrap().1, date("2024-02-29"));
        assert_eq!(month_bounds(2023, 2).unwrap().1, date("2023-02-28"));
        assert_eq!(month_bounds(2000, 2).unwrap().1, date("2000-02-29"));
        assert_eq!(month_bounds(1900, 2).unwrap().1, date("1900-02-28"));
    }

    #[test]
    fn month_bounds_invalid_month() {
        assert_eq!(month_bounds(2024, 0), None);
        assert_eq!(month_bounds(2024, 13), None);
    }

    #[test]
    fn days_in_month_matches_calendar() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 7), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn total_weight_sums_matching_set() {
        let records = vec![
            record(1, "2024-03-15", "12.5"),
            record(2, "2024-03-15", "7.25"),
            record(3, "2024-03-16", "10"),
        ];
        assert!((total_weight(&records) - 29.75).abs() < 1e-9);
    }

    #[test]
    fn total_weight_of_empty_set_is_zero() {
        assert_eq!(total_weight(&[]), 0.0);
    }

    #[test]
    fn group_by_date_sums_and_counts_per_day() {
        let records = vec![
            record(1, "2024-03-16", "10"),
            record(2, "2024-03-15", "12.5"),
            record(3, "2024-03-15", "7.25"),
        ];
        let days = group_by_date(&records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2024-03-15"));
        assert!((days[0].weight - 19.75).abs() < 1e-9);
        assert_eq!(days[0].record_count, 2);
        assert_eq!(days[1].date, date("2024-03-16"));
        assert!((days[1].weight - 10.0).abs() < 1e-9);
        assert_eq!(days[1].record_count, 1);
    }

    #[test]
    fn group_by_date_is_ascending_regardless_of_input_order() {
        let records = vec![
            record(1, "2024-03-30", "1"),
            record(2, "2024-03-02", "1"),
            record(3, "2024-03-17", "1"),
        ];
        let days = group_by_date(&records);
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-03-02"), date("2024-03-17"), date("2024-03-30")]
        );
    }

    #[test]
    fn grouped_weights_sum_to_total() {
        let records = vec![
            record(1, "2024-03-15", "12.5"),
            record(2, "2024-03-15", "7.25"),
            record(3, "2024-03-16", "10"),
            record(4, "2024-03-18", "0.75"),
        ];
        let grouped_sum: f64 = group_by_date(&records).iter().map(|d| d.weight).sum();
        assert!((grouped_sum - total_weight(&records)).abs() < 1e-9);
    }

    #[test]
    fn group_by_date_of_empty_set_is_empty() {
        assert!(group_by_date(&[]).is_empty());
    }

    #[test]
    fn current_month_bounds_spans_the_whole_month() {
        // Early in the month the bounds still cover the full month, so the
        // daily average divides by the full month length.
        let (first, last) = current_month_bounds(date("2024-02-03"));
        assert_eq!(first, date("2024-02-01"));
        assert_eq!(last, date("2024-02-29"));
    }

    #[test]
    fn stats_reports_serialize_camel_case() {
        let stats = DashboardStats {
            total_today: 12.5,
            active_users: 4,
            total_month: 250.0,
            avg_daily: 250.0 / 29.0,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalToday"], 12.5);
        assert_eq!(json["activeUsers"], 4);
        assert!(json["avgDaily"].is_number());

        let daily = DailyStats {
            total_weight: 0.0,
            record_count: 0,
            records: vec![],
        };
        let json = serde_json::to_value(&daily).unwrap();
        assert_eq!(json["totalWeight"], 0.0);
        assert_eq!(json["recordCount"], 0);
        assert_eq!(json["records"].as_array().unwrap().len(), 0);
    }
}
