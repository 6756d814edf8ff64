//! Production weight record model.
//!
//! Records are append-only: created once by an admin, never updated or
//! deleted. Each record carries both the owning worker and the admin who
//! entered it, plus the worker's work type captured at entry time.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::user::WorkType;

/// One production-weight observation.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecord {
    pub id: i64,
    pub user_id: i64,
    pub weight: Decimal,
    pub record_date: NaiveDate,
    pub work_type: Option<WorkType>,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeightRecord {
    pub user_id: i64,
    #[validate(custom(function = positive_weight))]
    pub weight: Decimal,
    pub date: NaiveDate,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn positive_weight(weight: &Decimal) -> Result<(), ValidationError> {
    if *weight <= Decimal::ZERO {
        return Err(ValidationError::new("positive_weight")
            .with_message("weight must be greater than zero".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_input(weight: Decimal) -> CreateWeightRecord {
        CreateWeightRecord {
            user_id: 1,
            weight,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn positive_weight_accepted() {
        assert!(sample_input(dec("12.50")).validate().is_ok());
    }

    #[test]
    fn zero_weight_rejected() {
        let errors = sample_input(dec("0")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("weight"));
    }

    #[test]
    fn negative_weight_rejected() {
        assert!(sample_input(dec("-3.25")).validate().is_err());
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = WeightRecord {
            id: 7,
            user_id: 3,
            weight: dec("12.5"),
            record_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            work_type: Some(WorkType::Filetagem),
            notes: Some("tanque 2".to_string()),
            created_by: 1,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["recordDate"], "2024-03-15");
        assert_eq!(json["workType"], "filetagem");
        assert_eq!(json["createdBy"], 1);
        assert_eq!(json["weight"], 12.5);
    }
}
