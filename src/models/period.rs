//! Pay period and work duration models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EmployerCategory;

/// A pay period window.
///
/// `day_count` is always `end_date - start_date + 1`.
///
/// # Example
///
/// ```
/// use sgk_gateway::models::PeriodInfo;
/// use chrono::NaiveDate;
///
/// let period = PeriodInfo {
///     period_code: "2024/02".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
///     day_count: 29,
/// };
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInfo {
    /// `YYYY/MM` code of the month the period is named after.
    pub period_code: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Number of days in the period.
    pub day_count: u32,
}

impl PeriodInfo {
    /// Checks if a date falls within the period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Classification of a work span as full or partial time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDuration {
    /// Inclusive day count of the span.
    pub day_count: u32,
    /// True when the span is shorter than 30 days.
    pub is_partial_time: bool,
}

/// Period summary returned by the service for one pay period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    /// Employer category the period was computed for.
    pub employer_category: EmployerCategory,
    /// The queried period.
    pub period: PeriodInfo,
    /// Top-level result and hire filings within the period.
    pub hires: super::OperationResult,
    /// Termination filings within the period.
    pub terminations: Vec<super::RecordResult>,
}
