//! Pay period boundaries and work duration classification.
//!
//! Private employers use calendar months. Public employers use periods that
//! start on day 15 and end on day 14 of the following month.

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::error::{GatewayError, GatewayResult, ValidationError, ValidationRule};
use crate::models::{EmployerCategory, PeriodInfo, WorkDuration};

/// Day of month on which a public-sector period starts.
pub const PUBLIC_PERIOD_START_DAY: u32 = 15;

/// Spans shorter than this many days are partial time.
pub const FULL_TIME_MIN_DAYS: u32 = 30;

/// Computes the pay period named after `year`/`month`.
///
/// # Example
///
/// ```
/// use sgk_gateway::calculation::compute_period;
/// use sgk_gateway::models::EmployerCategory;
/// use chrono::NaiveDate;
///
/// let period = compute_period(EmployerCategory::Public, 2024, 1).unwrap();
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
/// assert_eq!(period.day_count, 31);
/// ```
pub fn compute_period(
    category: EmployerCategory,
    year: i32,
    month: u32,
) -> GatewayResult<PeriodInfo> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ValidationError::new(
            "month",
            ValidationRule::Calendar,
            format!("{}-{:02} is not a valid calendar month", year, month),
        )
    })?;
    period_starting_month(category, first_of_month)
}

/// Computes the pay period named after the year and month of `date`.
pub fn compute_period_from_date(
    category: EmployerCategory,
    date: NaiveDate,
) -> GatewayResult<PeriodInfo> {
    compute_period(category, date.year(), date.month())
}

fn period_starting_month(
    category: EmployerCategory,
    first_of_month: NaiveDate,
) -> GatewayResult<PeriodInfo> {
    let out_of_range = || -> GatewayError {
        ValidationError::new(
            "year",
            ValidationRule::Calendar,
            format!("period for {} is outside the supported calendar", first_of_month),
        )
        .into()
    };
    let first_of_next = first_of_month
        .checked_add_months(Months::new(1))
        .ok_or_else(out_of_range)?;

    let (start_date, end_date) = match category {
        EmployerCategory::Private => {
            let end = first_of_next.pred_opt().ok_or_else(out_of_range)?;
            (first_of_month, end)
        }
        EmployerCategory::Public => {
            let start = first_of_month
                .with_day(PUBLIC_PERIOD_START_DAY)
                .ok_or_else(out_of_range)?;
            let end = first_of_next
                .with_day(PUBLIC_PERIOD_START_DAY - 1)
                .ok_or_else(out_of_range)?;
            (start, end)
        }
    };

    Ok(PeriodInfo {
        period_code: format!("{}/{:02}", first_of_month.year(), first_of_month.month()),
        start_date,
        end_date,
        day_count: inclusive_days(start_date, end_date),
    })
}

/// Classifies a work span, using today as the end of an open span.
pub fn classify_work_duration(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> GatewayResult<WorkDuration> {
    classify_work_duration_at(start_date, end_date, Local::now().date_naive())
}

/// Classifies a work span against an explicit reference date.
///
/// The day count is inclusive of both ends. Exactly 30 days is full time.
///
/// # Example
///
/// ```
/// use sgk_gateway::calculation::classify_work_duration_at;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
/// let duration = classify_work_duration_at(start, Some(end), end).unwrap();
/// assert_eq!(duration.day_count, 30);
/// assert!(!duration.is_partial_time);
/// ```
pub fn classify_work_duration_at(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> GatewayResult<WorkDuration> {
    let end_date = end_date.unwrap_or(today);
    if end_date < start_date {
        return Err(ValidationError::new(
            "end_date",
            ValidationRule::DateRange,
            format!("end date {} is before start date {}", end_date, start_date),
        )
        .into());
    }
    let day_count = inclusive_days(start_date, end_date);
    Ok(WorkDuration {
        day_count,
        is_partial_time: day_count < FULL_TIME_MIN_DAYS,
    })
}

fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    u32::try_from(days).unwrap_or(0)
}
