//! Record-level precondition chains for submissions.
//!
//! Checks run phase by phase across the whole batch and stop at the first
//! failure, so the caller gets exactly one field to fix.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationRule};
use crate::models::{HireRecord, PeriodEarnings, TerminationRecord};

use super::identity::{check_national_id, check_registry_id, validate_profession_code};

/// Maximum characters allowed in a given or family name.
pub const MAX_NAME_LENGTH: usize = 18;

/// Smallest partial-time day count.
pub const MIN_PARTIAL_TIME_DAYS: u8 = 1;

/// Most records the service accepts in one submission.
pub const PROTOCOL_MAX_BATCH_SIZE: usize = 10;

/// Largest partial-time day count.
pub const MAX_PARTIAL_TIME_DAYS: u8 = 29;

/// Largest missing-day count in one period.
pub const MAX_MISSING_DAYS: u8 = 31;

/// Rejects empty batches and batches over the protocol limit.
pub fn validate_batch_size(count: usize, max: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::new(
            "records",
            ValidationRule::BatchSize,
            "at least one record must be submitted",
        ));
    }
    if count > max {
        return Err(ValidationError::new(
            "records",
            ValidationRule::BatchSize,
            format!(
                "{} records submitted; the service accepts at most {} per call",
                count, max
            ),
        ));
    }
    Ok(())
}

/// Validates a hire batch in order: size, national ids, profession codes,
/// partial-time day counts, then names, transfers and graduation year.
///
/// `today` bounds the graduation year.
pub fn validate_hire_batch(
    records: &[HireRecord],
    max: usize,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    validate_batch_size(records.len(), max)?;

    for (index, record) in records.iter().enumerate() {
        check_national_id(&record.national_id).map_err(|e| e.at_record(index))?;
    }
    for (index, record) in records.iter().enumerate() {
        check_profession_code(record.profession_code.as_deref(), index)?;
    }
    for (index, record) in records.iter().enumerate() {
        check_partial_time(record).map_err(|e| e.at_record(index))?;
    }
    for (index, record) in records.iter().enumerate() {
        check_names(&record.given_name, &record.family_name).map_err(|e| e.at_record(index))?;
        check_hire_transfer(record).map_err(|e| e.at_record(index))?;
        check_graduation_year(record.graduation_year, today).map_err(|e| e.at_record(index))?;
    }
    Ok(())
}

/// Validates a termination batch in order: size, national ids, profession
/// codes, transfer destinations, names, then reported earnings.
pub fn validate_termination_batch(
    records: &[TerminationRecord],
    max: usize,
) -> Result<(), ValidationError> {
    validate_batch_size(records.len(), max)?;

    for (index, record) in records.iter().enumerate() {
        check_national_id(&record.national_id).map_err(|e| e.at_record(index))?;
    }
    for (index, record) in records.iter().enumerate() {
        check_profession_code(record.profession_code.as_deref(), index)?;
    }
    for (index, record) in records.iter().enumerate() {
        check_termination_transfer(record).map_err(|e| e.at_record(index))?;
    }
    for (index, record) in records.iter().enumerate() {
        check_names(&record.given_name, &record.family_name).map_err(|e| e.at_record(index))?;
        check_earnings("current_period", &record.current_period)
            .map_err(|e| e.at_record(index))?;
        if let Some(prior) = &record.prior_period {
            check_earnings("prior_period", prior).map_err(|e| e.at_record(index))?;
        }
    }
    Ok(())
}

fn check_profession_code(code: Option<&str>, index: usize) -> Result<(), ValidationError> {
    match code {
        Some(code) => validate_profession_code(code)
            .map_err(|e| ValidationError::from(e).at_record(index)),
        None => Ok(()),
    }
}

fn check_partial_time(record: &HireRecord) -> Result<(), ValidationError> {
    if !record.partial_time {
        return Ok(());
    }
    match record.partial_time_days {
        Some(days) if (MIN_PARTIAL_TIME_DAYS..=MAX_PARTIAL_TIME_DAYS).contains(&days) => Ok(()),
        Some(days) => Err(ValidationError::new(
            "partial_time_days",
            ValidationRule::PartialTimeDays,
            format!(
                "partial-time day count {} is out of range; use {} to {}",
                days, MIN_PARTIAL_TIME_DAYS, MAX_PARTIAL_TIME_DAYS
            ),
        )),
        None => Err(ValidationError::new(
            "partial_time_days",
            ValidationRule::PartialTimeDays,
            format!(
                "partial-time work requires a day count from {} to {}",
                MIN_PARTIAL_TIME_DAYS, MAX_PARTIAL_TIME_DAYS
            ),
        )),
    }
}

fn check_names(given_name: &str, family_name: &str) -> Result<(), ValidationError> {
    for (field, value) in [("given_name", given_name), ("family_name", family_name)] {
        let length = value.trim().chars().count();
        if length == 0 || length > MAX_NAME_LENGTH {
            return Err(ValidationError::new(
                field,
                ValidationRule::NameLength,
                format!(
                    "{} must be 1 to {} characters, got {}",
                    field, MAX_NAME_LENGTH, length
                ),
            ));
        }
    }
    Ok(())
}

fn check_hire_transfer(record: &HireRecord) -> Result<(), ValidationError> {
    if !record.same_employer_transfer {
        return Ok(());
    }
    match record.transfer_source_registry_id.as_deref() {
        Some(id) => check_registry_id("transfer_source_registry_id", id),
        None => Err(ValidationError::new(
            "transfer_source_registry_id",
            ValidationRule::TransferRegistryRequired,
            "a same-employer transfer requires the registry id of the source worksite",
        )),
    }
}

fn check_termination_transfer(record: &TerminationRecord) -> Result<(), ValidationError> {
    if !record.reason.is_transfer() {
        return Ok(());
    }
    match record.destination_registry_id.as_deref() {
        Some(id) => check_registry_id("destination_registry_id", id),
        None => Err(ValidationError::new(
            "destination_registry_id",
            ValidationRule::TransferRegistryRequired,
            format!(
                "termination reason {} requires the registry id of the destination worksite",
                record.reason.code()
            ),
        )),
    }
}

fn check_graduation_year(year: Option<u16>, today: NaiveDate) -> Result<(), ValidationError> {
    match year {
        Some(year) if i32::from(year) > today.year() => Err(ValidationError::new(
            "graduation_year",
            ValidationRule::DateRange,
            format!("graduation year {} is in the future", year),
        )),
        _ => Ok(()),
    }
}

fn check_earnings(prefix: &str, earnings: &PeriodEarnings) -> Result<(), ValidationError> {
    if earnings.earned_wage < Decimal::ZERO {
        return Err(ValidationError::new(
            format!("{}.earned_wage", prefix),
            ValidationRule::NegativeAmount,
            "earned wage cannot be negative",
        ));
    }
    if earnings.bonus < Decimal::ZERO {
        return Err(ValidationError::new(
            format!("{}.bonus", prefix),
            ValidationRule::NegativeAmount,
            "bonus cannot be negative",
        ));
    }
    if earnings.missing_days > MAX_MISSING_DAYS {
        return Err(ValidationError::new(
            format!("{}.missing_days", prefix),
            ValidationRule::MissingDays,
            format!(
                "missing-day count {} exceeds {}",
                earnings.missing_days, MAX_MISSING_DAYS
            ),
        ));
    }
    if earnings.missing_days > 0 {
        let reason_ok = earnings
            .missing_day_reason
            .as_deref()
            .is_some_and(|r| r.len() == 2 && r.bytes().all(|b| b.is_ascii_digit()));
        if !reason_ok {
            return Err(ValidationError::new(
                format!("{}.missing_day_reason", prefix),
                ValidationRule::MissingDayReason,
                "a two-digit missing-day reason code is required when days are missing",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationLevel, InsuranceType, TaskCode, TerminationReason};

    const VALID_ID: &str = "10000000146";
    const REGISTRY: &str = "12345678901234567890123456";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn hire(national_id: &str) -> HireRecord {
        HireRecord::new(
            national_id,
            "AYSE",
            "YILMAZ",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            InsuranceType::AllBranches,
            TaskCode::Worker,
            EducationLevel::HighSchool,
        )
    }

    fn termination(reason: TerminationReason) -> TerminationRecord {
        TerminationRecord {
            national_id: VALID_ID.to_string(),
            given_name: "AYSE".to_string(),
            family_name: "YILMAZ".to_string(),
            termination_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            reason,
            profession_code: None,
            destination_registry_id: None,
            current_period: PeriodEarnings::wage_only(Decimal::new(25000, 0)),
            prior_period: None,
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        assert_eq!(
            validate_batch_size(0, 10).unwrap_err().rule,
            ValidationRule::BatchSize
        );
        assert!(validate_batch_size(10, 10).is_ok());
        let error = validate_batch_size(11, 10).unwrap_err();
        assert!(error.message.contains("11 records"));
    }

    #[test]
    fn test_valid_hire_batch_passes() {
        let mut record = hire(VALID_ID);
        record.profession_code = Some("2421.17".to_string());
        record.partial_time = true;
        record.partial_time_days = Some(29);
        assert!(validate_hire_batch(&[record], 10, today()).is_ok());
    }

    #[test]
    fn test_checksum_failure_reported_before_profession_code() {
        let mut first = hire(VALID_ID);
        first.profession_code = Some("123.4".to_string());
        let second = hire("10000000147");
        let error = validate_hire_batch(&[first, second], 10, today()).unwrap_err();
        assert_eq!(error.rule, ValidationRule::NationalIdChecksum);
        assert_eq!(error.record_index, Some(1));
    }

    #[test]
    fn test_profession_code_failure_reported_before_partial_time() {
        let mut first = hire(VALID_ID);
        first.partial_time = true;
        first.partial_time_days = Some(30);
        let mut second = hire(VALID_ID);
        second.profession_code = Some("12345.67".to_string());
        let error = validate_hire_batch(&[first, second], 10, today()).unwrap_err();
        assert_eq!(error.rule, ValidationRule::ProfessionCodeFormat);
        assert_eq!(error.record_index, Some(1));
    }

    #[test]
    fn test_partial_time_day_count_bounds() {
        for days in [Some(0), Some(30), None] {
            let mut record = hire(VALID_ID);
            record.partial_time = true;
            record.partial_time_days = days;
            let error = validate_hire_batch(&[record], 10, today()).unwrap_err();
            assert_eq!(error.rule, ValidationRule::PartialTimeDays, "days {:?}", days);
        }
    }

    #[test]
    fn test_partial_time_days_ignored_when_not_flagged() {
        let mut record = hire(VALID_ID);
        record.partial_time_days = Some(45);
        assert!(validate_hire_batch(&[record], 10, today()).is_ok());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut record = hire(VALID_ID);
        record.given_name = "ĞÜŞİÖÇĞÜŞİÖÇĞÜŞİÖÇ".to_string();
        assert!(validate_hire_batch(&[record.clone()], 10, today()).is_ok());
        record.family_name = "ĞÜŞİÖÇĞÜŞİÖÇĞÜŞİÖÇX".to_string();
        let error = validate_hire_batch(&[record], 10, today()).unwrap_err();
        assert_eq!(error.rule, ValidationRule::NameLength);
        assert_eq!(error.field, "family_name");
    }

    #[test]
    fn test_transfer_requires_source_registry() {
        let mut record = hire(VALID_ID);
        record.same_employer_transfer = true;
        let error = validate_hire_batch(&[record.clone()], 10, today()).unwrap_err();
        assert_eq!(error.rule, ValidationRule::TransferRegistryRequired);

        record.transfer_source_registry_id = Some("123".to_string());
        let error = validate_hire_batch(&[record.clone()], 10, today()).unwrap_err();
        assert_eq!(error.rule, ValidationRule::RegistryIdFormat);

        record.transfer_source_registry_id = Some(REGISTRY.to_string());
        assert!(validate_hire_batch(&[record], 10, today()).is_ok());
    }

    #[test]
    fn test_future_graduation_year_rejected() {
        let mut record = hire(VALID_ID);
        record.graduation_year = Some(2027);
        let error = validate_hire_batch(&[record], 10, today()).unwrap_err();
        assert_eq!(error.field, "graduation_year");
    }

    #[test]
    fn test_transfer_termination_requires_destination() {
        let record = termination(TerminationReason::SameEmployerTransfer);
        let error = validate_termination_batch(&[record.clone()], 10).unwrap_err();
        assert_eq!(error.rule, ValidationRule::TransferRegistryRequired);
        assert!(error.message.contains("16"));

        let mut record = record;
        record.destination_registry_id = Some(REGISTRY.to_string());
        assert!(validate_termination_batch(&[record], 10).is_ok());
    }

    #[test]
    fn test_termination_earnings_rules() {
        let mut record = termination(TerminationReason::Resignation);
        record.current_period.bonus = Decimal::new(-1, 0);
        let error = validate_termination_batch(&[record.clone()], 10).unwrap_err();
        assert_eq!(error.field, "current_period.bonus");

        record.current_period.bonus = Decimal::ZERO;
        record.current_period.missing_days = 32;
        let error = validate_termination_batch(&[record.clone()], 10).unwrap_err();
        assert_eq!(error.rule, ValidationRule::MissingDays);

        record.current_period.missing_days = 3;
        let error = validate_termination_batch(&[record.clone()], 10).unwrap_err();
        assert_eq!(error.rule, ValidationRule::MissingDayReason);

        record.current_period.missing_day_reason = Some("01".to_string());
        assert!(validate_termination_batch(&[record.clone()], 10).is_ok());

        record.prior_period = Some(PeriodEarnings::wage_only(Decimal::new(-5, 0)));
        let error = validate_termination_batch(&[record], 10).unwrap_err();
        assert_eq!(error.field, "prior_period.earned_wage");
    }
}
