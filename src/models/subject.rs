//! Subject records submitted in hire and termination notifications.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EducationLevel, InsuranceType, TaskCode, TerminationReason};

/// A person being registered as hired.
///
/// # Example
///
/// ```
/// use sgk_gateway::models::{EducationLevel, HireRecord, InsuranceType, TaskCode};
/// use chrono::NaiveDate;
///
/// let record = HireRecord::new(
///     "10000000146",
///     "AYSE",
///     "YILMAZ",
///     NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     InsuranceType::AllBranches,
///     TaskCode::Worker,
///     EducationLevel::HighSchool,
/// );
/// assert!(record.profession_code.is_none());
/// assert!(!record.partial_time);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HireRecord {
    /// 11-digit national identity number.
    pub national_id: String,
    /// Given name, at most 18 characters.
    pub given_name: String,
    /// Family name, at most 18 characters.
    pub family_name: String,
    /// First day of employment.
    pub hire_date: NaiveDate,
    /// Insurance type.
    pub insurance_type: InsuranceType,
    /// Task code.
    pub task_code: TaskCode,
    /// Profession code in `NNNN.NN` or `NNNN.NNN` form.
    #[serde(default)]
    pub profession_code: Option<String>,
    /// Disability flag.
    #[serde(default)]
    pub disabled: bool,
    /// Ex-convict flag.
    #[serde(default)]
    pub ex_convict: bool,
    /// Highest completed education.
    pub education: EducationLevel,
    /// Department of graduation.
    #[serde(default)]
    pub graduation_department: Option<String>,
    /// Year of graduation.
    #[serde(default)]
    pub graduation_year: Option<u16>,
    /// Partial-time work flag.
    #[serde(default)]
    pub partial_time: bool,
    /// Days worked per month when partial time, 1..=29.
    #[serde(default)]
    pub partial_time_days: Option<u8>,
    /// Transfer between worksites of the same employer.
    #[serde(default)]
    pub same_employer_transfer: bool,
    /// Registry id of the worksite the person transfers from.
    #[serde(default)]
    pub transfer_source_registry_id: Option<String>,
}

impl HireRecord {
    /// Creates a hire record with all optional fields unset.
    pub fn new(
        national_id: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        hire_date: NaiveDate,
        insurance_type: InsuranceType,
        task_code: TaskCode,
        education: EducationLevel,
    ) -> Self {
        Self {
            national_id: national_id.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            hire_date,
            insurance_type,
            task_code,
            profession_code: None,
            disabled: false,
            ex_convict: false,
            education,
            graduation_department: None,
            graduation_year: None,
            partial_time: false,
            partial_time_days: None,
            same_employer_transfer: false,
            transfer_source_registry_id: None,
        }
    }
}

/// Earnings reported for one pay period of a terminated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEarnings {
    /// Earned wage, non-negative.
    pub earned_wage: Decimal,
    /// Bonus and premium payments, non-negative.
    #[serde(default)]
    pub bonus: Decimal,
    /// Days without work in the period, 0..=31.
    #[serde(default)]
    pub missing_days: u8,
    /// Two-digit reason code, required when `missing_days > 0`.
    #[serde(default)]
    pub missing_day_reason: Option<String>,
}

impl PeriodEarnings {
    /// Earnings with no bonus and no missing days.
    pub fn wage_only(earned_wage: Decimal) -> Self {
        Self {
            earned_wage,
            bonus: Decimal::ZERO,
            missing_days: 0,
            missing_day_reason: None,
        }
    }
}

/// A person being registered as terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationRecord {
    /// 11-digit national identity number.
    pub national_id: String,
    /// Given name, at most 18 characters.
    pub given_name: String,
    /// Family name, at most 18 characters.
    pub family_name: String,
    /// Last day of employment.
    pub termination_date: NaiveDate,
    /// Termination reason.
    pub reason: TerminationReason,
    /// Profession code in `NNNN.NN` or `NNNN.NNN` form.
    #[serde(default)]
    pub profession_code: Option<String>,
    /// Registry id of the destination worksite for transfers.
    #[serde(default)]
    pub destination_registry_id: Option<String>,
    /// Earnings in the period the termination falls in.
    pub current_period: PeriodEarnings,
    /// Earnings in the preceding period, when still unreported.
    #[serde(default)]
    pub prior_period: Option<PeriodEarnings>,
}
