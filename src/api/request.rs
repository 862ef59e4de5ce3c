//! Request types for the gateway API.
//!
//! This module defines the JSON request structures for the API endpoints.
//! Subject records use the domain models directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EmployerCategory, HireRecord, TerminationRecord};

/// Request body for `POST /validation/national-id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NationalIdRequest {
    /// The national id to check.
    pub national_id: String,
}

/// Request body for `POST /periods`.
///
/// Either `date`, or both `year` and `month`, must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Employer category.
    pub employer_category: EmployerCategory,
    /// Period year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Period month, 1..=12.
    #[serde(default)]
    pub month: Option<u32>,
    /// A date whose calendar month names the period.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request body for `POST /work-duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkDurationRequest {
    /// First day of the span.
    pub start_date: NaiveDate,
    /// Last day of the span; today when omitted.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Request body for `POST /penalties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyRequest {
    /// Hire date of the filing.
    pub hire_date: NaiveDate,
    /// Filing date; today when omitted.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Request body for `POST /hires`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HireSubmission {
    /// Records to submit, in order.
    pub records: Vec<HireRecord>,
}

/// Request body for `POST /terminations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationSubmission {
    /// Records to submit, in order.
    pub records: Vec<TerminationRecord>,
}
