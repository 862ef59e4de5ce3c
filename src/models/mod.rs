//! Core data models for the SGK gateway.
//!
//! All models are plain values constructed per call; none of them carry
//! protocol-specific types.

mod codes;
mod credentials;
mod operation_result;
mod penalty;
mod period;
mod subject;

pub use codes::{EducationLevel, EmployerCategory, InsuranceType, TaskCode, TerminationReason};
pub use credentials::{Credentials, Environment};
pub use operation_result::{
    ConfirmationDocument, DocumentKind, OperationResult, RecordResult, SubjectEcho,
};
pub use penalty::{PenaltyAssessment, PenaltyTier};
pub use period::{PeriodInfo, PeriodSummary, WorkDuration};
pub use subject::{HireRecord, PeriodEarnings, TerminationRecord};
