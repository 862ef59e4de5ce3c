//! Enumerated codes used by hire and termination notifications.
//!
//! Each enum serializes to snake_case names in JSON and exposes the code
//! the service expects on the wire through `code()`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Employer category, which decides where a pay period starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployerCategory {
    /// Private sector: periods run from day 1 to the last day of the month.
    Private,
    /// Public sector: periods run from day 15 to day 14 of the next month.
    Public,
}

impl fmt::Display for EmployerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployerCategory::Private => write!(f, "private"),
            EmployerCategory::Public => write!(f, "public"),
        }
    }
}

/// Insurance type of the insured person (`sigortaliTuru`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    /// All insurance branches.
    AllBranches,
    /// Workers sent abroad.
    WorkerAbroad,
    /// Apprentices.
    Apprentice,
    /// Retirees paying the social security support premium.
    SupportPremium,
    /// Foreign nationals from non-agreement countries.
    ForeignNational,
    /// Prison workers.
    PrisonWorker,
    /// Employment agency trainees.
    AgencyTrainee,
    /// Recipients of job loss compensation.
    JobLossCompensation,
    /// Students in part-time university employment.
    PartTimeStudent,
    /// Interns.
    Intern,
    /// Medical intern students.
    MedicalIntern,
    /// War invalids.
    WarInvalid,
    /// Scholarship holders.
    ScholarshipHolder,
}

impl InsuranceType {
    /// Returns the wire code.
    pub fn code(&self) -> &'static str {
        match self {
            InsuranceType::AllBranches => "0",
            InsuranceType::WorkerAbroad => "2",
            InsuranceType::Apprentice => "7",
            InsuranceType::SupportPremium => "8",
            InsuranceType::ForeignNational => "12",
            InsuranceType::PrisonWorker => "14",
            InsuranceType::AgencyTrainee => "16",
            InsuranceType::JobLossCompensation => "17",
            InsuranceType::PartTimeStudent => "18",
            InsuranceType::Intern => "19",
            InsuranceType::MedicalIntern => "24",
            InsuranceType::WarInvalid => "25",
            InsuranceType::ScholarshipHolder => "32",
        }
    }
}

/// Task code of the insured person (`gorevkodu`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCode {
    /// Employer or employer representative.
    Employer,
    /// Worker.
    Worker,
    /// Civil servant under the 4/b status.
    CivilServant,
    /// Contracted personnel under the 4/c status.
    ContractedPersonnel,
    /// Apprentice or intern.
    Apprentice,
}

impl TaskCode {
    /// Returns the wire code.
    pub fn code(&self) -> &'static str {
        match self {
            TaskCode::Employer => "01",
            TaskCode::Worker => "02",
            TaskCode::CivilServant => "03",
            TaskCode::ContractedPersonnel => "04",
            TaskCode::Apprentice => "05",
        }
    }
}

/// Highest completed education (`ogrenimkodu`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    /// Not known.
    Unknown,
    /// Illiterate.
    Illiterate,
    /// Primary school.
    Primary,
    /// Middle school.
    Middle,
    /// High school.
    HighSchool,
    /// College or faculty.
    University,
    /// Master's degree.
    Masters,
    /// Doctorate.
    Doctorate,
}

impl EducationLevel {
    /// Returns the wire code.
    pub fn code(&self) -> &'static str {
        match self {
            EducationLevel::Unknown => "0",
            EducationLevel::Illiterate => "1",
            EducationLevel::Primary => "2",
            EducationLevel::Middle => "3",
            EducationLevel::HighSchool => "4",
            EducationLevel::University => "5",
            EducationLevel::Masters => "6",
            EducationLevel::Doctorate => "7",
        }
    }
}

/// Reason an employment relationship ended (`istenCikisNedeni`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Probationary contract terminated by the employer.
    ProbationEndedByEmployer,
    /// Probationary contract terminated by the worker.
    ProbationEndedByWorker,
    /// Resignation from an open-ended contract.
    Resignation,
    /// Open-ended contract terminated by the employer without just cause.
    DismissalWithoutCause,
    /// Fixed-term contract expired.
    FixedTermExpired,
    /// Retirement or lump-sum payment.
    Retirement,
    /// Disability retirement.
    DisabilityRetirement,
    /// Death.
    Death,
    /// Death caused by a work accident.
    WorkAccidentDeath,
    /// Military service.
    MilitaryService,
    /// Marriage of a female worker.
    Marriage,
    /// Retirement conditions other than age completed.
    RetirementConditionsMet,
    /// Collective dismissal.
    CollectiveDismissal,
    /// Transfer to another worksite of the same employer before the contract ends.
    SameEmployerTransfer,
    /// Worksite closed.
    WorksiteClosed,
    /// Work completed.
    WorkCompleted,
    /// End of season.
    SeasonEnded,
    /// End of campaign.
    CampaignEnded,
    /// Change of status.
    StatusChange,
    /// Other reasons.
    Other,
    /// Terminated by the worker for compelling reasons.
    WorkerCompellingReasons,
    /// Terminated by the worker for health reasons.
    WorkerHealthReasons,
    /// Terminated by the worker over the employer's misconduct.
    EmployerMisconduct,
    /// Terminated by disciplinary board decision.
    DisciplinaryBoard,
    /// Terminated by the employer for compelling reasons or detention.
    EmployerCompellingReasons,
    /// Terminated by the employer for health reasons.
    EmployerHealthReasons,
    /// Terminated by the employer over the worker's misconduct.
    WorkerMisconduct,
    /// Visa expired.
    VisaExpired,
}

impl TerminationReason {
    /// Returns the two-digit wire code.
    pub fn code(&self) -> &'static str {
        match self {
            TerminationReason::ProbationEndedByEmployer => "01",
            TerminationReason::ProbationEndedByWorker => "02",
            TerminationReason::Resignation => "03",
            TerminationReason::DismissalWithoutCause => "04",
            TerminationReason::FixedTermExpired => "05",
            TerminationReason::Retirement => "08",
            TerminationReason::DisabilityRetirement => "09",
            TerminationReason::Death => "10",
            TerminationReason::WorkAccidentDeath => "11",
            TerminationReason::MilitaryService => "12",
            TerminationReason::Marriage => "13",
            TerminationReason::RetirementConditionsMet => "14",
            TerminationReason::CollectiveDismissal => "15",
            TerminationReason::SameEmployerTransfer => "16",
            TerminationReason::WorksiteClosed => "17",
            TerminationReason::WorkCompleted => "18",
            TerminationReason::SeasonEnded => "19",
            TerminationReason::CampaignEnded => "20",
            TerminationReason::StatusChange => "21",
            TerminationReason::Other => "22",
            TerminationReason::WorkerCompellingReasons => "23",
            TerminationReason::WorkerHealthReasons => "24",
            TerminationReason::EmployerMisconduct => "25",
            TerminationReason::DisciplinaryBoard => "26",
            TerminationReason::EmployerCompellingReasons => "27",
            TerminationReason::EmployerHealthReasons => "28",
            TerminationReason::WorkerMisconduct => "29",
            TerminationReason::VisaExpired => "30",
        }
    }

    /// Returns true when the reason requires a destination registry id.
    pub fn is_transfer(&self) -> bool {
        *self == TerminationReason::SameEmployerTransfer
    }
}
