//! Result code catalog.
//!
//! Maps the integer codes the service returns to a fixed taxonomy of
//! category, severity and remediation. The catalog is built once and is
//! read-only afterwards. Codes missing from it are reported as
//! [`CodeClass::Unrecognized`] so operators can escalate them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Fault on the authority's side.
    System,
    /// Submitted values were rejected.
    Validation,
    /// An expected, recoverable business state.
    BusinessRule,
    /// The operation succeeded.
    Success,
}

/// Severity of a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Needs attention.
    Medium,
    /// Blocks the filing until fixed.
    High,
    /// Service-level failure.
    Critical,
}

/// One entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// The result code.
    pub code: i32,
    /// Category of the code.
    pub category: ErrorCategory,
    /// Severity of the code.
    pub severity: Severity,
    /// Short description.
    pub title: String,
    /// What the caller should do.
    pub remediation: String,
}

/// Classification of a code against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass<'a> {
    /// The code is in the catalog.
    Known(&'a ErrorEntry),
    /// The code is not mapped and needs investigation.
    Unrecognized(i32),
}

impl CodeClass<'_> {
    /// Returns true for codes the catalog does not know.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, CodeClass::Unrecognized(_))
    }
}

impl fmt::Display for CodeClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeClass::Known(entry) => write!(f, "{:?}/{:?}", entry.category, entry.severity),
            CodeClass::Unrecognized(code) => write!(f, "unrecognized code {}", code),
        }
    }
}

/// The read-only code catalog.
///
/// # Example
///
/// ```
/// use sgk_gateway::catalog::{CodeClass, ErrorCatalog, ErrorCategory};
///
/// let catalog = ErrorCatalog::standard();
/// let entry = catalog.lookup(-1).unwrap();
/// assert_eq!(entry.category, ErrorCategory::Validation);
/// assert!(matches!(catalog.classify(12345), CodeClass::Unrecognized(12345)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCatalog {
    entries: BTreeMap<i32, ErrorEntry>,
}

impl ErrorCatalog {
    /// The built-in catalog.
    pub fn standard() -> Self {
        Self::from_entries(standard_entries())
    }

    /// Builds a catalog from entries; later entries replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = ErrorEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.code, e)).collect(),
        }
    }

    /// Returns the built-in catalog extended with `extra` entries.
    pub fn standard_with(extra: impl IntoIterator<Item = ErrorEntry>) -> Self {
        Self::from_entries(standard_entries().into_iter().chain(extra))
    }

    /// Looks up a code.
    pub fn lookup(&self, code: i32) -> Option<&ErrorEntry> {
        self.entries.get(&code)
    }

    /// Classifies a code as known or unrecognized.
    pub fn classify(&self, code: i32) -> CodeClass<'_> {
        match self.lookup(code) {
            Some(entry) => CodeClass::Known(entry),
            None => CodeClass::Unrecognized(code),
        }
    }

    /// Iterates over all entries ordered by code.
    pub fn entries(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn entry(
    code: i32,
    category: ErrorCategory,
    severity: Severity,
    title: &str,
    remediation: &str,
) -> ErrorEntry {
    ErrorEntry {
        code,
        category,
        severity,
        title: title.to_string(),
        remediation: remediation.to_string(),
    }
}

fn standard_entries() -> Vec<ErrorEntry> {
    use ErrorCategory::{BusinessRule, Success, System, Validation};
    vec![
        entry(0, Success, Severity::Low, "Success", "No action required"),
        entry(
            1,
            BusinessRule,
            Severity::Medium,
            "No matching record found",
            "Not an error; confirm the queried identifiers",
        ),
        entry(
            2,
            BusinessRule,
            Severity::Medium,
            "Record already active",
            "A filing for this person and date already exists; query it instead of resubmitting",
        ),
        entry(
            -1,
            Validation,
            Severity::High,
            "Operation rejected",
            "Inspect the field-level message and correct the submitted values",
        ),
        entry(
            -101,
            System,
            Severity::Critical,
            "Upstream system fault",
            "Retry later or contact the authority's support channel",
        ),
        entry(
            -102,
            System,
            Severity::High,
            "Service temporarily unavailable",
            "Retry after the authority's maintenance window",
        ),
        entry(
            -201,
            Validation,
            Severity::High,
            "Authentication failed",
            "Verify the username, workplace password and system password for this worksite",
        ),
    ]
}
