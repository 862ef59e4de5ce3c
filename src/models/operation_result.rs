//! Typed results of round trips with the registration service.
//!
//! A zero top-level code does not mean every record succeeded: callers must
//! inspect each [`RecordResult`] on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PenaltyAssessment;

/// Identifying fields the service echoed back for a record.
///
/// Every field is optional: an absent element stays `None` and never turns
/// into an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectEcho {
    /// Echoed national id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    /// Echoed given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Echoed family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Echoed hire or termination date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    /// Echoed profession code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession_code: Option<String>,
}

/// Outcome for one submitted or queried record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResult {
    /// Per-record result code; `None` when the service sent none.
    pub result_code: Option<i32>,
    /// Per-record message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Reference code used to fetch the confirmation document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Registry number assigned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_number: Option<String>,
    /// Fields echoed by the service.
    pub subject_echo: SubjectEcho,
    /// Advisory late-filing estimate, attached to hire submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<PenaltyAssessment>,
}

impl RecordResult {
    /// Placeholder for a submitted record the service returned no entry for.
    pub fn missing() -> Self {
        Self {
            message: Some("The service returned no result for this record".to_string()),
            ..Self::default()
        }
    }

    /// Returns true when the record's own code is zero.
    pub fn is_accepted(&self) -> bool {
        self.result_code == Some(0)
    }
}

/// Result of one operation round trip.
///
/// # Example
///
/// ```
/// use sgk_gateway::models::{OperationResult, RecordResult};
///
/// let result = OperationResult {
///     top_level_code: Some(0),
///     top_level_message: None,
///     records: vec![
///         RecordResult { result_code: Some(0), ..RecordResult::default() },
///         RecordResult { result_code: Some(-1), ..RecordResult::default() },
///     ],
/// };
/// assert!(result.is_top_level_success());
/// assert!(!result.all_records_accepted());
/// assert_eq!(result.rejected_records().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Top-level code; `None` when the service sent none.
    pub top_level_code: Option<i32>,
    /// Top-level message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_message: Option<String>,
    /// Per-record outcomes, in submission order.
    pub records: Vec<RecordResult>,
}

impl OperationResult {
    /// Returns true when the top-level code is zero.
    pub fn is_top_level_success(&self) -> bool {
        self.top_level_code == Some(0)
    }

    /// Returns true only when the top-level code and every record code are zero.
    pub fn all_records_accepted(&self) -> bool {
        self.is_top_level_success() && self.records.iter().all(RecordResult::is_accepted)
    }

    /// Iterates over records whose own code is not zero.
    pub fn rejected_records(&self) -> impl Iterator<Item = (usize, &RecordResult)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.is_accepted())
    }
}

/// Which confirmation document is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Confirmation of a hire notification.
    Hire,
    /// Confirmation of a termination notification.
    Termination,
}

/// A confirmation document retrieved by reference code.
///
/// The core never writes the document to disk; the caller persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationDocument {
    /// The document kind.
    pub kind: DocumentKind,
    /// Reference code the document was requested with.
    pub reference_code: String,
    /// Top-level code of the document call.
    pub top_level_code: Option<i32>,
    /// Top-level message of the document call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_message: Option<String>,
    /// Decoded document bytes, present when the service returned a document.
    #[serde(skip)]
    pub content: Option<Vec<u8>>,
}

impl ConfirmationDocument {
    /// Returns the document bytes when the service returned any.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.content.as_deref().filter(|bytes| !bytes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_top_level_code_does_not_imply_record_success() {
        let result = OperationResult {
            top_level_code: Some(0),
            top_level_message: Some("OK".to_string()),
            records: vec![
                RecordResult {
                    result_code: Some(0),
                    ..RecordResult::default()
                },
                RecordResult {
                    result_code: Some(-1),
                    message: Some("already active".to_string()),
                    ..RecordResult::default()
                },
            ],
        };
        assert!(result.is_top_level_success());
        assert!(!result.all_records_accepted());
        let rejected: Vec<usize> = result.rejected_records().map(|(i, _)| i).collect();
        assert_eq!(rejected, vec![1]);
    }

    #[test]
    fn test_missing_record_is_not_accepted() {
        let record = RecordResult::missing();
        assert!(!record.is_accepted());
        assert!(record.result_code.is_none());
    }

    #[test]
    fn test_subject_echo_skips_absent_fields() {
        let echo = SubjectEcho {
            national_id: Some("10000000146".to_string()),
            ..SubjectEcho::default()
        };
        let json = serde_json::to_string(&echo).unwrap();
        assert_eq!(json, r#"{"national_id":"10000000146"}"#);
    }

    #[test]
    fn test_empty_document_content_is_not_available() {
        let document = ConfirmationDocument {
            kind: DocumentKind::Hire,
            reference_code: "REF".to_string(),
            top_level_code: Some(0),
            top_level_message: None,
            content: Some(vec![]),
        };
        assert!(document.bytes().is_none());
    }
}
