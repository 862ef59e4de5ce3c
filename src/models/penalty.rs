//! Late-notification penalty assessment model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Penalty band derived from the number of late days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyTier {
    /// Filed on or before the hire date.
    None,
    /// 1 to 30 days late.
    Low,
    /// More than 30 days late.
    High,
}

/// Advisory estimate of the administrative penalty for a late filing.
///
/// Amounts are indicative only. The authority determines the actual penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyAssessment {
    /// True when the filing is late.
    pub has_penalty: bool,
    /// Days between the hire date and the reference date, never negative.
    pub late_days: i64,
    /// Penalty band.
    pub tier: PenaltyTier,
    /// Indicative amount for the band.
    pub estimated_amount: Decimal,
    /// Human-readable summary.
    pub message: String,
}

impl PenaltyAssessment {
    /// An assessment for a compliant filing.
    pub fn compliant() -> Self {
        Self {
            has_penalty: false,
            late_days: 0,
            tier: PenaltyTier::None,
            estimated_amount: Decimal::ZERO,
            message: "Filed on time; no late-notification penalty applies".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliant_assessment() {
        let assessment = PenaltyAssessment::compliant();
        assert!(!assessment.has_penalty);
        assert_eq!(assessment.tier, PenaltyTier::None);
        assert_eq!(assessment.estimated_amount, Decimal::ZERO);
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_string(&PenaltyTier::High).unwrap(), "\"high\"");
    }
}
