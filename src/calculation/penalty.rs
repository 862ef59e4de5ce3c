//! Late-notification penalty estimation.
//!
//! The estimate is advisory. It annotates a submission and never blocks it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{PenaltyAssessment, PenaltyTier};

/// Indicative penalty bands.
///
/// The authority sets the real amounts; these values only drive the warning
/// shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PenaltySchedule {
    /// Last late day that still falls in the low band.
    #[serde(default = "default_low_tier_max_days")]
    pub low_tier_max_days: i64,
    /// Indicative amount for the low band.
    #[serde(default = "default_low_tier_amount")]
    pub low_tier_amount: Decimal,
    /// Indicative amount for the high band.
    #[serde(default = "default_high_tier_amount")]
    pub high_tier_amount: Decimal,
}

fn default_low_tier_max_days() -> i64 {
    30
}

fn default_low_tier_amount() -> Decimal {
    Decimal::new(100000, 2)
}

fn default_high_tier_amount() -> Decimal {
    Decimal::new(500000, 2)
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self {
            low_tier_max_days: default_low_tier_max_days(),
            low_tier_amount: default_low_tier_amount(),
            high_tier_amount: default_high_tier_amount(),
        }
    }
}

impl PenaltySchedule {
    /// Estimates the penalty for a hire filed on `reference_date`.
    ///
    /// Filings on or before the hire date are compliant and report
    /// `late_days` of 0, not the negative day difference.
    pub fn estimate(&self, hire_date: NaiveDate, reference_date: NaiveDate) -> PenaltyAssessment {
        let late_days = (reference_date - hire_date).num_days();
        if late_days <= 0 {
            return PenaltyAssessment::compliant();
        }

        let (tier, estimated_amount) = if late_days <= self.low_tier_max_days {
            (PenaltyTier::Low, self.low_tier_amount)
        } else {
            (PenaltyTier::High, self.high_tier_amount)
        };
        PenaltyAssessment {
            has_penalty: true,
            late_days,
            tier,
            estimated_amount,
            message: format!(
                "Filed {} day(s) after the hire date; indicative penalty {} (final amount is set by the authority)",
                late_days,
                estimated_amount.normalize()
            ),
        }
    }
}

/// Estimates the penalty with the default schedule.
///
/// # Example
///
/// ```
/// use sgk_gateway::calculation::estimate_penalty;
/// use sgk_gateway::models::PenaltyTier;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let hire_date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
/// let assessment = estimate_penalty(hire_date, today);
/// assert!(assessment.has_penalty);
/// assert_eq!(assessment.late_days, 5);
/// assert_eq!(assessment.tier, PenaltyTier::Low);
/// ```
pub fn estimate_penalty(hire_date: NaiveDate, reference_date: NaiveDate) -> PenaltyAssessment {
    PenaltySchedule::default().estimate(hire_date, reference_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_five_days_late_is_low_tier() {
        let assessment = estimate_penalty(today() - Duration::days(5), today());
        assert!(assessment.has_penalty);
        assert_eq!(assessment.late_days, 5);
        assert_eq!(assessment.tier, PenaltyTier::Low);
        assert_eq!(assessment.estimated_amount, Decimal::new(100000, 2));
        assert!(assessment.message.contains("5 day(s)"));
    }

    #[test]
    fn test_future_hire_date_has_no_penalty() {
        let assessment = estimate_penalty(today() + Duration::days(1), today());
        assert!(!assessment.has_penalty);
        assert_eq!(assessment.late_days, 0);
        assert_eq!(assessment.tier, PenaltyTier::None);
    }

    #[test]
    fn test_same_day_filing_has_no_penalty() {
        assert!(!estimate_penalty(today(), today()).has_penalty);
    }

    #[test]
    fn test_early_filing_clamps_late_days_to_zero() {
        let assessment = estimate_penalty(today() + Duration::days(45), today());
        assert_eq!(assessment.late_days, 0);
        assert_eq!(assessment.estimated_amount, Decimal::ZERO);
        assert_eq!(assessment, PenaltyAssessment::compliant());
    }

    #[test]
    fn test_tier_boundary_at_thirty_days() {
        let at_boundary = estimate_penalty(today() - Duration::days(30), today());
        assert_eq!(at_boundary.tier, PenaltyTier::Low);
        let past_boundary = estimate_penalty(today() - Duration::days(31), today());
        assert_eq!(past_boundary.tier, PenaltyTier::High);
        assert_eq!(past_boundary.estimated_amount, Decimal::new(500000, 2));
    }

    #[test]
    fn test_custom_schedule_from_yaml() {
        let schedule: PenaltySchedule =
            serde_yaml::from_str("low_tier_max_days: 10\nhigh_tier_amount: \"9000\"").unwrap();
        assert_eq!(schedule.low_tier_amount, Decimal::new(100000, 2));
        let assessment = schedule.estimate(today() - Duration::days(11), today());
        assert_eq!(assessment.tier, PenaltyTier::High);
        assert_eq!(assessment.estimated_amount, Decimal::new(9000, 0));
    }
}
