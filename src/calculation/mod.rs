//! Calculation logic for the SGK gateway.
//!
//! This module contains pay period boundary computation by employer
//! category, partial-time classification of work spans, and advisory
//! late-notification penalty estimation. All functions are synchronous and
//! free of side effects.

mod penalty;
mod period;

pub use penalty::{PenaltySchedule, estimate_penalty};
pub use period::{
    FULL_TIME_MIN_DAYS, PUBLIC_PERIOD_START_DAY, classify_work_duration,
    classify_work_duration_at, compute_period, compute_period_from_date,
};
