//! HTTP API module for the SGK gateway.
//!
//! This module provides a JSON facade for the presentation layer: local
//! rule checks (national id, pay periods, work duration, penalties, result
//! codes) and the gateway operations. Protocol types never appear in its
//! requests or responses.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{GatewayStatus, NationalIdResponse, create_router};
pub use request::{
    HireSubmission, NationalIdRequest, PenaltyRequest, PeriodRequest, TerminationSubmission,
    WorkDurationRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
