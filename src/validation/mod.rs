//! Local validation performed before any network attempt.
//!
//! Identity checks are exposed as plain predicates for the presentation
//! layer; the batch chains are what the gateway runs before a submission.

mod identity;
mod records;

pub use identity::{
    NATIONAL_ID_LENGTH, ProfessionCodeError, REGISTRY_ID_LENGTH, check_national_id,
    check_registry_id, national_id_checksum, validate_national_id, validate_profession_code,
    validate_registry_id,
};
pub use records::{
    MAX_MISSING_DAYS, MAX_NAME_LENGTH, MAX_PARTIAL_TIME_DAYS, MIN_PARTIAL_TIME_DAYS,
    PROTOCOL_MAX_BATCH_SIZE, validate_batch_size, validate_hire_batch, validate_termination_batch,
};
