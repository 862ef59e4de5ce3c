//! Identity number, registry id and profession code checks.
//!
//! These are pure functions with no logging or network dependency.

use thiserror::Error;

use crate::error::{ValidationError, ValidationRule};

/// Length of a national identity number.
pub const NATIONAL_ID_LENGTH: usize = 11;

/// Length of an employer registry id.
pub const REGISTRY_ID_LENGTH: usize = 26;

/// Validates a national identity number.
///
/// The number must be exactly 11 ASCII digits, and its last two digits must
/// match the two checksum digits:
///
/// - digit 10 = (sum of digits 1,3,5,7,9 × 7 − sum of digits 2,4,6,8) mod 10
/// - digit 11 = (sum of digits 1..=9 + digit 10) mod 10
///
/// # Example
///
/// ```
/// use sgk_gateway::validation::validate_national_id;
///
/// assert!(validate_national_id("10000000146"));
/// assert!(!validate_national_id("10000000147"));
/// assert!(!validate_national_id("1000000014"));
/// ```
pub fn validate_national_id(id: &str) -> bool {
    check_national_id(id).is_ok()
}

/// Validates a national identity number, reporting which rule failed.
pub fn check_national_id(id: &str) -> Result<(), ValidationError> {
    let digits = parse_digits(id).filter(|digits| digits.len() == NATIONAL_ID_LENGTH);
    let Some(digits) = digits else {
        return Err(ValidationError::new(
            "national_id",
            ValidationRule::NationalIdFormat,
            format!(
                "national id must be exactly {} digits, got '{}'",
                NATIONAL_ID_LENGTH, id
            ),
        ));
    };

    let (tenth, eleventh) = national_id_checksum(&digits[..9]);
    if digits[9] != tenth || digits[10] != eleventh {
        return Err(ValidationError::new(
            "national_id",
            ValidationRule::NationalIdChecksum,
            format!("national id '{}' fails the checksum; check for a mistyped digit", id),
        ));
    }
    Ok(())
}

/// Computes the two checksum digits for the first nine digits of a national id.
pub fn national_id_checksum(first_nine: &[u32]) -> (u32, u32) {
    let odd: i64 = first_nine.iter().step_by(2).map(|&d| i64::from(d)).sum();
    let even: i64 = first_nine.iter().skip(1).step_by(2).map(|&d| i64::from(d)).sum();
    let tenth = (odd * 7 - even).rem_euclid(10) as u32;
    let total: u32 = first_nine.iter().sum();
    let eleventh = (total + tenth) % 10;
    (tenth, eleventh)
}

/// Validates an employer registry id: exactly 26 ASCII digits.
pub fn validate_registry_id(id: &str) -> bool {
    id.len() == REGISTRY_ID_LENGTH && id.bytes().all(|b| b.is_ascii_digit())
}

/// Validates a registry id held in `field`, reporting a field-level error.
pub fn check_registry_id(field: &str, id: &str) -> Result<(), ValidationError> {
    if validate_registry_id(id) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            ValidationRule::RegistryIdFormat,
            format!(
                "registry id must be exactly {} digits, got {} characters",
                REGISTRY_ID_LENGTH,
                id.chars().count()
            ),
        ))
    }
}

fn parse_digits(value: &str) -> Option<Vec<u32>> {
    value.chars().map(|c| c.to_digit(10)).collect()
}

/// Why a profession code was rejected.
///
/// Each variant carries its own message so a caller can show the exact fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfessionCodeError {
    /// No `.` between the two segments.
    #[error("profession code '{code}' must contain a '.' between the 4-digit group and the 2-3 digit suffix")]
    MissingSeparator {
        /// The rejected code.
        code: String,
    },

    /// A segment contains something other than digits.
    #[error("profession code '{code}' may only contain digits around a single '.'")]
    NonDigit {
        /// The rejected code.
        code: String,
    },

    /// The part before the `.` has fewer than 4 digits.
    #[error("profession code '{code}' has only {digits} digit(s) before the '.'; 4 are required")]
    PrimaryTooShort {
        /// The rejected code.
        code: String,
        /// Digits found before the separator.
        digits: usize,
    },

    /// The part before the `.` has more than 4 digits.
    #[error("profession code '{code}' has {digits} digits before the '.'; at most 4 are allowed")]
    PrimaryTooLong {
        /// The rejected code.
        code: String,
        /// Digits found before the separator.
        digits: usize,
    },

    /// The part after the `.` has fewer than 2 digits.
    #[error("profession code '{code}' has only {digits} digit(s) after the '.'; 2 or 3 are required")]
    SecondaryTooShort {
        /// The rejected code.
        code: String,
        /// Digits found after the separator.
        digits: usize,
    },

    /// The part after the `.` has more than 3 digits.
    #[error("profession code '{code}' has {digits} digits after the '.'; at most 3 are allowed")]
    SecondaryTooLong {
        /// The rejected code.
        code: String,
        /// Digits found after the separator.
        digits: usize,
    },

    /// The 4-digit group is below 1000.
    #[error("profession code '{code}' starts with {value}; the 4-digit group must be between 1000 and 9999")]
    PrimaryOutOfRange {
        /// The rejected code.
        code: String,
        /// Numeric value of the group.
        value: u32,
    },

    /// The suffix is below 10.
    #[error("profession code '{code}' ends with {value}; the suffix must be between 10 and 999")]
    SecondaryOutOfRange {
        /// The rejected code.
        code: String,
        /// Numeric value of the suffix.
        value: u32,
    },
}

impl ProfessionCodeError {
    /// The rule category this failure belongs to.
    pub fn rule(&self) -> ValidationRule {
        match self {
            Self::PrimaryOutOfRange { .. } | Self::SecondaryOutOfRange { .. } => {
                ValidationRule::ProfessionCodeRange
            }
            _ => ValidationRule::ProfessionCodeFormat,
        }
    }
}

impl From<ProfessionCodeError> for ValidationError {
    fn from(error: ProfessionCodeError) -> Self {
        ValidationError::new("profession_code", error.rule(), error.to_string())
    }
}

/// Validates a profession code of the form `NNNN.NN` or `NNNN.NNN`.
///
/// The field is optional: an empty or blank code is accepted as absent.
///
/// # Example
///
/// ```
/// use sgk_gateway::validation::{validate_profession_code, ProfessionCodeError};
///
/// assert!(validate_profession_code("2421.07").is_err());
/// assert!(validate_profession_code("2421.17").is_ok());
/// assert!(validate_profession_code("").is_ok());
/// assert!(matches!(
///     validate_profession_code("123.4"),
///     Err(ProfessionCodeError::PrimaryTooShort { digits: 3, .. })
/// ));
/// ```
pub fn validate_profession_code(code: &str) -> Result<(), ProfessionCodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Ok(());
    }
    let owned = || code.to_string();

    let Some((primary, secondary)) = code.split_once('.') else {
        return Err(ProfessionCodeError::MissingSeparator { code: owned() });
    };
    let all_digits = |segment: &str| segment.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(primary) || !all_digits(secondary) {
        return Err(ProfessionCodeError::NonDigit { code: owned() });
    }

    match primary.len() {
        0..=3 => {
            return Err(ProfessionCodeError::PrimaryTooShort {
                code: owned(),
                digits: primary.len(),
            });
        }
        4 => {}
        digits => {
            return Err(ProfessionCodeError::PrimaryTooLong {
                code: owned(),
                digits,
            });
        }
    }
    match secondary.len() {
        0..=1 => {
            return Err(ProfessionCodeError::SecondaryTooShort {
                code: owned(),
                digits: secondary.len(),
            });
        }
        2 | 3 => {}
        digits => {
            return Err(ProfessionCodeError::SecondaryTooLong {
                code: owned(),
                digits,
            });
        }
    }

    // Both segments are short digit runs here, so parsing cannot overflow.
    let primary_value: u32 = primary.parse().unwrap_or(0);
    let secondary_value: u32 = secondary.parse().unwrap_or(0);
    if !(1000..=9999).contains(&primary_value) {
        return Err(ProfessionCodeError::PrimaryOutOfRange {
            code: owned(),
            value: primary_value,
        });
    }
    if !(10..=999).contains(&secondary_value) {
        return Err(ProfessionCodeError::SecondaryOutOfRange {
            code: owned(),
            value: secondary_value,
        });
    }
    Ok(())
}
