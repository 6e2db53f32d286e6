//! Request parameter validation for the pictures endpoint.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use pictures_common::Rover;

/// Outcome of validating request parameters.
///
/// `reason` is present exactly when the request is invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Validate the rover and date query parameters.
///
/// Rules are checked in order and the first failure wins. The date check is
/// purely syntactic (four digits, hyphen, two digits, hyphen, two digits);
/// calendar validity is not checked here, so "2015-13-99" passes.
pub fn validate_request(rover: Option<&str>, date: Option<&str>) -> ValidationResult {
    let rover = match rover {
        Some(r) if !r.is_empty() => r,
        _ => return ValidationResult::fail("No Rover Provided"),
    };

    if Rover::from_str(rover).is_err() {
        return ValidationResult::fail(format!(
            "Invalid Rover Provided. Valid Rovers are: {}. Provided: {}",
            Rover::valid_names(),
            rover
        ));
    }

    let date = match date {
        Some(d) if !d.is_empty() => d,
        _ => return ValidationResult::fail("No Date Provided"),
    };

    if !has_canonical_date_shape(date) {
        return ValidationResult::fail(format!(
            "Invalid Date Provided. Valid Dates must be in the form YYYY-MM-DD. Provided: {}",
            date
        ));
    }

    ValidationResult::pass()
}

/// Anchored `\d{4}-\d{2}-\d{2}` check.
fn has_canonical_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit())
        && bytes[7] == b'-'
        && bytes[8..].iter().all(|b| b.is_ascii_digit())
}
