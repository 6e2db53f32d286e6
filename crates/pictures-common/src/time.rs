//! Lenient calendar-date normalization.
//!
//! The preload date list is human-entered, so several formats are accepted
//! and normalized to the canonical `YYYY-MM-DD` form used as cache keys:
//!
//! - `2017-02-27` (already canonical)
//! - `02/27/2017` and `02/27/17`
//! - `February 27, 2017` (full or abbreviated month name)
//! - `Feb-27-2017`

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Errors produced while normalizing a raw date string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Unrecognized date format: {0}")]
    UnrecognizedFormat(String),

    #[error("Date component out of range: {0}")]
    OutOfRange(String),
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Normalize a loosely-formatted date string to canonical `YYYY-MM-DD`.
///
/// Overflowing components roll forward instead of failing: a day past the
/// end of its month rolls into the following month(s) (April 31 becomes
/// May 1), and a month past 12 rolls into the following year(s). Zero
/// components have no meaningful roll direction and are rejected.
pub fn normalize_date(input: &str) -> Result<String, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::UnrecognizedFormat(input.to_string()));
    }

    let (year, month, day) = parse_components(trimmed)?;
    let date = rollover(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(trimmed.to_string()))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Extract (year, month, day) from any of the supported formats.
fn parse_components(s: &str) -> Result<(i32, u32, u32), DateParseError> {
    let unrecognized = || DateParseError::UnrecognizedFormat(s.to_string());

    // MM/DD/YYYY or MM/DD/YY
    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 3 {
            return Err(unrecognized());
        }
        let month: u32 = parts[0].parse().map_err(|_| unrecognized())?;
        let day: u32 = parts[1].parse().map_err(|_| unrecognized())?;
        let year = parse_year(parts[2]).ok_or_else(unrecognized)?;
        return Ok((year, month, day));
    }

    // "Month D, YYYY" with a full or abbreviated month name
    if s.contains(' ') {
        let cleaned = s.replace(',', " ");
        let parts: Vec<&str> = cleaned.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(unrecognized());
        }
        let month = month_from_name(parts[0]).ok_or_else(unrecognized)?;
        let day: u32 = parts[1].parse().map_err(|_| unrecognized())?;
        let year: i32 = parts[2].parse().map_err(|_| unrecognized())?;
        return Ok((year, month, day));
    }

    if s.contains('-') {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(unrecognized());
        }
        // Mon-DD-YYYY
        if parts[0].chars().all(|c| c.is_ascii_alphabetic()) {
            let month = month_from_name(parts[0]).ok_or_else(unrecognized)?;
            let day: u32 = parts[1].parse().map_err(|_| unrecognized())?;
            let year: i32 = parts[2].parse().map_err(|_| unrecognized())?;
            return Ok((year, month, day));
        }
        // YYYY-MM-DD
        let year: i32 = parts[0].parse().map_err(|_| unrecognized())?;
        let month: u32 = parts[1].parse().map_err(|_| unrecognized())?;
        let day: u32 = parts[2].parse().map_err(|_| unrecognized())?;
        return Ok((year, month, day));
    }

    Err(unrecognized())
}

/// Parse a 4-digit year verbatim, or pivot a 2-digit year: 00-68 maps to
/// 20xx, 69-99 to 19xx (the same split chrono uses for `%y`).
fn parse_year(s: &str) -> Option<i32> {
    let value: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        if value <= 68 {
            Some(2000 + value)
        } else {
            Some(1900 + value)
        }
    } else {
        Some(value)
    }
}

/// Case-insensitive month lookup accepting full names and prefixes of at
/// least three letters ("sep" and "sept" both match September).
fn month_from_name(name: &str) -> Option<u32> {
    let lowered = name.to_lowercase();
    if lowered.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| *m == lowered || m.starts_with(&lowered))
        .map(|i| i as u32 + 1)
}

/// Resolve possibly-overflowing components to a real calendar date.
///
/// Months past December advance the year; the day is applied as an offset
/// from the first of the month, so excess days spill into later months.
fn rollover(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if month == 0 || day == 0 {
        return None;
    }
    let year = year + ((month - 1) / 12) as i32;
    let month = (month - 1) % 12 + 1;
    let anchor = NaiveDate::from_ymd_opt(year, month, 1)?;
    anchor.checked_add_signed(Duration::days(i64::from(day) - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_passes_through() {
        assert_eq!(normalize_date("2017-02-27").unwrap(), "2017-02-27");
        assert_eq!(normalize_date("2015-12-30").unwrap(), "2015-12-30");
    }

    #[test]
    fn test_slash_format_with_four_digit_year() {
        assert_eq!(normalize_date("02/27/2017").unwrap(), "2017-02-27");
        assert_eq!(normalize_date("12/01/2015").unwrap(), "2015-12-01");
    }

    #[test]
    fn test_slash_format_with_two_digit_year_pivots() {
        assert_eq!(normalize_date("02/27/17").unwrap(), "2017-02-27");
        assert_eq!(normalize_date("07/04/99").unwrap(), "1999-07-04");
        assert_eq!(normalize_date("01/15/68").unwrap(), "2068-01-15");
        assert_eq!(normalize_date("01/15/69").unwrap(), "1969-01-15");
    }

    #[test]
    fn test_month_name_format() {
        assert_eq!(normalize_date("February 27, 2017").unwrap(), "2017-02-27");
        assert_eq!(normalize_date("march 3, 2019").unwrap(), "2019-03-03");
        assert_eq!(normalize_date("Sept 9, 2020").unwrap(), "2020-09-09");
    }

    #[test]
    fn test_abbreviated_month_dash_format() {
        assert_eq!(normalize_date("Feb-27-2017").unwrap(), "2017-02-27");
        assert_eq!(normalize_date("jun-02-2018").unwrap(), "2018-06-02");
    }

    #[test]
    fn test_day_overflow_rolls_into_next_month() {
        assert_eq!(normalize_date("04/31/2017").unwrap(), "2017-05-01");
        assert_eq!(normalize_date("February 30, 2015").unwrap(), "2015-03-02");
    }

    #[test]
    fn test_month_overflow_rolls_into_next_year() {
        assert_eq!(normalize_date("13/15/2020").unwrap(), "2021-01-15");
        assert_eq!(normalize_date("2020-14-01").unwrap(), "2021-02-01");
    }

    #[test]
    fn test_leap_day_is_preserved() {
        assert_eq!(normalize_date("02/29/2016").unwrap(), "2016-02-29");
        // 2015 is not a leap year, so the 29th rolls into March.
        assert_eq!(normalize_date("02/29/2015").unwrap(), "2015-03-01");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(normalize_date("  02/27/2017  ").unwrap(), "2017-02-27");
    }

    #[test]
    fn test_unrecognized_inputs_are_rejected() {
        assert!(normalize_date("").is_err());
        assert!(normalize_date("not a date").is_err());
        assert!(normalize_date("2017/02").is_err());
        assert!(normalize_date("Smarch-01-2017").is_err());
    }

    #[test]
    fn test_zero_components_are_rejected() {
        assert_eq!(
            normalize_date("00/15/2020"),
            Err(DateParseError::OutOfRange("00/15/2020".to_string()))
        );
        assert_eq!(
            normalize_date("05/00/2020"),
            Err(DateParseError::OutOfRange("05/00/2020".to_string()))
        );
    }
}
