//! Report date parameters.
//!
//! All reporting comparisons are date-only. Callers may hand us timestamps;
//! the time of day is dropped and the date as written is kept, so a late
//! evening timestamp with a timezone offset never shifts into the next day.

use chrono::{DateTime, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building report date parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    /// The input is neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    #[error("Unparsable date: {0}")]
    Unparsable(String),

    /// Start date is after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    Inverted {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

/// Parses a report date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `DateRangeError::Unparsable` for anything else.
pub fn parse_report_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|_| DateRangeError::Unparsable(input.to_string()))
}

/// An inclusive range of calendar dates.
///
/// Deserialisation goes through [`DateRange::new`], so an inverted range
/// never arrives from the wire. Ranges built from the public fields should
/// be passed through [`DateRange::validated`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.from, raw.to)
    }
}

impl DateRange {
    /// Creates a range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns `DateRangeError::Inverted` when the start is after the end.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::Inverted {
                start: from,
                end: to,
            });
        }
        Ok(Self { from, to })
    }

    /// Parses both ends with [`parse_report_date`].
    ///
    /// # Errors
    ///
    /// Returns an error if either end is unparsable or the range is inverted.
    pub fn parse(from: &str, to: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_report_date(from)?, parse_report_date(to)?)
    }

    /// Re-checks a range that may have been built field by field.
    ///
    /// # Errors
    ///
    /// Returns `DateRangeError::Inverted` when the start is after the end.
    pub fn validated(self) -> Result<Self, DateRangeError> {
        Self::new(self.from, self.to)
    }

    /// A single-day range.
    #[must_use]
    pub const fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Returns true if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    /// The day before the range starts, used for opening positions.
    #[must_use]
    pub fn day_before(&self) -> Option<NaiveDate> {
        self.from.checked_sub_days(Days::new(1))
    }

    /// Number of days in the range (inclusive).
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_report_date("2024-03-01").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn test_parse_timestamp_keeps_written_date() {
        // 23:30 at UTC-05:00 is already the next day in UTC.
        assert_eq!(
            parse_report_date("2024-02-29T23:30:00-05:00").unwrap(),
            d(2024, 2, 29)
        );
        assert_eq!(
            parse_report_date("2024-03-01T00:15:00+09:00").unwrap(),
            d(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_report_date("31/01/2024"),
            Err(DateRangeError::Unparsable(_))
        ));
        assert!(parse_report_date("").is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            DateRange::new(d(2024, 2, 1), d(2024, 1, 1)),
            Err(DateRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_validated_rejects_hand_built_inversion() {
        let inverted = DateRange {
            from: d(2024, 3, 31),
            to: d(2024, 3, 1),
        };
        assert!(matches!(
            inverted.validated(),
            Err(DateRangeError::Inverted { .. })
        ));
        assert_eq!(DateRange::single(d(2024, 3, 1)).validated().unwrap(), DateRange::single(d(2024, 3, 1)));
    }

    #[test]
    fn test_range_helpers() {
        let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
        assert!(range.contains(d(2024, 1, 15)));
        assert!(!range.contains(d(2024, 2, 1)));
        assert_eq!(range.days(), 31);
        assert_eq!(range.day_before(), Some(d(2023, 12, 31)));
        assert!(range.overlaps(&DateRange::single(d(2024, 1, 31))));
        assert!(!range.overlaps(&DateRange::single(d(2024, 2, 1))));
        assert_eq!(range.to_string(), "2024-01-01..2024-01-31");
    }
}
