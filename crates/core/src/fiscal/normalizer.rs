//! Report date normalization against the accounting period catalogue.
//!
//! Two rules apply before any statement is computed:
//!
//! - **Cutover.** When a closed "Opening Balances" period exists, the day
//!   after it ends is the cutover date. Ranges are clipped to start no
//!   earlier than the cutover, and point-in-time requests before it are
//!   rejected.
//! - **Coverage.** Every day of the (clipped) range must fall inside some
//!   accounting period. Overlapping periods are fine; holes are not.

use chrono::NaiveDate;
use thiserror::Error;
use tieout_shared::types::DateRange;

use super::period::AccountingPeriod;

/// Errors raised while normalizing report dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizerError {
    /// Some day of the range is not inside any accounting period.
    #[error("Accounting periods do not cover {range}: first uncovered date {first_uncovered}")]
    CoverageGap {
        /// Range that was checked.
        range: DateRange,
        /// Earliest day with no period.
        first_uncovered: NaiveDate,
    },

    /// Point-in-time request before the cutover date.
    #[error("As-of date {as_of} is before the cutover date {cutover}")]
    CutoverViolation {
        /// Requested date.
        as_of: NaiveDate,
        /// Cutover date.
        cutover: NaiveDate,
    },
}

/// Outcome of normalizing a requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeResolution {
    /// The whole range lies before the cutover; the report is all zeros.
    BeforeCutover,
    /// The range to compute, clipped to the cutover and fully covered.
    Effective(DateRange),
}

/// Applies the cutover and coverage rules.
pub struct PeriodNormalizer;

impl PeriodNormalizer {
    /// The cutover date: the day after the latest closed "Opening Balances"
    /// period ends, or `None` if there is no such period.
    #[must_use]
    pub fn cutover_date(periods: &[AccountingPeriod]) -> Option<NaiveDate> {
        periods
            .iter()
            .filter(|p| p.is_closed_opening_balances())
            .max_by_key(|p| (p.start_date, p.end_date))
            .and_then(|p| p.end_date.succ_opt())
    }

    /// Clips `requested` to the cutover and checks coverage of what remains.
    ///
    /// # Errors
    ///
    /// Returns `NormalizerError::CoverageGap` if the effective range has a hole.
    pub fn resolve_range(
        periods: &[AccountingPeriod],
        requested: DateRange,
    ) -> Result<RangeResolution, NormalizerError> {
        let effective = match Self::cutover_date(periods) {
            Some(cutover) if requested.to < cutover => return Ok(RangeResolution::BeforeCutover),
            Some(cutover) if requested.from < cutover => DateRange {
                from: cutover,
                to: requested.to,
            },
            _ => requested,
        };

        Self::ensure_covered(periods, effective)?;
        Ok(RangeResolution::Effective(effective))
    }

    /// Validates a point-in-time date.
    ///
    /// The date must not precede the cutover, and every day from the cutover
    /// (or the first period, when there is no cutover) up to `as_of` must be
    /// covered.
    ///
    /// # Errors
    ///
    /// Returns `NormalizerError::CutoverViolation` or `NormalizerError::CoverageGap`.
    pub fn check_as_of(periods: &[AccountingPeriod], as_of: NaiveDate) -> Result<(), NormalizerError> {
        let start = match Self::cutover_date(periods) {
            Some(cutover) if as_of < cutover => {
                return Err(NormalizerError::CutoverViolation { as_of, cutover });
            }
            Some(cutover) => cutover,
            None => periods
                .iter()
                .map(|p| p.start_date)
                .min()
                .filter(|first| *first <= as_of)
                .ok_or(NormalizerError::CoverageGap {
                    range: DateRange::single(as_of),
                    first_uncovered: as_of,
                })?,
        };

        Self::ensure_covered(
            periods,
            DateRange {
                from: start,
                to: as_of,
            },
        )
    }

    /// Checks that every day of `range` lies inside at least one period.
    ///
    /// # Errors
    ///
    /// Returns `NormalizerError::CoverageGap` naming the first uncovered day.
    pub fn ensure_covered(
        periods: &[AccountingPeriod],
        range: DateRange,
    ) -> Result<(), NormalizerError> {
        let mut sorted: Vec<&AccountingPeriod> = periods
            .iter()
            .filter(|p| p.start_date <= p.end_date && p.range().overlaps(&range))
            .collect();
        sorted.sort_by_key(|p| (p.start_date, p.end_date));

        let gap = |first_uncovered| NormalizerError::CoverageGap {
            range,
            first_uncovered,
        };

        let mut cursor = range.from;
        for period in sorted {
            if period.end_date < cursor {
                continue;
            }
            if period.start_date > cursor {
                return Err(gap(cursor));
            }
            match period.end_date.succ_opt() {
                Some(next) if next <= range.to => cursor = next,
                _ => return Ok(()),
            }
        }

        Err(gap(cursor))
    }
}
