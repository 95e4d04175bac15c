//! The forecast horizon window and calendar helpers.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing [`HorizonWindow`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("horizon end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("horizon of {days} days from {start} is past the last representable date")]
    OutOfRange { start: NaiveDate, days: u32 },
}

/// Inclusive date range within which occurrences are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HorizonWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering `today` through `today + days`.
    pub fn forward_from(today: NaiveDate, days: u32) -> Result<Self, WindowError> {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(WindowError::OutOfRange { start: today, days })?;
        Ok(Self { start: today, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Number of days in the given month, or `None` for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}

/// Returns the date on `day` of the month `months` after `date`'s month,
/// clamped to that month's last day.
pub fn shift_month_clamped(date: NaiveDate, months: i32, day: u32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = day.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole months between the month of `from` and the month of `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() * 12 + to.month0() as i32) - (from.year() * 12 + from.month0() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_rejects_inverted_range() {
        let err = HorizonWindow::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, WindowError::InvalidRange { .. }));
        assert!(HorizonWindow::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = HorizonWindow::forward_from(date(2024, 1, 1), 21).unwrap();
        assert!(matches!(
            HorizonWindow::forward_from(date(2024, 1, 1), u32::MAX),
            Err(WindowError::OutOfRange { days: u32::MAX, .. })
        ));
        assert_eq!(window.end, date(2024, 1, 22));
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 22)));
        assert!(!window.contains(date(2024, 1, 23)));
    }

    #[test]
    fn month_shift_clamps_and_wraps_years() {
        assert_eq!(
            shift_month_clamped(date(2024, 1, 31), 1, 31),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            shift_month_clamped(date(2023, 1, 31), 1, 31),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            shift_month_clamped(date(2024, 11, 30), 3, 30),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            shift_month_clamped(date(2024, 1, 15), -1, 15),
            Some(date(2023, 12, 15))
        );
    }

    #[test]
    fn days_in_month_handles_december_and_leap_years() {
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2100, 2), Some(28));
        assert_eq!(days_in_month(2024, 13), None);
    }
}
