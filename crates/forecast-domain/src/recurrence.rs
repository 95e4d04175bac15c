//! Occurrence evaluation for recurring scheduled transactions.

use chrono::{Datelike, Duration, NaiveDate};

use crate::common::{months_between, shift_month_clamped, HorizonWindow};
use crate::frequency::{Cadence, Frequency};

/// Upper bound on occurrences produced for a single master.
pub const MAX_OCCURRENCES: usize = 1024;

const SEMI_MONTHLY_OFFSET: u32 = 15;

/// Computes every occurrence of `frequency` anchored at `anchor` that falls
/// inside `window`, in ascending order.
///
/// Steps are always counted from the anchor, so occurrences before the
/// window are skipped rather than shifting the sequence.
pub fn occurrences(
    frequency: Frequency,
    anchor: NaiveDate,
    window: HorizonWindow,
) -> Vec<NaiveDate> {
    match frequency.cadence() {
        None => single(anchor, window),
        Some(Cadence::Days(step)) => day_steps(anchor, step, window),
        Some(Cadence::Months(step)) => month_steps(anchor, step, window),
        Some(Cadence::SemiMonthly) => semi_monthly(anchor, window),
    }
}

/// The two day-of-month anchors used by semi-monthly schedules, ascending.
pub fn semi_monthly_days(anchor: NaiveDate) -> (u32, u32) {
    let day = anchor.day();
    if day <= SEMI_MONTHLY_OFFSET {
        (day, day + SEMI_MONTHLY_OFFSET)
    } else {
        (day - SEMI_MONTHLY_OFFSET, day)
    }
}

fn single(anchor: NaiveDate, window: HorizonWindow) -> Vec<NaiveDate> {
    if window.contains(anchor) {
        vec![anchor]
    } else {
        Vec::new()
    }
}

fn day_steps(anchor: NaiveDate, step: i64, window: HorizonWindow) -> Vec<NaiveDate> {
    let mut result = Vec::new();
    let mut date = if anchor >= window.start {
        anchor
    } else {
        let behind = (window.start - anchor).num_days();
        let steps = (behind + step - 1).div_euclid(step);
        anchor + Duration::days(steps * step)
    };
    while date <= window.end && result.len() < MAX_OCCURRENCES {
        result.push(date);
        date += Duration::days(step);
    }
    result
}

fn month_steps(anchor: NaiveDate, step: u32, window: HorizonWindow) -> Vec<NaiveDate> {
    let step = step as i32;
    let mut result = Vec::new();
    let mut index = months_between(anchor, window.start).max(0) / step;
    let mut guard = 0usize;

    while result.len() < MAX_OCCURRENCES && guard < MAX_OCCURRENCES * 2 {
        guard += 1;
        let Some(date) = shift_month_clamped(anchor, index * step, anchor.day()) else {
            break;
        };
        if date > window.end {
            break;
        }
        if date >= window.start && date >= anchor {
            result.push(date);
        }
        index += 1;
    }
    result
}

fn semi_monthly(anchor: NaiveDate, window: HorizonWindow) -> Vec<NaiveDate> {
    let (first_day, second_day) = semi_monthly_days(anchor);
    let mut result = Vec::new();
    let mut offset = months_between(anchor, window.start).max(0);
    let mut guard = 0usize;

    'months: while result.len() < MAX_OCCURRENCES && guard < MAX_OCCURRENCES {
        guard += 1;
        for day in [first_day, second_day] {
            let Some(date) = shift_month_clamped(anchor, offset, day) else {
                break 'months;
            };
            if date > window.end {
                break 'months;
            }
            if date >= window.start && date >= anchor {
                result.push(date);
            }
        }
        offset += 1;
    }
    result
}
