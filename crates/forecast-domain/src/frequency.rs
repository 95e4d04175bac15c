use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrequencyError {
    #[error("unrecognized frequency tag `{0}`")]
    Unknown(String),
}

/// Recurrence tags understood by the budgeting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    Never,
    Daily,
    Weekly,
    EveryOtherWeek,
    TwiceAMonth,
    Every4Weeks,
    Monthly,
    EveryOtherMonth,
    Every3Months,
    Every4Months,
    TwiceAYear,
    Yearly,
    EveryOtherYear,
}

/// How a frequency advances from one occurrence to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Fixed number of days per step.
    Days(i64),
    /// Same (clamped) day-of-month every N months.
    Months(u32),
    /// The anchor's day and the day fifteen days away, every month.
    SemiMonthly,
}

impl Frequency {
    pub const ALL: [Frequency; 13] = [
        Frequency::Never,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::EveryOtherWeek,
        Frequency::TwiceAMonth,
        Frequency::Every4Weeks,
        Frequency::Monthly,
        Frequency::EveryOtherMonth,
        Frequency::Every3Months,
        Frequency::Every4Months,
        Frequency::TwiceAYear,
        Frequency::Yearly,
        Frequency::EveryOtherYear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Never => "never",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::EveryOtherWeek => "everyOtherWeek",
            Frequency::TwiceAMonth => "twiceAMonth",
            Frequency::Every4Weeks => "every4Weeks",
            Frequency::Monthly => "monthly",
            Frequency::EveryOtherMonth => "everyOtherMonth",
            Frequency::Every3Months => "every3Months",
            Frequency::Every4Months => "every4Months",
            Frequency::TwiceAYear => "twiceAYear",
            Frequency::Yearly => "yearly",
            Frequency::EveryOtherYear => "everyOtherYear",
        }
    }

    /// Stepping rule for the frequency. One-time entries have none.
    pub fn cadence(self) -> Option<Cadence> {
        match self {
            Frequency::Never => None,
            Frequency::Daily => Some(Cadence::Days(1)),
            Frequency::Weekly => Some(Cadence::Days(7)),
            Frequency::EveryOtherWeek => Some(Cadence::Days(14)),
            Frequency::Every4Weeks => Some(Cadence::Days(28)),
            Frequency::TwiceAMonth => Some(Cadence::SemiMonthly),
            Frequency::Monthly => Some(Cadence::Months(1)),
            Frequency::EveryOtherMonth => Some(Cadence::Months(2)),
            Frequency::Every3Months => Some(Cadence::Months(3)),
            Frequency::Every4Months => Some(Cadence::Months(4)),
            Frequency::TwiceAYear => Some(Cadence::Months(6)),
            Frequency::Yearly => Some(Cadence::Months(12)),
            Frequency::EveryOtherYear => Some(Cadence::Months(24)),
        }
    }

    pub fn is_recurring(self) -> bool {
        self.cadence().is_some()
    }
}

impl FromStr for Frequency {
    type Err = FrequencyError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == tag)
            .ok_or_else(|| FrequencyError::Unknown(tag.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
