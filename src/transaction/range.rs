//! Date-range resolution for the ledger's date filter presets.

use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// The date filter presets offered on the transactions page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatePreset {
    /// The current calendar month.
    #[default]
    ThisMonth,
    /// The previous calendar month.
    LastMonth,
    /// A user-supplied start and/or end date.
    Custom,
    /// No date constraint.
    All,
}

impl DatePreset {
    /// The value used for this preset in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
            Self::Custom => "custom",
            Self::All => "all",
        }
    }

    /// The display label for this preset.
    pub fn label(self) -> &'static str {
        match self {
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::Custom => "Custom Range",
            Self::All => "All Time",
        }
    }
}

/// Every date preset, in display order.
pub const DATE_PRESETS: [DatePreset; 4] = [
    DatePreset::ThisMonth,
    DatePreset::LastMonth,
    DatePreset::Custom,
    DatePreset::All,
];

/// An inclusive range of calendar days, unbounded on either side when a
/// bound is `None`.
///
/// Transactions carry day-precision dates, so "the last day of the month at
/// 23:59:59" and "the last day of the month" describe the same inclusive
/// upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    /// The first day in the range, or `None` for no lower bound.
    pub start: Option<Date>,
    /// The last day in the range (inclusive), or `None` for no upper bound.
    pub end: Option<Date>,
}

impl DateBounds {
    /// Whether `date` falls within the bounds.
    ///
    /// A missing bound matches everything on that side. Bounds with
    /// `start > end` (a user-input condition this module does not validate)
    /// simply match nothing.
    pub fn contains(self, date: Date) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }

        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }

        true
    }
}

/// Resolve a date filter preset into concrete bounds.
///
/// `custom_start`/`custom_end` are only consulted for [DatePreset::Custom],
/// where an absent bound widens that side of the range rather than rejecting
/// the filter. `today` anchors the month presets and should be the current
/// date in the server's local timezone.
pub fn resolve_date_bounds(
    preset: DatePreset,
    custom_start: Option<Date>,
    custom_end: Option<Date>,
    today: Date,
) -> DateBounds {
    match preset {
        DatePreset::ThisMonth => month_bounds(today.year(), today.month()),
        DatePreset::LastMonth => {
            let (year, month) = previous_month(today.year(), today.month());
            month_bounds(year, month)
        }
        DatePreset::Custom => DateBounds {
            start: custom_start,
            end: custom_end,
        },
        DatePreset::All => DateBounds::default(),
    }
}

fn month_bounds(year: i32, month: Month) -> DateBounds {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    DateBounds {
        start: Some(start),
        end: Some(end),
    }
}

fn previous_month(year: i32, month: Month) -> (i32, Month) {
    if month == Month::January {
        (year - 1, Month::December)
    } else {
        (year, month.previous())
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
