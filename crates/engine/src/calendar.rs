//! Month grid for the refill / re-enrollment schedule.
//!
//! The grid is navigated independently of today. Each day gets at most one
//! [`DayMark`]; when several apply, re-enrollment wins over refill, which wins
//! over today.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Days from today of the placeholder refill of a medication without a date.
pub const DEFAULT_REFILL_LEAD_DAYS: u64 = 15;

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days of `month` (1-based) in `year`; `0` for an invalid month.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// The month currently in view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| EngineError::InvalidDate(format!("invalid month {year}-{month:02}")))
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Resets the view to the month of `today`, whatever month is shown.
    #[must_use]
    pub fn jump_to_today(self, today: NaiveDate) -> Self {
        Self::containing(today)
    }

    /// One month forward; stays put at the end of the supported range.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// One month back; stays put at the start of the supported range.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Moves by `months`, negative values going back.
    ///
    /// A shift leaving the supported range keeps the current month.
    #[must_use]
    pub fn shift(self, months: i32) -> Self {
        let delta = Months::new(months.unsigned_abs());
        let first = if months < 0 {
            self.first.checked_sub_months(delta)
        } else {
            self.first.checked_add_months(delta)
        };
        Self {
            first: first.unwrap_or(self.first),
        }
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// 1-based month.
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    #[must_use]
    pub fn days_in_month(self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Weekday of day 1, `0` being Sunday.
    #[must_use]
    pub fn first_weekday(self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// `day` of the month in view, if it exists.
    #[must_use]
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Header label, e.g. `OCTOBER 2026`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month0()], self.year())
    }

    fn month0(self) -> usize {
        self.first.month0() as usize
    }
}

/// Highlight of a single day.
///
/// Variants are ordered by precedence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMark {
    #[default]
    None,
    Today,
    Refill,
    ReEnrollment,
}

/// The dates to highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMarks {
    pub today: NaiveDate,
    pub refill: Option<NaiveDate>,
    pub re_enrollment: Option<NaiveDate>,
}

impl CalendarMarks {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            refill: None,
            re_enrollment: None,
        }
    }

    #[must_use]
    pub fn refill(mut self, date: Option<NaiveDate>) -> Self {
        self.refill = date;
        self
    }

    #[must_use]
    pub fn re_enrollment(mut self, date: Option<NaiveDate>) -> Self {
        self.re_enrollment = date;
        self
    }

    #[must_use]
    pub fn classify(&self, date: NaiveDate) -> DayMark {
        if self.re_enrollment == Some(date) {
            DayMark::ReEnrollment
        } else if self.refill == Some(date) {
            DayMark::Refill
        } else if self.today == date {
            DayMark::Today
        } else {
            DayMark::None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub mark: DayMark,
}

/// A rendered month: blank cells before day 1, then one entry per day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub cursor: MonthCursor,
    pub label: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[must_use]
pub fn month_view(cursor: MonthCursor, marks: &CalendarMarks) -> MonthView {
    let days = (1..=cursor.days_in_month())
        .filter_map(|day| cursor.date(day))
        .map(|date| CalendarDay {
            day: date.day(),
            date,
            mark: marks.classify(date),
        })
        .collect();

    MonthView {
        cursor,
        label: cursor.label(),
        leading_blanks: cursor.first_weekday(),
        days,
    }
}
