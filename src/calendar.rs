//! Month resolution, day classification, and the coverage table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::{DayCategory, ShiftType};

/// Default head-counts per shift (P, S, M order) for a plain weekday.
pub const WEEKDAY_COVERAGE: [u32; 3] = [1, 2, 2];
/// Default head-counts per shift (P, S, M order) for weekends and holidays.
pub const WEEKEND_HOLIDAY_COVERAGE: [u32; 3] = [2, 2, 3];

/// A calendar month, parsed from the `"YYYY-MM"` request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn num_days(&self) -> u32 {
        let (y, m) = (self.first.year(), self.first.month());
        let next_first = if m == 12 {
            NaiveDate::from_ymd_opt(y + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(y, m + 1, 1)
        }
        .expect("first of the following month is a valid date");
        (next_first - self.first).num_days() as u32
    }

    /// Date of a 1-based day number. Callers guarantee `1 <= day_no <= num_days()`.
    pub fn date(&self, day_no: u32) -> NaiveDate {
        self.first + Duration::days(i64::from(day_no) - 1)
    }

    /// 1-based day number of a date, if it falls inside this month.
    pub fn day_of(&self, date: NaiveDate) -> Option<u32> {
        (date.year() == self.first.year() && date.month() == self.first.month())
            .then(|| date.day())
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The resolved day list of a month with each day's category.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    month: Month,
    categories: Vec<DayCategory>,
}

impl MonthCalendar {
    pub fn new(month: Month, public_holidays: &BTreeSet<u32>, special_days: &BTreeSet<u32>) -> Self {
        let categories = (1..=month.num_days())
            .map(|day_no| {
                if special_days.contains(&day_no) {
                    DayCategory::Special
                } else if public_holidays.contains(&day_no) || is_weekend(month.date(day_no)) {
                    DayCategory::WeekendHoliday
                } else {
                    DayCategory::Weekday
                }
            })
            .collect();
        Self { month, categories }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn num_days(&self) -> usize {
        self.categories.len()
    }

    /// Dates of the month in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.num_days() as u32).map(|day_no| self.month.date(day_no))
    }

    /// Date of a 0-based day index.
    pub fn date(&self, day_idx: usize) -> NaiveDate {
        self.month.date(day_idx as u32 + 1)
    }

    pub fn category(&self, day_idx: usize) -> DayCategory {
        self.categories[day_idx]
    }
}

/// Required head-count per day and shift: special-date literals override the
/// per-category defaults.
#[derive(Debug, Clone, Default)]
pub struct CoverageTable {
    special: BTreeMap<u32, [u32; 3]>,
}

impl CoverageTable {
    pub fn new(special: BTreeMap<u32, [u32; 3]>) -> Self {
        Self { special }
    }

    pub fn special_days(&self) -> BTreeSet<u32> {
        self.special.keys().copied().collect()
    }

    pub fn required(&self, day_no: u32, category: DayCategory, shift: ShiftType) -> u32 {
        if let Some(counts) = self.special.get(&day_no) {
            return counts[shift.index()];
        }
        match category {
            DayCategory::WeekendHoliday => WEEKEND_HOLIDAY_COVERAGE[shift.index()],
            // Special without a literal vector cannot occur: the calendar is
            // built from this table's own key set.
            DayCategory::Weekday | DayCategory::Special => WEEKDAY_COVERAGE[shift.index()],
        }
    }
}
