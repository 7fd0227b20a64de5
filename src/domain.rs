//! Domain model for the monthly roster.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{CoverageTable, MonthCalendar};

/// Identifier of a person on the roster (positive, unique per request).
pub type PersonId = u32;

/// The three shift types of a roster day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftType {
    Morning,
    Evening,
    Night,
}

impl ShiftType {
    /// All shift types, in P/S/M order. The order is fixed: it is the index
    /// layout of the decision variables and of every per-day vector.
    pub const ALL: [ShiftType; 3] = [ShiftType::Morning, ShiftType::Evening, ShiftType::Night];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShiftType::Morning => 0,
            ShiftType::Evening => 1,
            ShiftType::Night => 2,
        }
    }

    /// Wire code of the shift type.
    pub fn code(self) -> &'static str {
        match self {
            ShiftType::Morning => "P",
            ShiftType::Evening => "S",
            ShiftType::Night => "M",
        }
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Eligibility class of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Eligible for any shift on any day.
    Shift,
    /// Eligible only for the morning shift, and only on plain weekdays.
    NonShift,
}

/// Classification of a roster day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCategory {
    Weekday,
    WeekendHoliday,
    /// Day with a literal head-count vector from the request.
    Special,
}

/// A person on the roster, after input validation.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}

/// Per-person set of days unavailable for any shift.
///
/// The three leave kinds of the request (requested / extra / annual) are
/// unified here: every kind excludes assignment the same way, and the
/// mandatory-leave override needs no tag because pre-existing leave already
/// fulfils the non-work obligation.
#[derive(Debug, Clone, Default)]
pub struct LeaveIndex {
    unavailable: HashMap<PersonId, BTreeSet<u32>>,
}

impl LeaveIndex {
    pub fn insert(&mut self, person: PersonId, day: u32) {
        self.unavailable.entry(person).or_default().insert(day);
    }

    pub fn is_unavailable(&self, person: PersonId, day: u32) -> bool {
        self.unavailable
            .get(&person)
            .is_some_and(|days| days.contains(&day))
    }

    /// Unavailable day numbers of a person, ascending.
    pub fn days(&self, person: PersonId) -> impl Iterator<Item = u32> + '_ {
        self.unavailable.get(&person).into_iter().flatten().copied()
    }

    pub fn count_for(&self, person: PersonId) -> usize {
        self.unavailable.get(&person).map_or(0, BTreeSet::len)
    }
}

/// Everything a single solve needs, computed from one request and released
/// when the response is encoded. No global state.
#[derive(Debug, Clone)]
pub struct SolveContext {
    pub calendar: MonthCalendar,
    pub coverage: CoverageTable,
    pub personnel: Vec<Person>,
    pub leaves: LeaveIndex,
    pub max_night_shifts: u32,
    /// Optional cap on the total worked days of each non-shift person.
    pub max_non_shift: Option<u32>,
}

impl SolveContext {
    pub fn num_days(&self) -> usize {
        self.calendar.num_days()
    }

    pub fn num_personnel(&self) -> usize {
        self.personnel.len()
    }

    /// Required head-count for a (0-based) day index and shift.
    pub fn required(&self, day_idx: usize, shift: ShiftType) -> u32 {
        let day_no = day_idx as u32 + 1;
        self.coverage
            .required(day_no, self.calendar.category(day_idx), shift)
    }

    /// Total required head-count of a day across all three shifts.
    pub fn required_total(&self, day_idx: usize) -> u32 {
        ShiftType::ALL
            .iter()
            .map(|&s| self.required(day_idx, s))
            .sum()
    }
}

/// One day of the emitted schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    /// Assigned person ids per shift, indexed by [`ShiftType::index`],
    /// each list sorted ascending.
    pub assigned: [Vec<PersonId>; 3],
}

impl ScheduleDay {
    pub fn on_shift(&self, shift: ShiftType) -> &[PersonId] {
        &self.assigned[shift.index()]
    }
}

/// The canonical output: per-day, per-shift assigned person ids, days in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub days: Vec<ScheduleDay>,
}

impl Schedule {
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Number of shifts a person works over the month.
    pub fn load_of(&self, person: PersonId) -> usize {
        self.days
            .iter()
            .flat_map(|day| day.assigned.iter())
            .filter(|ids| ids.contains(&person))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_type_layout_is_psm() {
        let codes: Vec<_> = ShiftType::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec!["P", "S", "M"]);
        for (i, shift) in ShiftType::ALL.iter().enumerate() {
            assert_eq!(shift.index(), i);
        }
    }

    #[test]
    fn leave_index_unifies_days() {
        let mut leaves = LeaveIndex::default();
        leaves.insert(7, 3);
        leaves.insert(7, 12);
        assert!(leaves.is_unavailable(7, 3));
        assert!(!leaves.is_unavailable(7, 4));
        assert!(!leaves.is_unavailable(8, 3));
        assert_eq!(leaves.days(7).collect::<Vec<_>>(), vec![3, 12]);
        assert_eq!(leaves.count_for(8), 0);
    }

    #[test]
    fn schedule_load_counts_all_shifts() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let schedule = Schedule {
            days: vec![
                ScheduleDay {
                    date,
                    assigned: [vec![1], vec![2], vec![1]],
                },
                ScheduleDay {
                    date: date.succ_opt().unwrap(),
                    assigned: [vec![], vec![1], vec![]],
                },
            ],
        };
        assert_eq!(schedule.load_of(1), 3);
        assert_eq!(schedule.load_of(2), 1);
        assert_eq!(schedule.load_of(9), 0);
    }
}
