//! Input validation and the capacity pre-check.
//!
//! Validation runs before any decision variable is created and
//! short-circuits with `INVALID_INPUT`. The capacity pre-check rejects
//! requests whose staffing targets are provably unreachable so that the
//! solver is never asked to disprove the obvious.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::calendar::{CoverageTable, Month, MonthCalendar};
use crate::domain::{DayCategory, LeaveIndex, Person, PersonId, Role, ShiftType, SolveContext};
use crate::dto::ScheduleRequest;
use crate::error::RosterError;

/// Validates a request and resolves it into a [`SolveContext`].
pub fn build_context(request: &ScheduleRequest) -> Result<SolveContext, RosterError> {
    let config = &request.config;
    let month = Month::parse(&config.month)
        .ok_or_else(|| RosterError::InvalidInput(format!("malformed month {:?}", config.month)))?;
    let num_days = month.num_days();

    if config.max_night_shifts < 0 {
        return Err(RosterError::InvalidInput(format!(
            "max_night_shifts must be non-negative, got {}",
            config.max_night_shifts
        )));
    }
    if let Some(cap) = config.max_non_shift {
        if cap < 0 {
            return Err(RosterError::InvalidInput(format!(
                "max_non_shift must be non-negative, got {cap}"
            )));
        }
    }
    if let Some(advisory) = config.max_default_leaves {
        tracing::debug!(max_default_leaves = advisory, "advisory field present, not enforced");
    }

    let mut public_holidays = BTreeSet::new();
    for &day in &config.public_holidays {
        public_holidays.insert(check_day_number(day, num_days, "public holiday")?);
    }

    let mut special = BTreeMap::new();
    for (date_str, counts) in &config.special_dates {
        let date = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            RosterError::InvalidInput(format!("malformed special date {date_str:?}"))
        })?;
        let day_no = month.day_of(date).ok_or_else(|| {
            RosterError::InvalidInput(format!("special date {date_str} is outside month {month}"))
        })?;
        let mut vector = [0u32; 3];
        for (shift, count) in ShiftType::ALL
            .iter()
            .zip([counts.morning, counts.evening, counts.night])
        {
            vector[shift.index()] = u32::try_from(count).map_err(|_| {
                RosterError::InvalidInput(format!(
                    "special date {date_str} has negative head-count for shift {shift}"
                ))
            })?;
        }
        special.insert(day_no, vector);
    }

    let mut personnel = Vec::with_capacity(request.personnel.len());
    let mut leaves = LeaveIndex::default();
    let mut seen_ids = HashSet::new();
    for dto in &request.personnel {
        let id: PersonId = u32::try_from(dto.id)
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| {
                RosterError::InvalidInput(format!("personnel id {} must be a positive integer", dto.id))
            })?;
        if !seen_ids.insert(id) {
            return Err(RosterError::InvalidInput(format!(
                "personnel id {id} is duplicated"
            )));
        }

        let mut tagged = BTreeSet::new();
        for (kind, days) in [
            ("requested", &dto.requested_leaves),
            ("extra", &dto.extra_leaves),
            ("annual", &dto.annual_leaves),
        ] {
            for &day in days {
                let day_no = check_day_number(day, num_days, &format!("{kind} leave of id {id}"))?;
                if !tagged.insert(day_no) {
                    return Err(RosterError::InvalidInput(format!(
                        "personnel id {id} has overlapping leaves on day {day_no}"
                    )));
                }
                leaves.insert(id, day_no);
            }
        }

        personnel.push(Person::new(id, dto.name.clone(), dto.role));
    }

    let coverage = CoverageTable::new(special);
    let calendar = MonthCalendar::new(month, &public_holidays, &coverage.special_days());

    Ok(SolveContext {
        calendar,
        coverage,
        personnel,
        leaves,
        max_night_shifts: config.max_night_shifts as u32,
        max_non_shift: config.max_non_shift.map(|cap| cap as u32),
    })
}

fn check_day_number(day: i64, num_days: u32, what: &str) -> Result<u32, RosterError> {
    u32::try_from(day)
        .ok()
        .filter(|&d| (1..=num_days).contains(&d))
        .ok_or_else(|| {
            RosterError::InvalidInput(format!(
                "{what}: day {day} is outside 1..={num_days}"
            ))
        })
}

/// Rejects requests whose coverage is provably unreachable.
///
/// These are necessary conditions only; anything subtler is left to the
/// solver, which reports `INFEASIBLE` with a proof.
pub fn check_capacity(ctx: &SolveContext) -> Result<(), RosterError> {
    let num_days = ctx.num_days();

    for day_idx in 0..num_days {
        let day_no = day_idx as u32 + 1;
        let weekday = ctx.calendar.category(day_idx) == DayCategory::Weekday;

        let mut shift_available = 0u32;
        let mut non_shift_available = 0u32;
        for person in &ctx.personnel {
            if ctx.leaves.is_unavailable(person.id, day_no) {
                continue;
            }
            match person.role {
                Role::Shift => shift_available += 1,
                Role::NonShift if weekday => non_shift_available += 1,
                Role::NonShift => {}
            }
        }

        let total = ctx.required_total(day_idx);
        if total > shift_available + non_shift_available {
            return Err(RosterError::InsufficientCapacity(format!(
                "day {day_no} requires {total} assignments but only {} personnel are eligible",
                shift_available + non_shift_available
            )));
        }

        let evening_night =
            ctx.required(day_idx, ShiftType::Evening) + ctx.required(day_idx, ShiftType::Night);
        if evening_night > shift_available {
            return Err(RosterError::InsufficientCapacity(format!(
                "day {day_no} requires {evening_night} evening/night assignments but only \
                 {shift_available} shift-role personnel are eligible"
            )));
        }
    }

    let total_nights: u32 = (0..num_days)
        .map(|d| ctx.required(d, ShiftType::Night))
        .sum();
    let shift_count = ctx
        .personnel
        .iter()
        .filter(|p| p.role == Role::Shift)
        .count() as u32;
    let night_budget = shift_count * ctx.max_night_shifts;
    if total_nights > night_budget {
        return Err(RosterError::InsufficientCapacity(format!(
            "month requires {total_nights} night assignments but the roster can supply at most \
             {night_budget} under the monthly night cap"
        )));
    }

    Ok(())
}
