//! Post-solve audit: an independent replay of every hard rule against the
//! emitted schedule.
//!
//! Diagnostic only — the audit never modifies a schedule. A non-empty
//! result on a nominally feasible solve is a model bug and surfaces as
//! `INTERNAL_VALIDATION_FAILED`. Tests use this module as the ground-truth
//! oracle.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{DayCategory, PersonId, Role, Schedule, ShiftType, SolveContext};

/// A single rule violation found in a schedule.
#[derive(Debug, Clone)]
pub struct Violation {
    pub date: NaiveDate,
    pub person: Option<PersonId>,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.person {
            Some(id) => write!(f, "{}: person {}: {}", self.date, id, self.message),
            None => write!(f, "{}: {}", self.date, self.message),
        }
    }
}

/// Replays every hard rule and returns all violations found.
pub fn audit_schedule(ctx: &SolveContext, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();
    let num_days = ctx.num_days();

    if schedule.num_days() != num_days {
        violations.push(Violation {
            date: ctx.calendar.date(0),
            person: None,
            message: format!(
                "schedule has {} days, month has {num_days}",
                schedule.num_days()
            ),
        });
        return violations;
    }

    // Per-person day-by-shift grid, built while checking coverage and the
    // per-day rules.
    let mut grid: HashMap<PersonId, Vec<Option<ShiftType>>> = ctx
        .personnel
        .iter()
        .map(|p| (p.id, vec![None; num_days]))
        .collect();

    for (day, entry) in schedule.days.iter().enumerate() {
        let date = ctx.calendar.date(day);
        if entry.date != date {
            violations.push(Violation {
                date,
                person: None,
                message: format!("day {} is keyed {}, expected {date}", day + 1, entry.date),
            });
        }

        for shift in ShiftType::ALL {
            let ids = entry.on_shift(shift);
            let required = ctx.required(day, shift);
            if ids.len() as u32 != required {
                violations.push(Violation {
                    date,
                    person: None,
                    message: format!(
                        "shift {shift} has {} assignees, requires {required}",
                        ids.len()
                    ),
                });
            }

            for &id in ids {
                let Some(slots) = grid.get_mut(&id) else {
                    violations.push(Violation {
                        date,
                        person: Some(id),
                        message: "assigned id is not on the roster".into(),
                    });
                    continue;
                };
                if let Some(previous) = slots[day] {
                    violations.push(Violation {
                        date,
                        person: Some(id),
                        message: format!("double shift: {previous} and {shift}"),
                    });
                } else {
                    slots[day] = Some(shift);
                }
            }
        }
    }

    for person in &ctx.personnel {
        let slots = &grid[&person.id];

        // Leave exclusion.
        for day_no in ctx.leaves.days(person.id) {
            let day = day_no as usize - 1;
            if let Some(shift) = slots[day] {
                violations.push(Violation {
                    date: ctx.calendar.date(day),
                    person: Some(person.id),
                    message: format!("assigned {shift} on an unavailable day"),
                });
            }
        }

        // Role eligibility.
        if person.role == Role::NonShift {
            for (day, slot) in slots.iter().enumerate() {
                match slot {
                    Some(ShiftType::Morning)
                        if ctx.calendar.category(day) != DayCategory::Weekday =>
                    {
                        violations.push(Violation {
                            date: ctx.calendar.date(day),
                            person: Some(person.id),
                            message: "non-shift person assigned P outside a plain weekday".into(),
                        });
                    }
                    Some(shift @ (ShiftType::Evening | ShiftType::Night)) => {
                        violations.push(Violation {
                            date: ctx.calendar.date(day),
                            person: Some(person.id),
                            message: format!("non-shift person assigned {shift}"),
                        });
                    }
                    _ => {}
                }
            }
        }

        // Transitions across consecutive days.
        for day in 0..num_days.saturating_sub(1) {
            let allowed = match (slots[day], slots[day + 1]) {
                (Some(ShiftType::Night), Some(next)) => next == ShiftType::Night,
                (Some(ShiftType::Evening), Some(ShiftType::Morning)) => false,
                _ => true,
            };
            if !allowed {
                violations.push(Violation {
                    date: ctx.calendar.date(day + 1),
                    person: Some(person.id),
                    message: format!(
                        "invalid transition {} -> {}",
                        slots[day].map_or("-", ShiftType::code),
                        slots[day + 1].map_or("-", ShiftType::code),
                    ),
                });
            }
        }

        // Consecutive-work cap: no 6-day window fully worked.
        for start in 0..num_days.saturating_sub(5) {
            if slots[start..start + 6].iter().all(Option::is_some) {
                violations.push(Violation {
                    date: ctx.calendar.date(start),
                    person: Some(person.id),
                    message: "6 consecutive worked days".into(),
                });
            }
        }

        // Consecutive-night cap.
        for start in 0..num_days.saturating_sub(2) {
            if slots[start..start + 3]
                .iter()
                .all(|slot| *slot == Some(ShiftType::Night))
            {
                violations.push(Violation {
                    date: ctx.calendar.date(start),
                    person: Some(person.id),
                    message: "3 consecutive nights".into(),
                });
            }
        }

        // Mandatory post-night leave after maximal runs of length 1 or 2.
        let mut day = 0;
        while day < num_days {
            if slots[day] != Some(ShiftType::Night) {
                day += 1;
                continue;
            }
            let mut end = day;
            while end + 1 < num_days && slots[end + 1] == Some(ShiftType::Night) {
                end += 1;
            }
            let run = end - day + 1;
            if run <= 2 {
                for rest in end + 1..=(end + run).min(num_days - 1) {
                    if let Some(shift) = slots[rest] {
                        violations.push(Violation {
                            date: ctx.calendar.date(rest),
                            person: Some(person.id),
                            message: format!(
                                "assigned {shift} during mandatory leave after a {run}-night run"
                            ),
                        });
                    }
                }
            }
            day = end + 1;
        }

        // Monthly night cap.
        let nights = slots
            .iter()
            .filter(|slot| **slot == Some(ShiftType::Night))
            .count() as u32;
        if nights > ctx.max_night_shifts {
            violations.push(Violation {
                date: ctx.calendar.date(num_days - 1),
                person: Some(person.id),
                message: format!(
                    "{nights} nights in the month, cap is {}",
                    ctx.max_night_shifts
                ),
            });
        }
    }

    violations
}
