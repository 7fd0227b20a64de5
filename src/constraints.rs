//! Constraint builder for the roster model.
//!
//! Every rule is a linear (in)equality over the decision booleans and the
//! channelled worked-day indicators, so the whole model stays inside a
//! plain integer-linear formulation: no transition automata, no reified
//! helper variables.

use good_lp::{constraint, Constraint, Expression};

use crate::domain::{DayCategory, Role, ShiftType, SolveContext};
use crate::model::DecisionVars;

use crate::domain::ShiftType::{Evening, Morning, Night};

/// Posts the full rule set, in the order the rules are stated.
pub fn build(ctx: &SolveContext, vars: &DecisionVars) -> Vec<Constraint> {
    let mut rows = Vec::new();
    coverage(ctx, vars, &mut rows);
    worked_channel(ctx, vars, &mut rows);
    leave_exclusion(ctx, vars, &mut rows);
    role_eligibility(ctx, vars, &mut rows);
    transitions(ctx, vars, &mut rows);
    consecutive_work(ctx, vars, &mut rows);
    consecutive_nights(ctx, vars, &mut rows);
    post_night_rest(ctx, vars, &mut rows);
    night_cap(ctx, vars, &mut rows);
    non_shift_cap(ctx, vars, &mut rows);
    balance_links(ctx, vars, &mut rows);
    rows
}

/// Workload imbalance across shift-role personnel.
pub fn objective(vars: &DecisionVars) -> Expression {
    Expression::from(vars.load_max) - vars.load_min
}

// ============================================================================
// Coverage
// ============================================================================

/// Each (day, shift) is staffed by exactly the required head-count.
fn coverage(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for day in 0..ctx.num_days() {
        for shift in ShiftType::ALL {
            let on_duty: Expression = (0..ctx.num_personnel())
                .map(|p| Expression::from(vars.shift(p, day, shift)))
                .sum();
            let required = ctx.required(day, shift);
            rows.push(constraint!(on_duty == required as f64));
        }
    }
}

// ============================================================================
// Worked-day channel / at most one shift per day
// ============================================================================

/// `w[p,d] = Σ_s x[p,d,s]`. Because `w` is binary, the equality is also the
/// at-most-one-shift-per-day bound.
fn worked_channel(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for p in 0..ctx.num_personnel() {
        for day in 0..ctx.num_days() {
            let day_load = vars.day_load(p, day);
            rows.push(constraint!(day_load == vars.worked[p][day]));
        }
    }
}

// ============================================================================
// Leave exclusion
// ============================================================================

/// No work on any unavailable day, whatever the leave kind.
fn leave_exclusion(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for (p, person) in ctx.personnel.iter().enumerate() {
        for day_no in ctx.leaves.days(person.id) {
            let day = day_no as usize - 1;
            rows.push(constraint!(Expression::from(vars.worked[p][day]) == 0.0));
        }
    }
}

// ============================================================================
// Role eligibility
// ============================================================================

/// Non-shift personnel work only the morning shift, and only on plain
/// weekdays.
fn role_eligibility(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for (p, person) in ctx.personnel.iter().enumerate() {
        if person.role != Role::NonShift {
            continue;
        }
        for day in 0..ctx.num_days() {
            rows.push(constraint!(Expression::from(vars.shift(p, day, Evening)) == 0.0));
            rows.push(constraint!(Expression::from(vars.shift(p, day, Night)) == 0.0));
            if ctx.calendar.category(day) != DayCategory::Weekday {
                rows.push(constraint!(Expression::from(vars.shift(p, day, Morning)) == 0.0));
            }
        }
    }
}

// ============================================================================
// Shift transitions
// ============================================================================

/// After a night only night or rest; after an evening anything but a
/// morning.
fn transitions(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for p in 0..ctx.num_personnel() {
        for day in 0..ctx.num_days().saturating_sub(1) {
            rows.push(constraint!(
                vars.shift(p, day, Night) + vars.shift(p, day + 1, Morning) <= 1.0
            ));
            rows.push(constraint!(
                vars.shift(p, day, Night) + vars.shift(p, day + 1, Evening) <= 1.0
            ));
            rows.push(constraint!(
                vars.shift(p, day, Evening) + vars.shift(p, day + 1, Morning) <= 1.0
            ));
        }
    }
}

// ============================================================================
// Consecutive-work and consecutive-night caps
// ============================================================================

/// At most 5 worked days in any 6-day window.
fn consecutive_work(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for p in 0..ctx.num_personnel() {
        for start in 0..ctx.num_days().saturating_sub(5) {
            let window: Expression = (start..start + 6)
                .map(|d| Expression::from(vars.worked[p][d]))
                .sum();
            rows.push(constraint!(window <= 5.0));
        }
    }
}

/// At most 2 nights in any 3-day window.
fn consecutive_nights(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for p in 0..ctx.num_personnel() {
        for start in 0..ctx.num_days().saturating_sub(2) {
            rows.push(constraint!(
                vars.shift(p, start, Night)
                    + vars.shift(p, start + 1, Night)
                    + vars.shift(p, start + 2, Night)
                    <= 2.0
            ));
        }
    }
}

// ============================================================================
// Mandatory post-night leave
// ============================================================================

/// A night-run of length k ∈ {1, 2} is followed by k assignment-free days.
///
/// Single night: `x[d,M] − x[d+1,M] + w[d+1] ≤ 1` — if the run ends at `d`,
/// the next day is free. Double night: `x[d,M] + x[d+1,M] + w[d+k] ≤ 2` for
/// k ∈ {2, 3}. Each obligation day is posted independently, so a run that
/// ends close to the month boundary still owes every rest day that exists;
/// obligations past the last day simply do not exist. Pre-tagged leave on an
/// obligation day already forces `w = 0` and needs no special case.
fn post_night_rest(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    let num_days = ctx.num_days();
    for p in 0..ctx.num_personnel() {
        for day in 0..num_days.saturating_sub(1) {
            rows.push(constraint!(
                Expression::from(vars.shift(p, day, Night)) - vars.shift(p, day + 1, Night)
                    + vars.worked[p][day + 1]
                    <= 1.0
            ));
            for rest in [day + 2, day + 3] {
                if rest < num_days {
                    rows.push(constraint!(
                        vars.shift(p, day, Night) + vars.shift(p, day + 1, Night)
                            + vars.worked[p][rest]
                            <= 2.0
                    ));
                }
            }
        }
    }
}

// ============================================================================
// Monthly caps
// ============================================================================

/// At most `max_night_shifts` nights per person per month.
fn night_cap(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for p in 0..ctx.num_personnel() {
        let nights: Expression = (0..ctx.num_days())
            .map(|d| Expression::from(vars.shift(p, d, Night)))
            .sum();
        rows.push(constraint!(nights <= ctx.max_night_shifts as f64));
    }
}

/// Optional cap on the total worked days of each non-shift person.
fn non_shift_cap(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    let Some(cap) = ctx.max_non_shift else {
        return;
    };
    for (p, person) in ctx.personnel.iter().enumerate() {
        if person.role != Role::NonShift {
            continue;
        }
        let worked: Expression = (0..ctx.num_days())
            .map(|d| Expression::from(vars.worked[p][d]))
            .sum();
        rows.push(constraint!(worked <= cap as f64));
    }
}

// ============================================================================
// Workload balance
// ============================================================================

/// `load_min ≤ load[p] ≤ load_max` for every shift-role person. Non-shift
/// personnel are excluded: their eligibility is far narrower.
fn balance_links(ctx: &SolveContext, vars: &DecisionVars, rows: &mut Vec<Constraint>) {
    for (p, person) in ctx.personnel.iter().enumerate() {
        if person.role != Role::Shift {
            continue;
        }
        let load = vars.person_load(p);
        rows.push(constraint!(load.clone() >= vars.load_min));
        rows.push(constraint!(load <= vars.load_max));
    }
}
