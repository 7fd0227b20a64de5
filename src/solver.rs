//! Solver driver: builds the model, runs the exact backend under a
//! wall-clock limit, extracts the assignment, and encodes the schedule.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{default_solver, variables, Constraint, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel};

use crate::audit;
use crate::constraints;
use crate::domain::{Schedule, ScheduleDay, SolveContext};
use crate::dto::ScheduleRequest;
use crate::error::RosterError;
use crate::model::DecisionVars;
use crate::validation;

/// Driver knobs, passed explicitly per solve.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Wall-clock budget for the solve. Expiry without any result maps to
    /// [`RosterError::Timeout`].
    pub time_limit: Duration,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
        }
    }
}

/// Generates a month of shift assignments for the given request.
///
/// Validates the input, builds and solves the integer model, encodes the
/// schedule, and audits it against every roster rule before returning.
pub fn generate_schedule(
    request: &ScheduleRequest,
    options: &SolverOptions,
) -> Result<Schedule, RosterError> {
    let ctx = validation::build_context(request)?;
    validation::check_capacity(&ctx)?;

    let schedule = solve(&ctx, options)?;

    let violations = audit::audit_schedule(&ctx, &schedule);
    if !violations.is_empty() {
        for violation in &violations {
            tracing::error!(%violation, "post-solve audit violation");
        }
        return Err(RosterError::InternalValidation(violations));
    }
    Ok(schedule)
}

fn solve(ctx: &SolveContext, options: &SolverOptions) -> Result<Schedule, RosterError> {
    let mut problem = variables!();
    let decision = DecisionVars::allocate(&mut problem, ctx.num_personnel(), ctx.num_days());
    let rows = constraints::build(ctx, &decision);
    let objective = constraints::objective(&decision);
    tracing::debug!(
        month = %ctx.calendar.month(),
        personnel = ctx.num_personnel(),
        days = ctx.num_days(),
        variables = decision.len(),
        constraints = rows.len(),
        "built roster model"
    );

    let started = Instant::now();
    let raw = run_with_deadline(problem, decision, rows, objective, options.time_limit)?;
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        load_spread = raw.load_spread,
        "solver finished"
    );

    Ok(encode_schedule(ctx, &raw))
}

struct RawSolution {
    /// `assigned[person][day][shift]` from the rounded solution values.
    assigned: Vec<Vec<[bool; 3]>>,
    load_spread: i64,
}

/// Runs the solve on a dedicated thread and waits up to the time limit.
///
/// The backend has no native interrupt; an expired worker is left to run to
/// completion and is reaped with the process (no mid-solve cancellation is
/// required of the driver).
fn run_with_deadline(
    problem: ProblemVariables,
    decision: DecisionVars,
    rows: Vec<Constraint>,
    objective: Expression,
    time_limit: Duration,
) -> Result<RawSolution, RosterError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("roster-solve".into())
        .spawn(move || {
            let _ = tx.send(run_solver(problem, decision, rows, objective));
        })
        .map_err(|err| RosterError::Solver(format!("failed to spawn solver thread: {err}")))?;

    match rx.recv_timeout(time_limit) {
        Ok(Ok(raw)) => Ok(raw),
        Ok(Err(ResolutionError::Infeasible)) => Err(RosterError::Infeasible),
        Ok(Err(err)) => Err(RosterError::Solver(err.to_string())),
        Err(RecvTimeoutError::Timeout) => Err(RosterError::Timeout),
        Err(RecvTimeoutError::Disconnected) => Err(RosterError::Solver(
            "solver thread exited without a result".into(),
        )),
    }
}

fn run_solver(
    problem: ProblemVariables,
    decision: DecisionVars,
    rows: Vec<Constraint>,
    objective: Expression,
) -> Result<RawSolution, ResolutionError> {
    let mut model = problem.minimise(objective).using(default_solver);
    for row in rows {
        model = model.with(row);
    }
    let solution = model.solve()?;

    let assigned = decision
        .x
        .iter()
        .map(|days| {
            days.iter()
                .map(|shifts| {
                    [
                        solution.value(shifts[0]) > 0.5,
                        solution.value(shifts[1]) > 0.5,
                        solution.value(shifts[2]) > 0.5,
                    ]
                })
                .collect()
        })
        .collect();
    let load_spread =
        (solution.value(decision.load_max) - solution.value(decision.load_min)).round() as i64;
    Ok(RawSolution {
        assigned,
        load_spread,
    })
}

/// Converts the variable assignment into the date-keyed output structure,
/// ids ascending within each shift.
fn encode_schedule(ctx: &SolveContext, raw: &RawSolution) -> Schedule {
    let days = (0..ctx.num_days())
        .map(|day| {
            let mut assigned: [Vec<_>; 3] = Default::default();
            for (p, person) in ctx.personnel.iter().enumerate() {
                for (s, &on_duty) in raw.assigned[p][day].iter().enumerate() {
                    if on_duty {
                        assigned[s].push(person.id);
                    }
                }
            }
            for ids in &mut assigned {
                ids.sort_unstable();
            }
            ScheduleDay {
                date: ctx.calendar.date(day),
                assigned,
            }
        })
        .collect();
    Schedule { days }
}
