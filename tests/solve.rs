//! End-to-end solve scenarios. The post-solve audit is the oracle: every
//! schedule accepted here has already been replayed against the full rule
//! set, and the assertions below pin the scenario-specific expectations.

use std::collections::BTreeMap;
use std::time::Duration;

use roster_scheduling::audit;
use roster_scheduling::demo_data::{self, DemoData};
use roster_scheduling::domain::{Role, Schedule, ShiftType};
use roster_scheduling::dto::{
    PersonnelDto, ScheduleConfigDto, ScheduleRequest, ScheduleResponse, ShiftCountsDto,
};
use roster_scheduling::validation;
use roster_scheduling::{generate_schedule, RosterError, SolverOptions};

fn person(id: i64, role: Role) -> PersonnelDto {
    PersonnelDto {
        id,
        name: format!("Person {id}"),
        role,
        requested_leaves: Vec::new(),
        extra_leaves: Vec::new(),
        annual_leaves: Vec::new(),
    }
}

fn config(month: &str) -> ScheduleConfigDto {
    ScheduleConfigDto {
        month: month.to_string(),
        public_holidays: Vec::new(),
        special_dates: BTreeMap::new(),
        max_night_shifts: 9,
        max_default_leaves: None,
        max_non_shift: None,
    }
}

/// February 2025 with the same literal head-count vector on every day.
fn uniform_config(counts: [i64; 3]) -> ScheduleConfigDto {
    let mut cfg = config("2025-02");
    for day in 1..=28 {
        cfg.special_dates.insert(
            format!("2025-02-{day:02}"),
            ShiftCountsDto {
                morning: counts[0],
                evening: counts[1],
                night: counts[2],
            },
        );
    }
    cfg
}

fn solve(request: &ScheduleRequest) -> Result<Schedule, RosterError> {
    generate_schedule(request, &SolverOptions::default())
}

fn assert_clean(request: &ScheduleRequest, schedule: &Schedule) {
    let ctx = validation::build_context(request).unwrap();
    let violations = audit::audit_schedule(&ctx, schedule);
    assert!(violations.is_empty(), "audit violations: {violations:?}");
}

#[test]
fn zero_coverage_days_stay_in_output() {
    let request = ScheduleRequest {
        personnel: vec![person(1, Role::Shift), person(2, Role::Shift)],
        config: uniform_config([0, 0, 0]),
    };
    let schedule = solve(&request).unwrap();

    assert_eq!(schedule.num_days(), 28);
    for day in &schedule.days {
        for shift in ShiftType::ALL {
            assert!(day.on_shift(shift).is_empty());
        }
    }
    assert_clean(&request, &schedule);

    let response = ScheduleResponse::from_schedule(&schedule);
    assert_eq!(response.schedule.len(), 28);
    assert!(response.schedule.contains_key("2025-02-01"));
    assert!(response.schedule.contains_key("2025-02-28"));
}

#[test]
fn morning_only_roster_balances_load() {
    let request = ScheduleRequest {
        personnel: (1..=3).map(|id| person(id, Role::Shift)).collect(),
        config: uniform_config([1, 0, 0]),
    };
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);

    for day in &schedule.days {
        assert_eq!(day.on_shift(ShiftType::Morning).len(), 1);
    }

    // 28 mornings over 3 people: the optimal spread is 1.
    let loads: Vec<_> = (1..=3).map(|id| schedule.load_of(id)).collect();
    assert_eq!(loads.iter().sum::<usize>(), 28);
    let spread = loads.iter().max().unwrap() - loads.iter().min().unwrap();
    assert!(spread <= 1, "loads {loads:?}");
}

#[test]
fn full_month_leave_person_is_never_assigned() {
    let mut on_leave = person(4, Role::Shift);
    on_leave.requested_leaves = (1..=28).collect();
    let mut personnel: Vec<_> = (1..=3).map(|id| person(id, Role::Shift)).collect();
    personnel.push(on_leave);

    let request = ScheduleRequest {
        personnel,
        config: uniform_config([1, 0, 0]),
    };
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);
    assert_eq!(schedule.load_of(4), 0);
}

#[test]
fn leave_days_are_respected() {
    let mut personnel: Vec<_> = (1..=3).map(|id| person(id, Role::Shift)).collect();
    personnel[0].requested_leaves = vec![6];
    personnel[0].annual_leaves = vec![7];

    let request = ScheduleRequest {
        personnel,
        config: uniform_config([1, 0, 0]),
    };
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);

    for day_no in [6usize, 7] {
        let day = &schedule.days[day_no - 1];
        for shift in ShiftType::ALL {
            assert!(
                !day.on_shift(shift).contains(&1),
                "person 1 assigned on leave day {day_no}"
            );
        }
    }
}

#[test]
fn night_rotation_respects_rest_rules() {
    let request = ScheduleRequest {
        personnel: (1..=4).map(|id| person(id, Role::Shift)).collect(),
        config: uniform_config([0, 0, 1]),
    };
    let schedule = solve(&request).unwrap();
    // The audit replays the night-window, rest, and cap rules.
    assert_clean(&request, &schedule);

    for day in &schedule.days {
        assert_eq!(day.on_shift(ShiftType::Night).len(), 1);
    }
    for id in 1..=4 {
        assert!(schedule.load_of(id) <= 9, "person {id} over the night cap");
    }
}

#[test]
fn forced_double_night_takes_two_rest_days() {
    let mut cfg = uniform_config([0, 0, 0]);
    for day in [4, 5] {
        cfg.special_dates.insert(
            format!("2025-02-{day:02}"),
            ShiftCountsDto {
                morning: 0,
                evening: 0,
                night: 2,
            },
        );
    }
    let request = ScheduleRequest {
        personnel: vec![person(1, Role::Shift), person(2, Role::Shift)],
        config: cfg,
    };
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);

    for day_no in [4usize, 5] {
        assert_eq!(
            schedule.days[day_no - 1].on_shift(ShiftType::Night),
            [1, 2],
            "both people work night {day_no}"
        );
    }
    for day_no in [6usize, 7] {
        for shift in ShiftType::ALL {
            assert!(schedule.days[day_no - 1].on_shift(shift).is_empty());
        }
    }
}

#[test]
fn understaffed_weekday_fails_capacity_precheck() {
    // Default weekday coverage totals 5; four people cannot supply it.
    let request = ScheduleRequest {
        personnel: (1..=4).map(|id| person(id, Role::Shift)).collect(),
        config: config("2025-09"),
    };
    match solve(&request) {
        Err(err @ RosterError::InsufficientCapacity(_)) => {
            assert_eq!(err.kind(), "INSUFFICIENT_CAPACITY");
        }
        other => panic!("expected InsufficientCapacity, got {other:?}"),
    }
}

#[test]
fn single_person_month_is_proven_infeasible() {
    // One person passes the per-day pre-check but cannot work 28 days in a
    // row under the consecutive-work cap.
    let request = ScheduleRequest {
        personnel: vec![person(1, Role::Shift)],
        config: uniform_config([1, 0, 0]),
    };
    match solve(&request) {
        Err(RosterError::Infeasible) => {}
        other => panic!("expected Infeasible, got {other:?}"),
    }
}

#[test]
fn non_shift_person_never_works_special_days() {
    let mut personnel: Vec<_> = (1..=3).map(|id| person(id, Role::Shift)).collect();
    personnel.push(person(4, Role::NonShift));

    // Every day carries a literal vector, so no day is a plain weekday and
    // the non-shift person is ineligible throughout.
    let request = ScheduleRequest {
        personnel,
        config: uniform_config([1, 0, 0]),
    };
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);
    assert_eq!(schedule.load_of(4), 0);
}

#[test]
fn expired_time_budget_reports_timeout() {
    let request = ScheduleRequest {
        personnel: (1..=4).map(|id| person(id, Role::Shift)).collect(),
        config: uniform_config([0, 0, 1]),
    };
    let options = SolverOptions {
        time_limit: Duration::ZERO,
    };
    match generate_schedule(&request, &options) {
        Err(err @ RosterError::Timeout) => assert_eq!(err.kind(), "TIMEOUT"),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn randomized_leave_patterns_solve_and_audit_clean() {
    use rand::prelude::*;
    use rand::rngs::StdRng;

    for seed in 0..3u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut personnel: Vec<_> = (1..=4).map(|id| person(id, Role::Shift)).collect();
        // Two leave days per person, drawn from disjoint week-long blocks so
        // no single day loses more than one person.
        for (i, p) in personnel.iter_mut().enumerate() {
            let block: Vec<i64> = (1..=28).filter(|d| (d - 1) / 7 == i as i64).collect();
            p.requested_leaves = block.choose_multiple(&mut rng, 2).copied().collect();
        }

        let request = ScheduleRequest {
            personnel,
            config: uniform_config([1, 0, 0]),
        };
        let schedule = solve(&request).unwrap_or_else(|err| panic!("seed {seed}: {err}"));
        assert_clean(&request, &schedule);
    }
}

#[test]
fn small_demo_solves_cleanly() {
    let request = demo_data::generate(DemoData::Small);
    let schedule = solve(&request).unwrap();
    assert_clean(&request, &schedule);

    // One morning and one night per day over four people: 56 assignments.
    let total: usize = (1..=4).map(|id| schedule.load_of(id)).sum();
    assert_eq!(total, 56);
}
