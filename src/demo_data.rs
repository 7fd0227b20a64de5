//! Demo request generators.

use std::collections::BTreeMap;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::Role;
use crate::dto::{PersonnelDto, ScheduleConfigDto, ScheduleRequest, ShiftCountsDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    /// Reduced head-counts (one morning, one night per day); solves in well
    /// under a second.
    Small,
    /// The realistic fixture: September 2025, nine shift-role people plus
    /// one non-shift, a public holiday, a special date, scattered leaves.
    Full,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "FULL" => Ok(DemoData::Full),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Full => "FULL",
        }
    }
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "FULL"]
}

const NAMES: &[&str] = &[
    "Arisa", "Bagus", "Citra", "Dewi", "Eko", "Farah", "Gita", "Hadi", "Intan", "Joko",
];

fn person(id: u32, role: Role) -> PersonnelDto {
    PersonnelDto {
        id: i64::from(id),
        name: NAMES[(id as usize - 1) % NAMES.len()].to_string(),
        role,
        requested_leaves: Vec::new(),
        extra_leaves: Vec::new(),
        annual_leaves: Vec::new(),
    }
}

/// Generates a demo request for the given size.
pub fn generate(demo: DemoData) -> ScheduleRequest {
    match demo {
        DemoData::Small => generate_small(),
        DemoData::Full => generate_full(),
    }
}

fn generate_small() -> ScheduleRequest {
    let mut special_dates = BTreeMap::new();
    for day in 1..=28 {
        special_dates.insert(
            format!("2025-02-{day:02}"),
            ShiftCountsDto {
                morning: 1,
                evening: 0,
                night: 1,
            },
        );
    }
    ScheduleRequest {
        personnel: (1..=4).map(|id| person(id, Role::Shift)).collect(),
        config: ScheduleConfigDto {
            month: "2025-02".into(),
            public_holidays: Vec::new(),
            special_dates,
            max_night_shifts: 9,
            max_default_leaves: None,
            max_non_shift: None,
        },
    }
}

fn generate_full() -> ScheduleRequest {
    let mut rng = StdRng::seed_from_u64(0);

    let mut personnel: Vec<_> = (1..=9).map(|id| person(id, Role::Shift)).collect();
    personnel.push(person(10, Role::NonShift));

    // One requested leave per shift-role person, each on a distinct weekday
    // so no single day loses more than one pair of hands.
    let weekdays: Vec<i64> = (1..=30)
        .filter(|day| !matches!(day, 6 | 7 | 13 | 14 | 17 | 20 | 21 | 27 | 28))
        .collect();
    let leave_days: Vec<i64> = weekdays.choose_multiple(&mut rng, 9).copied().collect();
    for (p, day) in personnel.iter_mut().zip(&leave_days) {
        p.requested_leaves.push(*day);
    }

    let mut special_dates = BTreeMap::new();
    special_dates.insert(
        "2025-09-20".to_string(),
        ShiftCountsDto {
            morning: 1,
            evening: 1,
            night: 3,
        },
    );

    ScheduleRequest {
        personnel,
        config: ScheduleConfigDto {
            month: "2025-09".into(),
            public_holidays: vec![17],
            special_dates,
            max_night_shifts: 9,
            max_default_leaves: None,
            max_non_shift: None,
        },
    }
}
