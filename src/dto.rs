//! Request/response DTOs for the schedule-generation interface.
//!
//! The wire shapes mirror the external contract: leave lists default to
//! empty, special-date head-counts use the `P`/`S`/`M` keys, and the
//! schedule is keyed by ISO date in chronological order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PersonId, Role, Schedule, ShiftType};
use crate::error::RosterError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelDto {
    pub id: i64,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub requested_leaves: Vec<i64>,
    #[serde(default)]
    pub extra_leaves: Vec<i64>,
    #[serde(default)]
    pub annual_leaves: Vec<i64>,
}

/// Per-shift head-counts of a special date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShiftCountsDto {
    #[serde(rename = "P")]
    pub morning: i64,
    #[serde(rename = "S")]
    pub evening: i64,
    #[serde(rename = "M")]
    pub night: i64,
}

fn default_max_night_shifts() -> i64 {
    9
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfigDto {
    /// Target month, `"YYYY-MM"`.
    pub month: String,
    #[serde(default)]
    pub public_holidays: Vec<i64>,
    /// ISO date → literal head-count vector.
    #[serde(default)]
    pub special_dates: BTreeMap<String, ShiftCountsDto>,
    #[serde(default = "default_max_night_shifts")]
    pub max_night_shifts: i64,
    /// Advisory metadata; accepted but not enforced by any rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_default_leaves: Option<i64>,
    /// Cap on the total worked days of each non-shift person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_non_shift: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub personnel: Vec<PersonnelDto>,
    pub config: ScheduleConfigDto,
}

/// One day of the response: person ids per shift, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShiftsDto {
    #[serde(rename = "P", default)]
    pub morning: Vec<PersonId>,
    #[serde(rename = "S", default)]
    pub evening: Vec<PersonId>,
    #[serde(rename = "M", default)]
    pub night: Vec<PersonId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schedule: BTreeMap<String, DayShiftsDto>,
}

impl ScheduleResponse {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let days = schedule
            .days
            .iter()
            .map(|day| {
                let shifts = DayShiftsDto {
                    morning: day.on_shift(ShiftType::Morning).to_vec(),
                    evening: day.on_shift(ShiftType::Evening).to_vec(),
                    night: day.on_shift(ShiftType::Night).to_vec(),
                };
                (day.date.format("%Y-%m-%d").to_string(), shifts)
            })
            .collect();
        Self { schedule: days }
    }
}

/// Structured error payload: `{ error_kind, message, details? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error_kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn from_error(error: &RosterError) -> Self {
        let details = match error {
            RosterError::InternalValidation(violations) => Some(serde_json::Value::from(
                violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>(),
            )),
            _ => None,
        };
        Self {
            error_kind: error.kind(),
            message: error.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Schedule, ScheduleDay};
    use chrono::NaiveDate;

    #[test]
    fn request_parses_wire_shape() {
        let raw = r#"{
            "personnel": [
                { "id": 1, "name": "Arisa", "role": "shift",
                  "requested_leaves": [6], "extra_leaves": [], "annual_leaves": [20] },
                { "id": 2, "name": "Joko", "role": "non_shift" }
            ],
            "config": {
                "month": "2025-09",
                "public_holidays": [17],
                "special_dates": { "2025-09-20": { "P": 1, "S": 1, "M": 3 } },
                "max_night_shifts": 9
            }
        }"#;
        let request: ScheduleRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.personnel.len(), 2);
        assert_eq!(request.personnel[0].requested_leaves, vec![6]);
        assert_eq!(request.personnel[1].role, Role::NonShift);
        assert!(request.personnel[1].extra_leaves.is_empty());
        assert_eq!(request.config.max_night_shifts, 9);
        let counts = request.config.special_dates["2025-09-20"];
        assert_eq!((counts.morning, counts.evening, counts.night), (1, 1, 3));
    }

    #[test]
    fn max_night_shifts_defaults_to_nine() {
        let raw = r#"{ "personnel": [], "config": { "month": "2025-09" } }"#;
        let request: ScheduleRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.config.max_night_shifts, 9);
        assert!(request.config.public_holidays.is_empty());
        assert!(request.config.max_non_shift.is_none());
    }

    #[test]
    fn response_keys_days_by_iso_date_in_order() {
        let first = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let schedule = Schedule {
            days: (0..3)
                .map(|i| ScheduleDay {
                    date: first + chrono::Duration::days(i),
                    assigned: [vec![2, 5], vec![], vec![1]],
                })
                .collect(),
        };
        let response = ScheduleResponse::from_schedule(&schedule);
        let keys: Vec<_> = response.schedule.keys().cloned().collect();
        assert_eq!(keys, vec!["2025-09-01", "2025-09-02", "2025-09-03"]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["schedule"]["2025-09-01"]["P"], serde_json::json!([2, 5]));
        assert_eq!(json["schedule"]["2025-09-01"]["M"], serde_json::json!([1]));
    }

    #[test]
    fn error_body_carries_kind_and_message() {
        let body = ErrorBody::from_error(&RosterError::Infeasible);
        assert_eq!(body.error_kind, "INFEASIBLE");
        assert!(body.details.is_none());
        assert!(!body.message.is_empty());
    }
}
