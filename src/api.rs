//! REST API for schedule generation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::demo_data::{self, DemoData};
use crate::dto::{ErrorBody, ScheduleRequest, ScheduleResponse};
use crate::error::RosterError;
use crate::solver::{self, SolverOptions};

/// Application state shared across handlers.
pub struct AppState {
    pub solver_options: SolverOptions,
}

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        .route("/generate-schedule", post(generate_schedule))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Medical Shift Schedule Generator",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "good_lp/microlp",
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo request.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<ScheduleRequest>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /generate-schedule - Solve one month and return the schedule.
///
/// The solve is a blocking computation; it runs on the blocking pool so the
/// service keeps serving other requests meanwhile.
async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let options = state.solver_options;
    let schedule = tokio::task::spawn_blocking(move || {
        solver::generate_schedule(&request, &options)
    })
    .await
    .map_err(|err| ApiError(RosterError::Solver(format!("solve task failed: {err}"))))??;

    Ok(Json(ScheduleResponse::from_schedule(&schedule)))
}

/// Wrapper turning a [`RosterError`] into a structured HTTP response.
pub struct ApiError(pub RosterError);

impl From<RosterError> for ApiError {
    fn from(error: RosterError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(ErrorBody::from_error(&self.0))).into_response()
    }
}

fn status_for(error: &RosterError) -> StatusCode {
    match error {
        RosterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        // Well-formed request, but no schedule can be produced from it.
        RosterError::InsufficientCapacity(_)
        | RosterError::Infeasible
        | RosterError::Timeout => StatusCode::CONFLICT,
        RosterError::Solver(_) | RosterError::InternalValidation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_statuses() {
        assert_eq!(
            status_for(&RosterError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RosterError::InsufficientCapacity("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_for(&RosterError::Infeasible), StatusCode::CONFLICT);
        assert_eq!(status_for(&RosterError::Timeout), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&RosterError::InternalValidation(Vec::new())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn router_builds() {
        let state = Arc::new(AppState {
            solver_options: SolverOptions::default(),
        });
        let _ = router(state);
    }
}
