use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use log::{error, info};

use crate::config::{Config, EngineConfig};
use crate::data::{AssignmentsRequest, SuggestOutput, SuggestRequest, WorkerScore};
use crate::error::AssignError;
use crate::solver::{self, AssignmentEngine};

type ApiError = (StatusCode, String);

fn reject(e: AssignError) -> ApiError {
    let status = match &e {
        AssignError::Config(_) | AssignError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
        AssignError::Conflict { .. } => StatusCode::CONFLICT,
        AssignError::Settings(_) | AssignError::Execution(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    error!("Request failed: {}", e);
    (status, e.to_string())
}

async fn suggest_handler(
    State(config): State<EngineConfig>,
    Json(input): Json<SuggestRequest>,
) -> Result<Json<SuggestOutput>, ApiError> {
    let shifts = solver::shift_universe(input.start_date, input.end_date).map_err(reject)?;
    let workers: Vec<_> = input
        .workers
        .into_iter()
        .map(|mut w| {
            w.retain_constraints_within(&shifts);
            w
        })
        .collect();

    let engine = AssignmentEngine::new(input.settings, config);
    engine
        .suggest(&shifts, &workers)
        .await
        .map(Json)
        .map_err(reject)
}

async fn validate_handler(Json(input): Json<AssignmentsRequest>) -> Result<StatusCode, ApiError> {
    solver::validate_assignments(&input.assignments, &input.workers).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn recalculate_handler(Json(input): Json<AssignmentsRequest>) -> Json<Vec<WorkerScore>> {
    Json(solver::recalculate_scores(&input.assignments, &input.workers))
}

pub fn router(config: EngineConfig) -> Router {
    Router::new()
        .route("/v1/shifts/suggest", post(suggest_handler))
        .route("/v1/shifts/validate", post(validate_handler))
        .route("/v1/scores/recalculate", post(recalculate_handler))
        .with_state(config)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let app = router(config.engine);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
