use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::job::JobSummary;
use crate::saved::registry::{list, toggle};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub job_id: i64,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub status: &'static str,
    pub saved: bool,
}

/// POST /api/saved-jobs/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let saved = toggle(&state.db, user.id, req.job_id).await?;

    Ok(Json(ToggleResponse {
        status: "success",
        saved,
    }))
}

#[derive(Serialize)]
pub struct SavedJobsResponse {
    pub status: &'static str,
    pub data: SavedJobsData,
}

#[derive(Serialize)]
pub struct SavedJobsData {
    pub jobs: Vec<JobSummary>,
}

/// GET /api/saved-jobs
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SavedJobsResponse>, AppError> {
    let jobs = list(&state.db, user.id).await?;

    Ok(Json(SavedJobsResponse {
        status: "success",
        data: SavedJobsData { jobs },
    }))
}
