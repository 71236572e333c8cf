use axum::{extract::State, Json};
use serde::Serialize;

use crate::analytics::trend::{recruiter_trend, TrendPoint};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TrendResponse {
    pub status: &'static str,
    pub data: TrendData,
}

#[derive(Serialize)]
pub struct TrendData {
    pub trend: Vec<TrendPoint>,
}

/// GET /api/applications/stats
pub async fn handle_recruiter_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TrendResponse>, AppError> {
    user.require(Role::Recruiter)?;

    let trend = recruiter_trend(&state.db, user.id).await?;

    Ok(Json(TrendResponse {
        status: "success",
        data: TrendData { trend },
    }))
}
