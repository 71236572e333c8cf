use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::applications::lifecycle::{
    create, list_for_candidate, list_for_job, set_status, ApplicationSort,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application::{
    ApplicationStatus, CandidateApplicationRow, JobApplicationRow,
};
use crate::models::user::Role;
use crate::pagination::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    /// Opaque reference minted by the resume upload collaborator.
    pub resume_url: String,
}

#[derive(Serialize)]
pub struct ApplyResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub application_id: i64,
}

/// POST /api/applications/apply/:job_id
pub async fn handle_apply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<i64>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    user.require(Role::Candidate)?;

    let resume_url = req.resume_url.trim();
    if resume_url.is_empty() {
        return Err(AppError::Validation("Please upload a resume".to_string()));
    }

    let application_id = create(&state.db, job_id, user.id, resume_url).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            status: "success",
            message: "Application submitted",
            application_id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct JobApplicationsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct JobApplicationsResponse {
    pub status: &'static str,
    pub results: usize,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub data: JobApplicationsData,
}

#[derive(Serialize)]
pub struct JobApplicationsData {
    pub applications: Vec<JobApplicationRow>,
}

/// GET /api/applications/job/:job_id
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<i64>,
    Query(query): Query<JobApplicationsQuery>,
) -> Result<Json<JobApplicationsResponse>, AppError> {
    user.require(Role::Recruiter)?;

    let page = Page::from_raw(query.page.as_deref(), query.limit.as_deref());
    let sort = ApplicationSort::parse(query.sort.as_deref());
    let result = list_for_job(
        &state.db,
        job_id,
        user.id,
        query.status.as_deref(),
        &sort,
        &page,
    )
    .await?;

    Ok(Json(JobApplicationsResponse {
        status: "success",
        results: result.applications.len(),
        total: result.total,
        page: page.number,
        total_pages: page.total_pages(result.total),
        data: JobApplicationsData {
            applications: result.applications,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusUpdateResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// PATCH /api/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    user.require(Role::Recruiter)?;

    let status = ApplicationStatus::parse(&req.status).ok_or_else(|| {
        AppError::Validation(
            "status must be one of pending, reviewed, shortlisted, rejected, hired".to_string(),
        )
    })?;

    set_status(&state.db, application_id, user.id, status).await?;

    Ok(Json(StatusUpdateResponse {
        status: "success",
        message: "Status updated",
    }))
}

#[derive(Serialize)]
pub struct MyApplicationsResponse {
    pub status: &'static str,
    pub results: usize,
    pub data: MyApplicationsData,
}

#[derive(Serialize)]
pub struct MyApplicationsData {
    pub applications: Vec<CandidateApplicationRow>,
}

/// GET /api/applications/my-applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MyApplicationsResponse>, AppError> {
    user.require(Role::Candidate)?;

    let applications = list_for_candidate(&state.db, user.id).await?;

    Ok(Json(MyApplicationsResponse {
        status: "success",
        results: applications.len(),
        data: MyApplicationsData { applications },
    }))
}
