use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, OptionalAuthUser};
use crate::errors::AppError;
use crate::jobs::filter::{JobFilter, SearchParams};
use crate::jobs::search::{get_by_id, search, JobSort};
use crate::jobs::store::{create_job, delete_job, NewJob};
use crate::models::job::{ExperienceLevel, JobDetail, JobSummary};
use crate::models::user::Role;
use crate::pagination::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub ids: Option<String>,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub status: &'static str,
    pub results: usize,
    pub total: i64,
    pub data: JobListData,
}

#[derive(Serialize)]
pub struct JobListData {
    pub jobs: Vec<JobSummary>,
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let page = Page::from_raw(query.page.as_deref(), query.limit.as_deref());
    let sort = JobSort::parse(query.sort.as_deref());
    let filter = JobFilter::compile(&SearchParams {
        search: query.search,
        location: query.location,
        experience: query.experience,
        skills: query.skills,
        ids: query.ids,
    });

    let viewer_id = viewer.map(|u| u.id);
    let (jobs, total) = search(&state.db, &filter, &sort, &page, viewer_id).await?;

    Ok(Json(JobListResponse {
        status: "success",
        results: jobs.len(),
        total,
        data: JobListData { jobs },
    }))
}

#[derive(Serialize)]
pub struct JobResponse {
    pub status: &'static str,
    pub data: JobData,
}

#[derive(Serialize)]
pub struct JobData {
    pub job: JobDetail,
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobResponse>, AppError> {
    let viewer_id = viewer.map(|u| u.id);
    let job = get_by_id(&state.db, job_id, viewer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(JobResponse {
        status: "success",
        data: JobData { job },
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateJobRequest {
    fn validate(self) -> Result<(NewJob, Vec<String>), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("company_name", &self.company_name),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }

        let experience_level = ExperienceLevel::parse(&self.experience_level).ok_or_else(|| {
            AppError::Validation(
                "experience_level must be one of entry, mid, senior, lead".to_string(),
            )
        })?;

        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salary_min must not exceed salary_max".to_string(),
                ));
            }
        }

        Ok((
            NewJob {
                title: self.title,
                description: self.description,
                company_name: self.company_name,
                location: self.location,
                salary_min: self.salary_min,
                salary_max: self.salary_max,
                experience_level,
            },
            self.skills,
        ))
    }
}

#[derive(Serialize)]
pub struct CreateJobResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub job_id: i64,
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    user.require(Role::Recruiter)?;
    let (job, skills) = req.validate()?;
    let job_id = create_job(&state.db, user.id, &job, &skills).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            status: "success",
            message: "Job created",
            job_id,
        }),
    ))
}

#[derive(Serialize)]
pub struct DeleteJobResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<DeleteJobResponse>, AppError> {
    user.require(Role::Recruiter)?;
    delete_job(&state.db, job_id, user.id).await?;

    Ok(Json(DeleteJobResponse {
        status: "success",
        message: "Job deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateJobRequest {
        CreateJobRequest {
            title: "Backend Developer".to_string(),
            description: "Build services".to_string(),
            company_name: "Acme".to_string(),
            location: "Remote".to_string(),
            salary_min: Some(100_000),
            salary_max: Some(150_000),
            experience_level: "mid".to_string(),
            skills: vec!["Go".to_string(), "Docker".to_string()],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let (job, skills) = base_request().validate().expect("should validate");
        assert_eq!(job.experience_level, ExperienceLevel::Mid);
        assert_eq!(skills.len(), 2);
    }

    #[test]
    fn test_validate_rejects_blank_required_field() {
        let mut req = base_request();
        req.title = "   ".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_experience_level() {
        let mut req = base_request();
        req.experience_level = "principal".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_salary_range() {
        let mut req = base_request();
        req.salary_min = Some(200_000);
        req.salary_max = Some(150_000);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_allows_open_salary_range() {
        let mut req = base_request();
        req.salary_min = None;
        req.salary_max = Some(90_000);
        assert!(req.validate().is_ok());
    }
}
