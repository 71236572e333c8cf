//! Application lifecycle manager. Duplicate submissions are rejected by the
//! (job_id, candidate_id) uniqueness constraint, not a pre-check, so two
//! concurrent applies cannot both land.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, CandidateApplicationRow, JobApplicationRow};
use crate::pagination::Page;

/// Sort key for a job's application list. `FirstName` resolves against the
/// joined candidate row; everything else is a column on the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationSortKey {
    AppliedAt,
    Status,
    FirstName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationSort {
    pub key: ApplicationSortKey,
    pub ascending: bool,
}

impl ApplicationSort {
    /// Parses a `field-asc` / `field-desc` expression against the allow-list
    /// {applied_at, status, first_name}; anything else is newest-first.
    pub fn parse(raw: Option<&str>) -> ApplicationSort {
        let raw = raw.unwrap_or("applied_at-desc");
        let (field, order) = raw.split_once('-').unwrap_or((raw, "desc"));
        let key = match field {
            "applied_at" => ApplicationSortKey::AppliedAt,
            "status" => ApplicationSortKey::Status,
            "first_name" => ApplicationSortKey::FirstName,
            _ => {
                return ApplicationSort {
                    key: ApplicationSortKey::AppliedAt,
                    ascending: false,
                }
            }
        };
        ApplicationSort {
            key,
            ascending: order == "asc",
        }
    }

    fn order_clause(&self) -> &'static str {
        match (self.key, self.ascending) {
            (ApplicationSortKey::AppliedAt, true) => "a.applied_at ASC",
            (ApplicationSortKey::AppliedAt, false) => "a.applied_at DESC",
            (ApplicationSortKey::Status, true) => "a.status ASC",
            (ApplicationSortKey::Status, false) => "a.status DESC",
            (ApplicationSortKey::FirstName, true) => "u.first_name ASC",
            (ApplicationSortKey::FirstName, false) => "u.first_name DESC",
        }
    }
}

/// Submits an application in `pending`. The candidate id must come from the
/// caller's authenticated identity, never the request payload.
pub async fn create(
    db: &PgPool,
    job_id: i64,
    candidate_id: i64,
    resume_url: &str,
) -> Result<i64, AppError> {
    let job_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(db)
        .await?;
    if job_exists.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let inserted: Option<i64> = sqlx::query_scalar(
        "INSERT INTO applications (job_id, candidate_id, resume_url) VALUES ($1, $2, $3) \
         ON CONFLICT (job_id, candidate_id) DO NOTHING RETURNING id",
    )
    .bind(job_id)
    .bind(candidate_id)
    .bind(resume_url)
    .fetch_optional(db)
    .await?;

    let application_id = inserted.ok_or(AppError::DuplicateApplication)?;
    info!("Candidate {candidate_id} applied to job {job_id} (application {application_id})");
    Ok(application_id)
}

/// Re-tags an application. Only the recruiter owning the referenced job may
/// write; any of the five states may follow any other.
pub async fn set_status(
    db: &PgPool,
    application_id: i64,
    recruiter_id: i64,
    status: ApplicationStatus,
) -> Result<(), AppError> {
    let owner: Option<i64> = sqlx::query_scalar(
        "SELECT j.recruiter_id FROM applications a \
         JOIN jobs j ON j.id = a.job_id WHERE a.id = $1",
    )
    .bind(application_id)
    .fetch_optional(db)
    .await?;

    let owner =
        owner.ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    if owner != recruiter_id {
        return Err(AppError::Forbidden);
    }

    sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(application_id)
        .execute(db)
        .await?;

    info!("Application {application_id} set to {}", status.as_str());
    Ok(())
}

pub struct JobApplicationsPage {
    pub applications: Vec<JobApplicationRow>,
    pub total: i64,
}

/// Lists one job's applications for its owning recruiter, with optional
/// exact-status filtering. A missing job reads as Forbidden, the same as a
/// job owned by someone else.
pub async fn list_for_job(
    db: &PgPool,
    job_id: i64,
    recruiter_id: i64,
    status: Option<&str>,
    sort: &ApplicationSort,
    page: &Page,
) -> Result<JobApplicationsPage, AppError> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT recruiter_id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(db)
        .await?;
    match owner {
        Some(owner) if owner == recruiter_id => {}
        _ => return Err(AppError::Forbidden),
    }

    let mut count_qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM applications a WHERE a.job_id = ");
    count_qb.push_bind(job_id);
    if let Some(status) = status {
        count_qb.push(" AND a.status = ");
        count_qb.push_bind(status.to_string());
    }
    let total = count_qb.build_query_scalar::<i64>().fetch_one(db).await?;

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.applied_at, \
         u.first_name, u.last_name, u.email \
         FROM applications a JOIN users u ON u.id = a.candidate_id WHERE a.job_id = ",
    );
    qb.push_bind(job_id);
    if let Some(status) = status {
        qb.push(" AND a.status = ");
        qb.push_bind(status.to_string());
    }
    qb.push(" ORDER BY ");
    qb.push(sort.order_clause());
    qb.push(" LIMIT ");
    qb.push_bind(page.size);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());

    let applications: Vec<JobApplicationRow> = qb.build_query_as().fetch_all(db).await?;

    Ok(JobApplicationsPage {
        applications,
        total,
    })
}

/// All of one candidate's applications, annotated with the parent job,
/// newest first.
pub async fn list_for_candidate(
    db: &PgPool,
    candidate_id: i64,
) -> Result<Vec<CandidateApplicationRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.applied_at, \
         j.title, j.company_name, j.location \
         FROM applications a JOIN jobs j ON j.id = a.job_id \
         WHERE a.candidate_id = $1 ORDER BY a.applied_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_defaults_to_applied_at_desc() {
        let sort = ApplicationSort::parse(None);
        assert_eq!(sort.order_clause(), "a.applied_at DESC");
    }

    #[test]
    fn test_sort_first_name_resolves_against_candidate_join() {
        let sort = ApplicationSort::parse(Some("first_name-asc"));
        assert_eq!(sort.order_clause(), "u.first_name ASC");
    }

    #[test]
    fn test_sort_status_both_directions() {
        assert_eq!(
            ApplicationSort::parse(Some("status-asc")).order_clause(),
            "a.status ASC"
        );
        assert_eq!(
            ApplicationSort::parse(Some("status-desc")).order_clause(),
            "a.status DESC"
        );
    }

    #[test]
    fn test_sort_unknown_field_falls_back() {
        let sort = ApplicationSort::parse(Some("email-asc"));
        assert_eq!(sort.order_clause(), "a.applied_at DESC");
    }

    #[test]
    fn test_sort_missing_suffix_means_descending() {
        let sort = ApplicationSort::parse(Some("status"));
        assert_eq!(sort.order_clause(), "a.status DESC");
    }
}
