//! Job persistence: transactional creation with skill linking, owner-gated
//! deletion, and the shared skill-list read used by search and saved-job
//! listings.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::ExperienceLevel;

/// Validated fields for a new posting.
#[derive(Debug)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: ExperienceLevel,
}

/// Inserts the job, resolves each skill name, and links them — all in one
/// transaction. A failure at any step rolls back every prior write.
pub async fn create_job(
    db: &PgPool,
    recruiter_id: i64,
    job: &NewJob,
    skill_names: &[String],
) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;

    let job_id: i64 = sqlx::query_scalar(
        "INSERT INTO jobs (recruiter_id, title, description, company_name, location, \
         salary_min, salary_max, experience_level) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(recruiter_id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.company_name)
    .bind(&job.location)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(job.experience_level.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for name in skill_names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let skill_id = lookup_or_create_skill(&mut tx, name).await?;
        sqlx::query("INSERT INTO job_skills (job_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(job_id)
            .bind(skill_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("Recruiter {recruiter_id} created job {job_id}");
    Ok(job_id)
}

/// Insert-or-fetch in one statement: two requests racing on a brand-new skill
/// name both resolve to the same row.
async fn lookup_or_create_skill(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO skills (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
}

/// Deletes a job on behalf of its owner. The schema cascades the delete to
/// skill links, applications, and saves; skills themselves are left behind.
pub async fn delete_job(db: &PgPool, job_id: i64, requester_id: i64) -> Result<(), AppError> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT recruiter_id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(db)
        .await?;

    let owner = owner.ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if owner != requester_id {
        return Err(AppError::Forbidden);
    }

    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(db)
        .await?;

    info!("Recruiter {requester_id} deleted job {job_id}");
    Ok(())
}

/// Skill names for a set of jobs, grouped by job id. Order within a job's
/// list is not guaranteed. Jobs with no skills are absent from the map.
pub async fn skills_for_jobs(
    db: &PgPool,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    if job_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT js.job_id, s.name FROM job_skills js \
         JOIN skills s ON s.id = js.skill_id WHERE js.job_id = ANY($1)",
    )
    .bind(job_ids)
    .fetch_all(db)
    .await?;

    let mut by_job: HashMap<i64, Vec<String>> = HashMap::new();
    for (job_id, name) in rows {
        by_job.entry(job_id).or_default().push(name);
    }
    Ok(by_job)
}
