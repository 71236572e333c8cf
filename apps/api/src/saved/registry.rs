//! Toggle/set membership between a user and a job. Each call performs exactly
//! one state flip; repeated toggles alternate predictably.

use sqlx::PgPool;

use crate::errors::{is_foreign_key_violation, AppError};
use crate::jobs::store::skills_for_jobs;
use crate::models::job::{JobSummary, JobSummaryRow};

/// Flips the saved state for (user, job). Returns the state after the call:
/// `true` when the job is now saved, `false` when the save was removed.
pub async fn toggle(db: &PgPool, user_id: i64, job_id: i64) -> Result<bool, AppError> {
    let deleted = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
        .bind(user_id)
        .bind(job_id)
        .execute(db)
        .await?;
    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    let insert = sqlx::query(
        "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, job_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(job_id)
    .execute(db)
    .await;

    match insert {
        Ok(_) => Ok(true),
        Err(e) if is_foreign_key_violation(&e) => {
            Err(AppError::NotFound(format!("Job {job_id} not found")))
        }
        Err(e) => Err(e.into()),
    }
}

/// All jobs the user saved, joined with recruiter name and skill lists at
/// read time, most recently saved first.
pub async fn list(db: &PgPool, user_id: i64) -> Result<Vec<JobSummary>, AppError> {
    let rows: Vec<JobSummaryRow> = sqlx::query_as(
        "SELECT j.id, j.recruiter_id, j.title, j.description, j.company_name, \
         j.location, j.salary_min, j.salary_max, j.experience_level, j.created_at, \
         u.first_name AS recruiter_name, \
         (SELECT COUNT(*) FROM applications ac WHERE ac.job_id = j.id) AS application_count, \
         EXISTS (SELECT 1 FROM applications mine \
          WHERE mine.job_id = j.id AND mine.candidate_id = sj.user_id) AS has_applied \
         FROM saved_jobs sj \
         JOIN jobs j ON j.id = sj.job_id \
         JOIN users u ON u.id = j.recruiter_id \
         WHERE sj.user_id = $1 ORDER BY sj.saved_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    let job_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut skills = skills_for_jobs(db, &job_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let job_skills = skills.remove(&row.id).unwrap_or_default();
            row.into_summary(job_skills)
        })
        .collect())
}
