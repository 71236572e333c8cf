//! Job search service: distinct counting, page fetch with per-viewer
//! annotation, and single-job lookup. The viewer-conditional column set is
//! expressed as two explicit query variants selected by a capability check,
//! never by splicing user state into SQL text.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::jobs::filter::JobFilter;
use crate::jobs::store::skills_for_jobs;
use crate::models::job::{JobDetail, JobDetailRow, JobSummary, JobSummaryRow};
use crate::pagination::Page;

/// Sort key for job search, restricted to an allow-list. Anything else falls
/// back to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSortKey {
    CreatedAt,
    SalaryMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSort {
    pub key: JobSortKey,
    pub ascending: bool,
}

impl JobSort {
    /// Parses a `field-asc` / `field-desc` sort expression. Unrecognized
    /// fields and missing suffixes both resolve to `created_at` descending.
    pub fn parse(raw: Option<&str>) -> JobSort {
        let raw = raw.unwrap_or("created_at-desc");
        let (field, order) = raw.split_once('-').unwrap_or((raw, "desc"));
        let key = match field {
            "created_at" => JobSortKey::CreatedAt,
            "salary_max" => JobSortKey::SalaryMax,
            _ => {
                return JobSort {
                    key: JobSortKey::CreatedAt,
                    ascending: false,
                }
            }
        };
        JobSort {
            key,
            ascending: order == "asc",
        }
    }

    /// Static ORDER BY fragment. Ties fall back to the store's natural order;
    /// no secondary key is applied.
    fn order_clause(&self) -> &'static str {
        match (self.key, self.ascending) {
            (JobSortKey::CreatedAt, true) => "j.created_at ASC",
            (JobSortKey::CreatedAt, false) => "j.created_at DESC",
            (JobSortKey::SalaryMax, true) => "j.salary_max ASC",
            (JobSortKey::SalaryMax, false) => "j.salary_max DESC",
        }
    }
}

const SUMMARY_COLUMNS: &str = "j.id, j.recruiter_id, j.title, j.description, j.company_name, \
     j.location, j.salary_min, j.salary_max, j.experience_level, j.created_at, \
     u.first_name AS recruiter_name, \
     (SELECT COUNT(*) FROM applications ac WHERE ac.job_id = j.id) AS application_count";

/// Counts distinct jobs matching the filter. The predicate may reference the
/// skill join, so the count collapses any fan-out back to job identity.
pub async fn count_matching(db: &PgPool, filter: &JobFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(DISTINCT j.id) FROM jobs j");
    filter.push_where(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(db).await
}

fn page_query_for_viewer(
    filter: &JobFilter,
    sort: &JobSort,
    page: &Page,
    viewer_id: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {SUMMARY_COLUMNS}, EXISTS (SELECT 1 FROM applications mine \
         WHERE mine.job_id = j.id AND mine.candidate_id = "
    ));
    qb.push_bind(viewer_id);
    qb.push(") AS has_applied FROM jobs j JOIN users u ON u.id = j.recruiter_id");
    push_page_tail(&mut qb, filter, sort, page);
    qb
}

fn page_query_anonymous(
    filter: &JobFilter,
    sort: &JobSort,
    page: &Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {SUMMARY_COLUMNS}, FALSE AS has_applied \
         FROM jobs j JOIN users u ON u.id = j.recruiter_id"
    ));
    push_page_tail(&mut qb, filter, sort, page);
    qb
}

fn push_page_tail(
    qb: &mut QueryBuilder<'static, Postgres>,
    filter: &JobFilter,
    sort: &JobSort,
    page: &Page,
) {
    filter.push_where(qb);
    qb.push(" ORDER BY ");
    qb.push(sort.order_clause());
    qb.push(" LIMIT ");
    qb.push_bind(page.size);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
}

/// Runs the count and one page of results, then attaches skill lists.
/// `viewer` selects the annotated query variant; anonymous searches always
/// report `has_applied = false`.
pub async fn search(
    db: &PgPool,
    filter: &JobFilter,
    sort: &JobSort,
    page: &Page,
    viewer: Option<i64>,
) -> Result<(Vec<JobSummary>, i64), AppError> {
    let total = count_matching(db, filter).await?;

    let mut qb = match viewer {
        Some(viewer_id) => page_query_for_viewer(filter, sort, page, viewer_id),
        None => page_query_anonymous(filter, sort, page),
    };
    let rows: Vec<JobSummaryRow> = qb.build_query_as().fetch_all(db).await?;

    let job_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut skills = skills_for_jobs(db, &job_ids).await?;

    let jobs = rows
        .into_iter()
        .map(|row| {
            let job_skills = skills.remove(&row.id).unwrap_or_default();
            row.into_summary(job_skills)
        })
        .collect();

    Ok((jobs, total))
}

/// Fetches one job with recruiter contact, viewer annotation, and skills.
pub async fn get_by_id(
    db: &PgPool,
    job_id: i64,
    viewer: Option<i64>,
) -> Result<Option<JobDetail>, AppError> {
    let row: Option<JobDetailRow> = match viewer {
        Some(viewer_id) => {
            sqlx::query_as(
                "SELECT j.id, j.recruiter_id, j.title, j.description, j.company_name, \
                 j.location, j.salary_min, j.salary_max, j.experience_level, j.created_at, \
                 u.first_name AS recruiter_name, u.email AS recruiter_email, \
                 EXISTS (SELECT 1 FROM applications a \
                  WHERE a.job_id = j.id AND a.candidate_id = $2) AS has_applied \
                 FROM jobs j JOIN users u ON u.id = j.recruiter_id WHERE j.id = $1",
            )
            .bind(job_id)
            .bind(viewer_id)
            .fetch_optional(db)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT j.id, j.recruiter_id, j.title, j.description, j.company_name, \
                 j.location, j.salary_min, j.salary_max, j.experience_level, j.created_at, \
                 u.first_name AS recruiter_name, u.email AS recruiter_email, \
                 FALSE AS has_applied \
                 FROM jobs j JOIN users u ON u.id = j.recruiter_id WHERE j.id = $1",
            )
            .bind(job_id)
            .fetch_optional(db)
            .await?
        }
    };

    let Some(row) = row else {
        return Ok(None);
    };

    let mut skills = skills_for_jobs(db, &[row.id]).await?;
    let job_skills = skills.remove(&row.id).unwrap_or_default();
    Ok(Some(row.into_detail(job_skills)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::filter::SearchParams;

    #[test]
    fn test_sort_defaults_to_created_at_desc() {
        let sort = JobSort::parse(None);
        assert_eq!(sort.key, JobSortKey::CreatedAt);
        assert!(!sort.ascending);
        assert_eq!(sort.order_clause(), "j.created_at DESC");
    }

    #[test]
    fn test_sort_parses_allow_listed_fields() {
        let sort = JobSort::parse(Some("salary_max-asc"));
        assert_eq!(sort.key, JobSortKey::SalaryMax);
        assert!(sort.ascending);
        assert_eq!(sort.order_clause(), "j.salary_max ASC");
    }

    #[test]
    fn test_sort_missing_suffix_means_descending() {
        let sort = JobSort::parse(Some("created_at"));
        assert_eq!(sort.order_clause(), "j.created_at DESC");
    }

    #[test]
    fn test_sort_rejects_unknown_field() {
        let sort = JobSort::parse(Some("salary_min-asc"));
        assert_eq!(sort.order_clause(), "j.created_at DESC");
        let sort = JobSort::parse(Some("id; DROP TABLE jobs"));
        assert_eq!(sort.order_clause(), "j.created_at DESC");
    }

    #[test]
    fn test_viewer_variant_binds_viewer_before_filter_params() {
        let filter = JobFilter::compile(&SearchParams {
            location: Some("Remote".to_string()),
            ..Default::default()
        });
        let sort = JobSort::parse(None);
        let page = Page::from_raw(None, None);
        let qb = page_query_for_viewer(&filter, &sort, &page, 42);
        let sql = qb.sql();
        assert!(sql.contains("mine.candidate_id = $1"), "sql was: {sql}");
        assert!(sql.contains("j.location ILIKE $2"), "sql was: {sql}");
        assert!(sql.contains("LIMIT $3"), "sql was: {sql}");
        assert!(sql.contains("OFFSET $4"), "sql was: {sql}");
    }

    #[test]
    fn test_anonymous_variant_has_no_viewer_join() {
        let filter = JobFilter::compile(&SearchParams::default());
        let sort = JobSort::parse(Some("salary_max-desc"));
        let page = Page::from_raw(Some("2"), Some("5"));
        let qb = page_query_anonymous(&filter, &sort, &page);
        let sql = qb.sql();
        assert!(sql.contains("FALSE AS has_applied"), "sql was: {sql}");
        assert!(!sql.contains("mine.candidate_id"), "sql was: {sql}");
        assert!(sql.contains("ORDER BY j.salary_max DESC"), "sql was: {sql}");
    }
}
