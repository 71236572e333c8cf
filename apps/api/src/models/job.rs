use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Experience bands a job can ask for. Stored as text; the check constraint
/// in the schema mirrors this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }

    pub fn parse(s: &str) -> Option<ExperienceLevel> {
        match s {
            "entry" => Some(ExperienceLevel::Entry),
            "mid" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            "lead" => Some(ExperienceLevel::Lead),
            _ => None,
        }
    }
}

/// One search-result row as it comes back from the page query, before the
/// skill lists are attached. `has_applied` is FALSE for anonymous viewers.
#[derive(Debug, Clone, FromRow)]
pub struct JobSummaryRow {
    pub id: i64,
    pub recruiter_id: i64,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
    pub recruiter_name: String,
    pub application_count: i64,
    pub has_applied: bool,
}

/// A search-result job with its skill list attached.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: i64,
    pub recruiter_id: i64,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
    pub recruiter_name: String,
    pub application_count: i64,
    pub has_applied: bool,
    pub skills: Vec<String>,
}

impl JobSummaryRow {
    pub fn into_summary(self, skills: Vec<String>) -> JobSummary {
        JobSummary {
            id: self.id,
            recruiter_id: self.recruiter_id,
            title: self.title,
            description: self.description,
            company_name: self.company_name,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            experience_level: self.experience_level,
            created_at: self.created_at,
            recruiter_name: self.recruiter_name,
            has_applied: self.has_applied,
            application_count: self.application_count,
            skills,
        }
    }
}

/// Single-job detail row. Carries the recruiter contact in addition to the
/// viewer annotation; the skill list is attached separately.
#[derive(Debug, Clone, FromRow)]
pub struct JobDetailRow {
    pub id: i64,
    pub recruiter_id: i64,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
    pub recruiter_name: String,
    pub recruiter_email: String,
    pub has_applied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub id: i64,
    pub recruiter_id: i64,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
    pub recruiter_name: String,
    pub recruiter_email: String,
    pub has_applied: bool,
    pub skills: Vec<String>,
}

impl JobDetailRow {
    pub fn into_detail(self, skills: Vec<String>) -> JobDetail {
        JobDetail {
            id: self.id,
            recruiter_id: self.recruiter_id,
            title: self.title,
            description: self.description,
            company_name: self.company_name,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            experience_level: self.experience_level,
            created_at: self.created_at,
            recruiter_name: self.recruiter_name,
            recruiter_email: self.recruiter_email,
            has_applied: self.has_applied,
            skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_round_trip() {
        for (raw, level) in [
            ("entry", ExperienceLevel::Entry),
            ("mid", ExperienceLevel::Mid),
            ("senior", ExperienceLevel::Senior),
            ("lead", ExperienceLevel::Lead),
        ] {
            assert_eq!(ExperienceLevel::parse(raw), Some(level));
            assert_eq!(level.as_str(), raw);
        }
    }

    #[test]
    fn test_experience_level_is_exact() {
        assert_eq!(ExperienceLevel::parse("Senior"), None);
        assert_eq!(ExperienceLevel::parse("junior"), None);
        assert_eq!(ExperienceLevel::parse(""), None);
    }
}
