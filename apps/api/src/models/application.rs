use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Application status tag. `Pending` is the initial state; the remaining
/// states are freely re-assignable by the owning recruiter — there is no
/// enforced transition order, and `Rejected`/`Hired` are terminal only by
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub fn parse(s: &str) -> Option<ApplicationStatus> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "reviewed" => Some(ApplicationStatus::Reviewed),
            "shortlisted" => Some(ApplicationStatus::Shortlisted),
            "rejected" => Some(ApplicationStatus::Rejected),
            "hired" => Some(ApplicationStatus::Hired),
            _ => None,
        }
    }
}

/// An application row joined with the candidate identity, as served to the
/// recruiter who owns the job.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub resume_url: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// An application row joined with its parent job, as served back to the
/// candidate who submitted it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub resume_url: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub title: String,
    pub company_name: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for (raw, status) in [
            ("pending", ApplicationStatus::Pending),
            ("reviewed", ApplicationStatus::Reviewed),
            ("shortlisted", ApplicationStatus::Shortlisted),
            ("rejected", ApplicationStatus::Rejected),
            ("hired", ApplicationStatus::Hired),
        ] {
            assert_eq!(ApplicationStatus::parse(raw), Some(status));
            assert_eq!(status.as_str(), raw);
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert_eq!(ApplicationStatus::parse("archived"), None);
        assert_eq!(ApplicationStatus::parse("Pending"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }
}
