use serde::{Deserialize, Serialize};

/// The two account kinds the system distinguishes. Authorization beyond this
/// tag (job ownership, application visibility) is checked per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Recruiter => "recruiter",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "candidate" => Some(Role::Candidate),
            "recruiter" => Some(Role::Recruiter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("candidate"), Some(Role::Candidate));
        assert_eq!(Role::parse("recruiter"), Some(Role::Recruiter));
        assert_eq!(Role::Candidate.as_str(), "candidate");
        assert_eq!(Role::Recruiter.as_str(), "recruiter");
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Recruiter"), None);
    }
}
