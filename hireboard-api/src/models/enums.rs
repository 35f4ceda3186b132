use serde::{Deserialize, Serialize};

/// Seniority bracket attached to a job advert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    EntryLevel,
    MidLevel,
    SeniorLevel,
    Executive,
}

impl ExperienceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntryLevel => "entry_level",
            Self::MidLevel => "mid_level",
            Self::SeniorLevel => "senior_level",
            Self::Executive => "executive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

impl EmploymentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Remote,
    OnSite,
    Hybrid,
}

impl LocationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::OnSite => "on_site",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Outcome states of a job application. Stored as text; unknown strings are
/// rejected at the request boundary rather than written through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    InterviewScheduled,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::InterviewScheduled => "INTERVIEW_SCHEDULED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    PasswordReset,
}

impl TokenType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PasswordReset => "PASSWORD_RESET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_status_round_trips_through_wire_names() {
        let parsed: ApplicationStatus = serde_json::from_str("\"INTERVIEW_SCHEDULED\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::InterviewScheduled);
        assert_eq!(parsed.as_str(), "INTERVIEW_SCHEDULED");
    }

    #[test]
    fn unknown_application_status_is_rejected() {
        let parsed = serde_json::from_str::<ApplicationStatus>("\"GHOSTED\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn advert_enums_use_snake_case_names() {
        let level: ExperienceLevel = serde_json::from_str("\"senior_level\"").unwrap();
        assert_eq!(level.as_str(), "senior_level");
        let job_type: LocationType = serde_json::from_str("\"on_site\"").unwrap();
        assert_eq!(job_type.as_str(), "on_site");
    }
}
