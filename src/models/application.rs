use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Contacted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Contacted => "contacted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// `contacted` and `rejected` have no way out.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Contacted | ApplicationStatus::Rejected
        )
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        matches!(
            (self, next),
            (Pending, Reviewed) | (Reviewed, Contacted) | (Pending, Rejected) | (Reviewed, Rejected)
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "contacted" => Ok(ApplicationStatus::Contacted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_offer_id: Uuid,
    pub application_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::{self, *};

    const ALL: [ApplicationStatus; 4] = [Pending, Reviewed, Contacted, Rejected];

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(Pending.can_transition_to(Reviewed));
        assert!(Reviewed.can_transition_to(Contacted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Reviewed.can_transition_to(Rejected));
    }

    #[test]
    fn backward_and_skipping_transitions_are_rejected() {
        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Contacted));
        for status in ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status}");
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        for from in [Contacted, Rejected] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
        assert!(!Pending.is_terminal());
        assert!(!Reviewed.is_terminal());
    }

    #[test]
    fn status_parses_from_storage_labels() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("pendiente".parse::<ApplicationStatus>().is_err());
    }
}
