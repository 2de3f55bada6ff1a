use serde::Serialize;
use uuid::Uuid;

use super::{candidate::Candidate, company::Company};

/// Reference handed to the core by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IdentityRef(pub Uuid);

/// Capability attached to an identity. An identity owns at most one profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Company(Company),
    Candidate(Candidate),
    Anonymous,
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Company(_) => RoleKind::Company,
            Role::Candidate(_) => RoleKind::Candidate,
            Role::Anonymous => RoleKind::Anonymous,
        }
    }

    pub fn company(&self) -> Option<&Company> {
        match self {
            Role::Company(company) => Some(company),
            _ => None,
        }
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Role::Candidate(candidate) => Some(candidate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Company,
    Candidate,
    Anonymous,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Company => "company",
            RoleKind::Candidate => "candidate",
            RoleKind::Anonymous => "anonymous",
        }
    }
}
