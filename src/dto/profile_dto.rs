use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    candidate::Candidate,
    company::Company,
    identity::{Role, RoleKind},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCompanyPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCandidatePayload {
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[validate(length(max = 500))]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    #[validate(length(max = 500))]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub role: RoleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role: value.kind(),
            company: value.company().cloned(),
            candidate: value.candidate().cloned(),
        }
    }
}
