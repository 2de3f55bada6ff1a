use std::sync::Arc;

use uuid::Uuid;

use crate::database::Store;
use crate::dto::profile_dto::{
    RegisterCandidatePayload, RegisterCompanyPayload, UpdateCandidatePayload,
    UpdateCompanyPayload,
};
use crate::error::{Error, Result};
use crate::models::{
    candidate::Candidate,
    company::Company,
    identity::{IdentityRef, Role},
};
use crate::utils::time::Clock;
use crate::utils::validation::{not_blank, validate_with};

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Company wins if an identity somehow carries both profiles.
    pub async fn role_of(&self, identity: IdentityRef) -> Result<Role> {
        if let Some(company) = self.store.find_company_by_identity(identity.0).await? {
            return Ok(Role::Company(company));
        }
        if let Some(candidate) = self.store.find_candidate_by_identity(identity.0).await? {
            return Ok(Role::Candidate(candidate));
        }
        Ok(Role::Anonymous)
    }

    pub async fn require_company(&self, identity: IdentityRef, action: &str) -> Result<Company> {
        match self.role_of(identity).await? {
            Role::Company(company) => Ok(company),
            other => {
                tracing::warn!(identity = %identity.0, role = other.kind().as_str(), action, "company-only action refused");
                Err(Error::Forbidden(format!("Only companies can {action}")))
            }
        }
    }

    pub async fn require_candidate(
        &self,
        identity: IdentityRef,
        action: &str,
    ) -> Result<Candidate> {
        match self.role_of(identity).await? {
            Role::Candidate(candidate) => Ok(candidate),
            other => {
                tracing::warn!(identity = %identity.0, role = other.kind().as_str(), action, "candidate-only action refused");
                Err(Error::Forbidden(format!("Only candidates can {action}")))
            }
        }
    }

    pub async fn register_company(
        &self,
        identity: IdentityRef,
        mut payload: RegisterCompanyPayload,
    ) -> Result<Company> {
        payload.website = blank_to_none(payload.website);
        validate_with(
            &payload,
            [
                ("name", not_blank(Some(payload.name.as_str()))),
                ("location", not_blank(Some(payload.location.as_str()))),
            ],
        )?;

        let company = Company {
            id: Uuid::new_v4(),
            identity_id: identity.0,
            name: payload.name.trim().to_string(),
            description: payload.description,
            location: payload.location,
            phone: payload.phone,
            website: payload.website,
            created_at: self.clock.now(),
        };

        let company = self.store.insert_company(company).await?;
        tracing::info!(company_id = %company.id, identity = %identity.0, "company profile registered");
        Ok(company)
    }

    pub async fn register_candidate(
        &self,
        identity: IdentityRef,
        payload: RegisterCandidatePayload,
    ) -> Result<Candidate> {
        validate_with(&payload, [("location", not_blank(Some(payload.location.as_str())))])?;

        let candidate = Candidate {
            id: Uuid::new_v4(),
            identity_id: identity.0,
            phone: payload.phone,
            location: payload.location,
            skills: payload.skills,
            experience: payload.experience,
            resume: blank_to_none(payload.resume),
            created_at: self.clock.now(),
        };

        let candidate = self.store.insert_candidate(candidate).await?;
        tracing::info!(candidate_id = %candidate.id, identity = %identity.0, "candidate profile registered");
        Ok(candidate)
    }

    pub async fn update_company(
        &self,
        identity: IdentityRef,
        mut payload: UpdateCompanyPayload,
    ) -> Result<Company> {
        let mut company = self.require_company(identity, "edit a company profile").await?;
        // An empty website clears it; anything else has to be a URL.
        let website = payload.website.take().map(|w| w.trim().to_string());
        payload.website = website.clone().filter(|w| !w.is_empty());
        validate_with(&payload, [("name", not_blank(payload.name.as_deref()))])?;

        if let Some(name) = payload.name {
            company.name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            company.description = description;
        }
        if let Some(location) = payload.location {
            company.location = location;
        }
        if let Some(phone) = payload.phone {
            company.phone = phone;
        }
        if let Some(website) = website {
            company.website = Some(website).filter(|w| !w.is_empty());
        }

        Ok(self.store.update_company(company).await?)
    }

    pub async fn update_candidate(
        &self,
        identity: IdentityRef,
        payload: UpdateCandidatePayload,
    ) -> Result<Candidate> {
        let mut candidate = self
            .require_candidate(identity, "edit a candidate profile")
            .await?;
        validate_with(&payload, [("location", not_blank(payload.location.as_deref()))])?;

        if let Some(phone) = payload.phone {
            candidate.phone = phone;
        }
        if let Some(location) = payload.location {
            candidate.location = location;
        }
        if let Some(skills) = payload.skills {
            candidate.skills = skills;
        }
        if let Some(experience) = payload.experience {
            candidate.experience = experience;
        }
        if payload.resume.is_some() {
            candidate.resume = blank_to_none(payload.resume);
        }

        Ok(self.store.update_candidate(candidate).await?)
    }

    /// Deletes the caller's profile and everything hanging off it.
    pub async fn remove_profile(&self, identity: IdentityRef) -> Result<bool> {
        let removed = self.store.delete_profiles(identity.0).await?;
        if removed {
            tracing::info!(identity = %identity.0, "profile removed");
        }
        Ok(removed)
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
