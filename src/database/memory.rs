use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{ApplicationScope, OfferQuery, Store, StoreError, StoreResult};
use crate::models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
    company::Company,
    job_offer::JobOffer,
};

#[derive(Debug, Default)]
struct Tables {
    companies: HashMap<Uuid, Company>,
    candidates: HashMap<Uuid, Candidate>,
    offers: HashMap<Uuid, JobOffer>,
    applications: HashMap<Uuid, Application>,
}

impl Tables {
    fn identity_has_profile(&self, identity_id: Uuid) -> bool {
        self.companies.values().any(|c| c.identity_id == identity_id)
            || self.candidates.values().any(|c| c.identity_id == identity_id)
    }

    fn hydrate(&self, offer: &JobOffer) -> JobOffer {
        let mut offer = offer.clone();
        if let Some(company) = self.companies.get(&offer.company_id) {
            offer.company_name = company.name.clone();
        }
        offer
    }

    fn remove_offer(&mut self, offer_id: Uuid) -> bool {
        let removed = self.offers.remove(&offer_id).is_some();
        if removed {
            self.applications.retain(|_, a| a.job_offer_id != offer_id);
        }
        removed
    }
}

/// In-process store. Every operation runs under one lock, which is what makes
/// check-and-insert atomic here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_company_by_identity(&self, identity_id: Uuid) -> StoreResult<Option<Company>> {
        let tables = self.tables()?;
        Ok(tables
            .companies
            .values()
            .find(|c| c.identity_id == identity_id)
            .cloned())
    }

    async fn find_candidate_by_identity(
        &self,
        identity_id: Uuid,
    ) -> StoreResult<Option<Candidate>> {
        let tables = self.tables()?;
        Ok(tables
            .candidates
            .values()
            .find(|c| c.identity_id == identity_id)
            .cloned())
    }

    async fn insert_company(&self, company: Company) -> StoreResult<Company> {
        let mut tables = self.tables()?;
        if tables.identity_has_profile(company.identity_id) {
            return Err(StoreError::ProfileExists);
        }
        tables.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<Candidate> {
        let mut tables = self.tables()?;
        if tables.identity_has_profile(candidate.identity_id) {
            return Err(StoreError::ProfileExists);
        }
        tables.candidates.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    async fn update_company(&self, company: Company) -> StoreResult<Company> {
        let mut tables = self.tables()?;
        let slot = tables
            .companies
            .get_mut(&company.id)
            .ok_or(StoreError::NotFound)?;
        *slot = company.clone();
        Ok(company)
    }

    async fn update_candidate(&self, candidate: Candidate) -> StoreResult<Candidate> {
        let mut tables = self.tables()?;
        let slot = tables
            .candidates
            .get_mut(&candidate.id)
            .ok_or(StoreError::NotFound)?;
        *slot = candidate.clone();
        Ok(candidate)
    }

    async fn delete_profiles(&self, identity_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        let mut removed = false;

        let company_ids: Vec<Uuid> = tables
            .companies
            .values()
            .filter(|c| c.identity_id == identity_id)
            .map(|c| c.id)
            .collect();
        for company_id in company_ids {
            let offer_ids: Vec<Uuid> = tables
                .offers
                .values()
                .filter(|o| o.company_id == company_id)
                .map(|o| o.id)
                .collect();
            for offer_id in offer_ids {
                tables.remove_offer(offer_id);
            }
            tables.companies.remove(&company_id);
            removed = true;
        }

        let candidate_ids: Vec<Uuid> = tables
            .candidates
            .values()
            .filter(|c| c.identity_id == identity_id)
            .map(|c| c.id)
            .collect();
        for candidate_id in candidate_ids {
            tables
                .applications
                .retain(|_, a| a.candidate_id != candidate_id);
            tables.candidates.remove(&candidate_id);
            removed = true;
        }

        Ok(removed)
    }

    async fn insert_offer(&self, offer: JobOffer) -> StoreResult<JobOffer> {
        let mut tables = self.tables()?;
        if !tables.companies.contains_key(&offer.company_id) {
            return Err(StoreError::NotFound);
        }
        let stored = tables.hydrate(&offer);
        tables.offers.insert(offer.id, stored.clone());
        Ok(stored)
    }

    async fn get_offer(&self, id: Uuid) -> StoreResult<Option<JobOffer>> {
        let tables = self.tables()?;
        Ok(tables.offers.get(&id).map(|offer| tables.hydrate(offer)))
    }

    async fn update_offer(&self, offer: JobOffer) -> StoreResult<JobOffer> {
        let mut tables = self.tables()?;
        if !tables.offers.contains_key(&offer.id) {
            return Err(StoreError::NotFound);
        }
        let stored = tables.hydrate(&offer);
        tables.offers.insert(offer.id, stored.clone());
        Ok(stored)
    }

    async fn delete_offer(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(tables.remove_offer(id))
    }

    async fn list_offers(&self, query: OfferQuery) -> StoreResult<Vec<JobOffer>> {
        let tables = self.tables()?;
        let mut offers: Vec<JobOffer> = tables
            .offers
            .values()
            .map(|offer| tables.hydrate(offer))
            .filter(|offer| query.matches(offer))
            .collect();
        query.arrange(&mut offers);
        Ok(offers)
    }

    async fn insert_application(
        &self,
        application: Application,
        today: NaiveDate,
    ) -> StoreResult<Application> {
        let mut tables = self.tables()?;

        if !tables.candidates.contains_key(&application.candidate_id) {
            return Err(StoreError::NotFound);
        }
        let offer = tables
            .offers
            .get(&application.job_offer_id)
            .ok_or(StoreError::NotFound)?;
        let open = offer.is_open(today);

        let duplicate = tables.applications.values().any(|a| {
            a.candidate_id == application.candidate_id
                && a.job_offer_id == application.job_offer_id
        });
        if duplicate {
            return Err(StoreError::DuplicateApplication);
        }
        if !open {
            return Err(StoreError::OfferClosed);
        }

        tables.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let tables = self.tables()?;
        Ok(tables.applications.get(&id).cloned())
    }

    async fn find_application(
        &self,
        candidate_id: Uuid,
        job_offer_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        let tables = self.tables()?;
        Ok(tables
            .applications
            .values()
            .find(|a| a.candidate_id == candidate_id && a.job_offer_id == job_offer_id)
            .cloned())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<Application> {
        let mut tables = self.tables()?;
        let application = tables
            .applications
            .get_mut(&id)
            .ok_or(StoreError::NotFound)?;
        if application.status != from {
            return Err(StoreError::StaleStatus);
        }
        application.status = to;
        Ok(application.clone())
    }

    async fn delete_application(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(tables.applications.remove(&id).is_some())
    }

    async fn list_applications(&self, scope: ApplicationScope) -> StoreResult<Vec<Application>> {
        let tables = self.tables()?;
        let mut applications: Vec<Application> = tables
            .applications
            .values()
            .filter(|a| match scope {
                ApplicationScope::Candidate(candidate_id) => a.candidate_id == candidate_id,
                ApplicationScope::Offer(offer_id) => a.job_offer_id == offer_id,
                ApplicationScope::Company(company_id) => tables
                    .offers
                    .get(&a.job_offer_id)
                    .map_or(false, |offer| offer.company_id == company_id),
            })
            .cloned()
            .collect();
        applications.sort_by(|a, b| {
            b.application_date
                .cmp(&a.application_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(applications)
    }
}
