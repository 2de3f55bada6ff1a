use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::{OfferQuery, Store};
use crate::dto::offer_dto::{CreateOfferPayload, OfferListQuery, UpdateOfferPayload};
use crate::error::{Error, Result};
use crate::models::{company::Company, identity::IdentityRef, job_offer::JobOffer};
use crate::utils::time::Clock;
use crate::utils::validation::{deadline_not_in_past, non_negative, not_blank, validate_with};

pub const MAX_RECENT_OFFERS: usize = 50;

pub struct OfferDetail {
    pub offer: JobOffer,
    pub has_applied: bool,
}

#[derive(Clone)]
pub struct OfferService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl OfferService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn publish(&self, company: &Company, payload: CreateOfferPayload) -> Result<JobOffer> {
        let today = self.today();
        validate_with(
            &payload,
            [
                ("title", not_blank(Some(payload.title.as_str()))),
                ("deadline", deadline_not_in_past(payload.deadline, today)),
                ("salary", non_negative(payload.salary)),
            ],
        )?;

        let offer = JobOffer {
            id: Uuid::new_v4(),
            title: payload.title.trim().to_string(),
            description: payload.description,
            category: payload.category,
            company_id: company.id,
            company_name: company.name.clone(),
            location: payload.location,
            salary: payload.salary,
            requirements: payload.requirements,
            publication_date: self.clock.now(),
            deadline: payload.deadline,
            is_active: true,
        };

        let offer = self.store.insert_offer(offer).await?;
        tracing::info!(
            offer_id = %offer.id,
            company_id = %company.id,
            deadline = %offer.deadline,
            "job offer published"
        );
        Ok(offer)
    }

    pub async fn get(&self, id: Uuid) -> Result<JobOffer> {
        self.store
            .get_offer(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job offer not found".to_string()))
    }

    /// `has_applied` is only ever true for a candidate viewer.
    pub async fn detail(&self, id: Uuid, viewer: Option<IdentityRef>) -> Result<OfferDetail> {
        let offer = self.get(id).await?;
        let has_applied = match viewer {
            Some(identity) => match self.store.find_candidate_by_identity(identity.0).await? {
                Some(candidate) => self
                    .store
                    .find_application(candidate.id, offer.id)
                    .await?
                    .is_some(),
                None => false,
            },
            None => false,
        };
        Ok(OfferDetail { offer, has_applied })
    }

    /// Loads an offer and checks that `company` owns it.
    pub async fn get_owned(&self, id: Uuid, company: &Company) -> Result<JobOffer> {
        let offer = self.get(id).await?;
        if !offer.is_owned_by(company) {
            tracing::warn!(offer_id = %id, company_id = %company.id, "offer owned by another company");
            return Err(Error::Forbidden(
                "This offer belongs to another company".to_string(),
            ));
        }
        Ok(offer)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company: &Company,
        payload: UpdateOfferPayload,
    ) -> Result<JobOffer> {
        let mut offer = self.get_owned(id, company).await?;

        // The merged deadline is checked, so an untouched past deadline blocks edits too.
        let deadline = payload.deadline.unwrap_or(offer.deadline);
        validate_with(
            &payload,
            [
                ("title", not_blank(payload.title.as_deref())),
                ("deadline", deadline_not_in_past(deadline, self.today())),
                ("salary", non_negative(payload.salary.flatten())),
            ],
        )?;

        if let Some(title) = payload.title {
            offer.title = title.trim().to_string();
        }
        if let Some(description) = payload.description {
            offer.description = description;
        }
        if let Some(category) = payload.category {
            offer.category = category;
        }
        if let Some(location) = payload.location {
            offer.location = location;
        }
        if let Some(salary) = payload.salary {
            offer.salary = salary;
        }
        if let Some(requirements) = payload.requirements {
            offer.requirements = requirements;
        }
        if let Some(is_active) = payload.is_active {
            offer.is_active = is_active;
        }
        offer.deadline = deadline;

        let offer = self.store.update_offer(offer).await?;
        tracing::info!(offer_id = %offer.id, is_active = offer.is_active, "job offer updated");
        Ok(offer)
    }

    pub async fn retract(&self, id: Uuid, company: &Company) -> Result<()> {
        let offer = self.get_owned(id, company).await?;
        if !self.store.delete_offer(offer.id).await? {
            return Err(Error::NotFound("Job offer not found".to_string()));
        }
        tracing::info!(offer_id = %offer.id, company_id = %company.id, "job offer retracted");
        Ok(())
    }

    /// Open offers, newest first, narrowed by category and free-text search.
    pub async fn list_open(&self, filter: OfferListQuery) -> Result<Vec<JobOffer>> {
        let query = OfferQuery::open(self.today())
            .with_category(filter.category)
            .with_search(filter.search);
        Ok(self.store.list_offers(query).await?)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<JobOffer>> {
        let limit = limit.clamp(1, MAX_RECENT_OFFERS);
        let query = OfferQuery::open(self.today()).limit(limit);
        Ok(self.store.list_offers(query).await?)
    }
}
