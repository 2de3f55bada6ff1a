//! Persistence port for companies, candidates, offers and applications.
//!
//! Two adapters implement [`Store`]: [`postgres::PgStore`] for deployments and
//! [`memory::MemoryStore`] for local runs and tests. Both must hold the same
//! guarantees: one profile per identity, one application per
//! (candidate, offer) pair, cascading deletes, an atomic
//! check-and-insert for applications and compare-and-set status updates.

pub mod memory;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
    company::Company,
    job_offer::{Category, JobOffer},
};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("candidate already applied to this offer")]
    DuplicateApplication,
    #[error("identity already owns a profile")]
    ProfileExists,
    #[error("offer is not open for applications")]
    OfferClosed,
    #[error("application status changed concurrently")]
    StaleStatus,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OfferOrder {
    #[default]
    NewestFirst,
    DeadlineFirst,
}

/// Filter over job offers. [`OfferQuery::matches`] is the reference
/// semantics; SQL adapters must translate it one-to-one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferQuery {
    /// Only offers open on this date (`is_active` and deadline not passed).
    pub open_on: Option<NaiveDate>,
    pub company_id: Option<Uuid>,
    pub category: Option<Category>,
    /// Case-insensitive substring over title, description and company name.
    pub search: Option<String>,
    pub deadline_until: Option<NaiveDate>,
    pub order: OfferOrder,
    pub limit: Option<usize>,
}

impl OfferQuery {
    pub fn open(today: NaiveDate) -> Self {
        Self {
            open_on: Some(today),
            ..Self::default()
        }
    }

    pub fn for_company(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());
        self
    }

    pub fn deadline_until(mut self, last_day: NaiveDate) -> Self {
        self.deadline_until = Some(last_day);
        self
    }

    pub fn ordered_by(mut self, order: OfferOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, offer: &JobOffer) -> bool {
        if let Some(today) = self.open_on {
            if !offer.is_open(today) {
                return false;
            }
        }
        if let Some(company_id) = self.company_id {
            if offer.company_id != company_id {
                return false;
            }
        }
        if let Some(category) = self.category {
            if offer.category != category {
                return false;
            }
        }
        if let Some(last_day) = self.deadline_until {
            if offer.deadline > last_day {
                return false;
            }
        }
        match &self.search {
            Some(term) => offer.matches_search(term),
            None => true,
        }
    }

    /// Orders and truncates offers that already passed [`OfferQuery::matches`].
    pub fn arrange(&self, offers: &mut Vec<JobOffer>) {
        match self.order {
            OfferOrder::NewestFirst => offers.sort_by(|a, b| {
                b.publication_date
                    .cmp(&a.publication_date)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            OfferOrder::DeadlineFirst => offers.sort_by(|a, b| {
                a.deadline
                    .cmp(&b.deadline)
                    .then_with(|| b.publication_date.cmp(&a.publication_date))
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
        if let Some(limit) = self.limit {
            offers.truncate(limit);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    Candidate(Uuid),
    Offer(Uuid),
    Company(Uuid),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_company_by_identity(&self, identity_id: Uuid) -> StoreResult<Option<Company>>;

    async fn find_candidate_by_identity(
        &self,
        identity_id: Uuid,
    ) -> StoreResult<Option<Candidate>>;

    /// Fails with [`StoreError::ProfileExists`] when the identity owns any profile.
    async fn insert_company(&self, company: Company) -> StoreResult<Company>;

    /// Fails with [`StoreError::ProfileExists`] when the identity owns any profile.
    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<Candidate>;

    async fn update_company(&self, company: Company) -> StoreResult<Company>;

    async fn update_candidate(&self, candidate: Candidate) -> StoreResult<Candidate>;

    /// Removes whatever profile the identity owns, together with its offers and applications.
    async fn delete_profiles(&self, identity_id: Uuid) -> StoreResult<bool>;

    async fn insert_offer(&self, offer: JobOffer) -> StoreResult<JobOffer>;

    async fn get_offer(&self, id: Uuid) -> StoreResult<Option<JobOffer>>;

    async fn update_offer(&self, offer: JobOffer) -> StoreResult<JobOffer>;

    /// Deletes the offer and its applications.
    async fn delete_offer(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_offers(&self, query: OfferQuery) -> StoreResult<Vec<JobOffer>>;

    /// Atomically checks for an existing application by the same candidate,
    /// checks that the offer is open on `today`, and inserts.
    async fn insert_application(
        &self,
        application: Application,
        today: NaiveDate,
    ) -> StoreResult<Application>;

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    async fn find_application(
        &self,
        candidate_id: Uuid,
        job_offer_id: Uuid,
    ) -> StoreResult<Option<Application>>;

    /// Moves the status only if it still equals `from`; otherwise [`StoreError::StaleStatus`].
    async fn update_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<Application>;

    async fn delete_application(&self, id: Uuid) -> StoreResult<bool>;

    /// Newest application first.
    async fn list_applications(&self, scope: ApplicationScope) -> StoreResult<Vec<Application>>;
}
