use std::sync::Arc;

use uuid::Uuid;

use crate::database::{ApplicationScope, Store, StoreError};
use crate::dto::application_dto::ApplyPayload;
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
    company::Company,
    job_offer::JobOffer,
};
use crate::utils::time::Clock;
use crate::utils::validation::{not_blank, validate_with};

fn already_applied() -> Error {
    Error::Conflict("You have already applied to this offer".to_string())
}

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn offer(&self, id: Uuid) -> Result<JobOffer> {
        self.store
            .get_offer(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job offer not found".to_string()))
    }

    async fn application(&self, id: Uuid) -> Result<Application> {
        self.store
            .get_application(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    /// Duplicate check first, then the open check, then insert. The store
    /// repeats both checks atomically; what runs here only picks the message.
    pub async fn apply(
        &self,
        candidate: &Candidate,
        offer_id: Uuid,
        payload: ApplyPayload,
    ) -> Result<Application> {
        validate_with(
            &payload,
            [("cover_letter", not_blank(Some(payload.cover_letter.as_str())))],
        )?;

        let offer = self.offer(offer_id).await?;
        if self
            .store
            .find_application(candidate.id, offer.id)
            .await?
            .is_some()
        {
            tracing::warn!(candidate_id = %candidate.id, offer_id = %offer.id, "duplicate application rejected");
            return Err(already_applied());
        }

        let today = self.clock.today();
        if offer.is_expired(today) {
            tracing::info!(offer_id = %offer.id, deadline = %offer.deadline, "application to expired offer rejected");
            return Err(Error::Expired("This offer has expired".to_string()));
        }
        if !offer.is_active {
            return Err(Error::Expired(
                "This offer is no longer accepting applications".to_string(),
            ));
        }

        let application = Application {
            id: Uuid::new_v4(),
            candidate_id: candidate.id,
            job_offer_id: offer.id,
            application_date: self.clock.now(),
            status: ApplicationStatus::Pending,
            cover_letter: payload.cover_letter,
            notes: payload.notes.filter(|notes| !notes.trim().is_empty()),
        };

        match self.store.insert_application(application, today).await {
            Ok(application) => {
                tracing::info!(
                    application_id = %application.id,
                    candidate_id = %candidate.id,
                    offer_id = %offer.id,
                    "application submitted"
                );
                Ok(application)
            }
            Err(StoreError::DuplicateApplication) => {
                tracing::warn!(candidate_id = %candidate.id, offer_id = %offer.id, "concurrent duplicate application rejected");
                Err(already_applied())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Allowed in any status, but only for the candidate who applied.
    pub async fn withdraw(&self, application_id: Uuid, candidate: &Candidate) -> Result<()> {
        let application = self.application(application_id).await?;
        if application.candidate_id != candidate.id {
            return Err(Error::Forbidden(
                "You can only withdraw your own applications".to_string(),
            ));
        }
        if !self.store.delete_application(application.id).await? {
            return Err(Error::NotFound("Application not found".to_string()));
        }
        tracing::info!(
            application_id = %application.id,
            status = %application.status,
            "application withdrawn"
        );
        Ok(())
    }

    pub async fn set_status(
        &self,
        application_id: Uuid,
        company: &Company,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let application = self.application(application_id).await?;
        let offer = self.offer(application.job_offer_id).await?;
        if !offer.is_owned_by(company) {
            return Err(Error::Forbidden(
                "Only the company that published the offer can review its applications"
                    .to_string(),
            ));
        }

        let from = application.status;
        if !from.can_transition_to(status) {
            return Err(Error::InvalidTransition { from, to: status });
        }

        match self
            .store
            .update_application_status(application.id, from, status)
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    application_id = %updated.id,
                    from = %from,
                    to = %status,
                    "application status changed"
                );
                Ok(updated)
            }
            Err(StoreError::StaleStatus) => {
                tracing::warn!(application_id = %application.id, from = %from, "status change lost a race");
                Err(StoreError::StaleStatus.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn for_candidate(&self, candidate: &Candidate) -> Result<Vec<Application>> {
        Ok(self
            .store
            .list_applications(ApplicationScope::Candidate(candidate.id))
            .await?)
    }

    pub async fn for_offer(&self, offer_id: Uuid, company: &Company) -> Result<Vec<Application>> {
        let offer = self.offer(offer_id).await?;
        if !offer.is_owned_by(company) {
            return Err(Error::Forbidden(
                "This offer belongs to another company".to_string(),
            ));
        }
        Ok(self
            .store
            .list_applications(ApplicationScope::Offer(offer.id))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockStore;
    use crate::utils::time::ManualClock;
    use chrono::NaiveDate;

    fn candidate() -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            identity_id: Uuid::new_v4(),
            phone: "+1 555 0100".into(),
            location: "Lisbon".into(),
            skills: "rust".into(),
            experience: "5 years".into(),
            resume: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn service(store: MockStore) -> ApplicationService {
        let clock = ManualClock::starting_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        ApplicationService::new(Arc::new(store), Arc::new(clock))
    }

    fn payload() -> ApplyPayload {
        ApplyPayload {
            cover_letter: "I would like to join".into(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_internal_error() {
        let mut store = MockStore::new();
        store
            .expect_get_offer()
            .returning(|_| Err(StoreError::Unavailable("connection reset".into())));

        let err = service(store)
            .apply(&candidate(), Uuid::new_v4(), payload())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn blank_cover_letter_never_reaches_the_store() {
        let store = MockStore::new();
        let mut payload = payload();
        payload.cover_letter = "   ".into();

        let err = service(store)
            .apply(&candidate(), Uuid::new_v4(), payload)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn lost_status_race_is_a_conflict() {
        let company_id = Uuid::new_v4();
        let offer_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let company = Company {
            id: company_id,
            identity_id: Uuid::new_v4(),
            name: "Acme".into(),
            description: "Widgets".into(),
            location: "Porto".into(),
            phone: "+1 555 0101".into(),
            website: None,
            created_at: chrono::Utc::now(),
        };
        let application = Application {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            job_offer_id: offer_id,
            application_date: chrono::Utc::now(),
            status: ApplicationStatus::Pending,
            cover_letter: "Hello".into(),
            notes: None,
        };
        let offer = JobOffer {
            id: offer_id,
            title: "Designer".into(),
            description: "Brand work".into(),
            category: crate::models::job_offer::Category::GraphicDesign,
            company_id,
            company_name: "Acme".into(),
            location: "Porto".into(),
            salary: None,
            requirements: "Portfolio".into(),
            publication_date: chrono::Utc::now(),
            deadline: today,
            is_active: true,
        };

        let mut store = MockStore::new();
        let stored = application.clone();
        store
            .expect_get_application()
            .returning(move |_| Ok(Some(stored.clone())));
        store
            .expect_get_offer()
            .returning(move |_| Ok(Some(offer.clone())));
        store
            .expect_update_application_status()
            .returning(|_, _, _| Err(StoreError::StaleStatus));

        let err = service(store)
            .set_status(application.id, &company, ApplicationStatus::Reviewed)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
