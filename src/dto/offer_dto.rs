use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job_offer::{Category, JobOffer};
use crate::services::offer_service::OfferDetail;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOfferPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub category: Category,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub salary: Option<Decimal>,
    #[validate(length(min = 1))]
    pub requirements: String,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateOfferPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub category: Option<Category>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    /// Absent keeps the salary, `null` clears it.
    #[serde(deserialize_with = "present_or_null")]
    pub salary: Option<Option<Decimal>>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferListQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecentOffersQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpiringOffersQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOfferResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub category_label: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub location: String,
    pub salary: Option<Decimal>,
    pub requirements: String,
    pub publication_date: DateTime<Utc>,
    pub deadline: NaiveDate,
    pub is_active: bool,
    pub is_expired: bool,
}

impl JobOfferResponse {
    /// `is_expired` depends on the date the response is rendered for.
    pub fn new(offer: JobOffer, today: NaiveDate) -> Self {
        let is_expired = offer.is_expired(today);
        Self {
            id: offer.id,
            title: offer.title,
            description: offer.description,
            category: offer.category,
            category_label: offer.category.label().to_string(),
            company_id: offer.company_id,
            company_name: offer.company_name,
            location: offer.location,
            salary: offer.salary,
            requirements: offer.requirements,
            publication_date: offer.publication_date,
            deadline: offer.deadline,
            is_active: offer.is_active,
            is_expired,
        }
    }

    pub fn list(offers: Vec<JobOffer>, today: NaiveDate) -> Vec<Self> {
        offers
            .into_iter()
            .map(|offer| Self::new(offer, today))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetailResponse {
    #[serde(flatten)]
    pub offer: JobOfferResponse,
    pub has_applied: bool,
}

impl OfferDetailResponse {
    pub fn new(detail: OfferDetail, today: NaiveDate) -> Self {
        Self {
            offer: JobOfferResponse::new(detail.offer, today),
            has_applied: detail.has_applied,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub key: Category,
    pub label: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            key: category,
            label: category.label().to_string(),
        }
    }
}
