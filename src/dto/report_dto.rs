use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::offer_dto::JobOfferResponse;
use crate::models::{application::Application, job_offer::Category};
use crate::services::report_service::{CompanyDashboard, DashboardStats};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCountResponse {
    pub category: Category,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOfferResponse {
    #[serde(flatten)]
    pub offer: JobOfferResponse,
    pub application_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub offers: Vec<DashboardOfferResponse>,
    pub applications: Vec<Application>,
}

impl DashboardResponse {
    pub fn new(dashboard: CompanyDashboard, today: NaiveDate) -> Self {
        Self {
            stats: dashboard.stats,
            offers: dashboard
                .offers
                .into_iter()
                .map(|(offer, application_count)| DashboardOfferResponse {
                    offer: JobOfferResponse::new(offer, today),
                    application_count,
                })
                .collect(),
            applications: dashboard.applications,
        }
    }
}
