use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::database::{ApplicationScope, OfferOrder, OfferQuery, Store};
use crate::error::Result;
use crate::models::{
    application::Application,
    company::Company,
    job_offer::{Category, JobOffer},
};
use crate::utils::time::Clock;

pub const MAX_EXPIRING_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_offers: usize,
    pub total_applications: usize,
    pub active_offers: usize,
}

pub struct CompanyDashboard {
    pub stats: DashboardStats,
    /// Every offer of the company with its application count, newest first.
    pub offers: Vec<(JobOffer, usize)>,
    pub applications: Vec<Application>,
}

/// Tallies offers per category. Every category gets an entry, even at zero.
pub fn counts_by_category(open_offers: &[JobOffer]) -> BTreeMap<Category, usize> {
    let mut counts: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|category| (category, 0)).collect();
    for offer in open_offers {
        *counts.entry(offer.category).or_default() += 1;
    }
    counts
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn category_counts(&self) -> Result<BTreeMap<Category, usize>> {
        let open = self
            .store
            .list_offers(OfferQuery::open(self.clock.today()))
            .await?;
        Ok(counts_by_category(&open))
    }

    /// Open offers whose deadline falls in `[today, today + days]`, soonest first.
    pub async fn expiring_within(&self, days: u32) -> Result<Vec<JobOffer>> {
        let days = days.min(MAX_EXPIRING_WINDOW_DAYS);
        let today = self.clock.today();
        let query = OfferQuery::open(today)
            .deadline_until(today + Duration::days(i64::from(days)))
            .ordered_by(OfferOrder::DeadlineFirst);
        Ok(self.store.list_offers(query).await?)
    }

    pub async fn dashboard_stats(&self, company: &Company) -> Result<DashboardStats> {
        Ok(self.dashboard(company).await?.stats)
    }

    pub async fn dashboard(&self, company: &Company) -> Result<CompanyDashboard> {
        let today = self.clock.today();
        let offers = self
            .store
            .list_offers(OfferQuery::default().for_company(company.id))
            .await?;
        let applications = self
            .store
            .list_applications(ApplicationScope::Company(company.id))
            .await?;

        let stats = DashboardStats {
            total_offers: offers.len(),
            total_applications: applications.len(),
            active_offers: offers.iter().filter(|offer| offer.is_open(today)).count(),
        };

        let offers = offers
            .into_iter()
            .map(|offer| {
                let count = applications
                    .iter()
                    .filter(|a| a.job_offer_id == offer.id)
                    .count();
                (offer, count)
            })
            .collect();

        Ok(CompanyDashboard {
            stats,
            offers,
            applications,
        })
    }
}
