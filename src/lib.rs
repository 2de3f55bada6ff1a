pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::ListingDefaults;
use crate::database::Store;
use crate::middleware::auth::IdentityVerifier;
use crate::services::{
    application_service::ApplicationService, offer_service::OfferService,
    profile_service::ProfileService, report_service::ReportService,
};
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub identity_verifier: IdentityVerifier,
    pub listing: ListingDefaults,
    pub profile_service: ProfileService,
    pub offer_service: OfferService,
    pub application_service: ApplicationService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, identity_token_secret: &str) -> Self {
        let profile_service = ProfileService::new(store.clone(), clock.clone());
        let offer_service = OfferService::new(store.clone(), clock.clone());
        let application_service = ApplicationService::new(store.clone(), clock.clone());
        let report_service = ReportService::new(store, clock.clone());

        Self {
            clock,
            identity_verifier: IdentityVerifier::new(identity_token_secret),
            listing: ListingDefaults::default(),
            profile_service,
            offer_service,
            application_service,
            report_service,
        }
    }

    pub fn with_listing_defaults(mut self, listing: ListingDefaults) -> Self {
        self.listing = listing;
        self
    }
}
