pub mod application_service;
pub mod offer_service;
pub mod profile_service;
pub mod report_service;
