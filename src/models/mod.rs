pub mod application;
pub mod candidate;
pub mod company;
pub mod identity;
pub mod job_offer;
