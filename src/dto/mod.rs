pub mod application_dto;
pub mod offer_dto;
pub mod profile_dto;
pub mod report_dto;
