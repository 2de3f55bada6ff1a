use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    #[validate(length(min = 1, max = 10000))]
    pub cover_letter: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: ApplicationStatus,
}
