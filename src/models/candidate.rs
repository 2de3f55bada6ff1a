use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub phone: String,
    pub location: String,
    pub skills: String,
    pub experience: String,
    /// Opaque reference to a resume kept by an external file store.
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
}
