use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub phone: String,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}
