use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub about: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub x_account: Option<String>,
    pub created_at: DateTime<Utc>,
}
