use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// External billing identity. At most one per user, never reassigned.
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
