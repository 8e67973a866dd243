use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Record of an applied provider event. The UNIQUE event_id column makes the
/// log double as an explicit dedup ledger on top of the status-conditioned
/// transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookEvent {
    pub id: Uuid,
    pub event_id: String,
    pub event_type: String,
    pub job_id: Option<Uuid>,
    pub received_at: DateTime<Utc>,
}
