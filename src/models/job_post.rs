use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a job post. DRAFT rows are invisible to the public
/// listing; ACTIVE is terminal for the payment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Draft,
    Active,
}

impl JobStatus {
    /// The only legal transition: a confirmed payment publishes a draft.
    /// Total and idempotent, so re-applying a redelivered confirmation is a
    /// no-op rather than an error.
    pub fn on_payment_confirmed(self) -> JobStatus {
        match self {
            JobStatus::Draft => JobStatus::Active,
            JobStatus::Active => JobStatus::Active,
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, JobStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Active => "ACTIVE",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPost {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub employment_type: String,
    pub location: String,
    pub salary_from: i32,
    pub salary_to: i32,
    pub listing_duration: i32,
    pub benefits: Vec<String>,
    pub status: JobStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_confirmation_publishes_draft() {
        assert_eq!(JobStatus::Draft.on_payment_confirmed(), JobStatus::Active);
    }

    #[test]
    fn payment_confirmation_is_idempotent_on_active() {
        let status = JobStatus::Draft.on_payment_confirmed();
        assert_eq!(status.on_payment_confirmed(), JobStatus::Active);
    }

    #[test]
    fn only_active_posts_are_public() {
        assert!(!JobStatus::Draft.is_public());
        assert!(JobStatus::Active.is_public());
    }
}
