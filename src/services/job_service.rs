use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_dto::CreateJobPayload;
use crate::error::{Error, Result};
use crate::models::company::Company;
use crate::models::job_post::{JobPost, JobStatus};
use crate::models::webhook_event::WebhookEvent;

const JOB_COLUMNS: &str = "id, company_id, title, description, employment_type, location, \
     salary_from, salary_to, listing_duration, benefits, status, published_at, created_at, updated_at";

/// Outcome of applying a payment confirmation to a job post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The draft was published by this delivery.
    Published,
    /// A previous delivery already published it; this one is a benign duplicate.
    AlreadyActive,
    /// No post matches the correlation data; retrying cannot help.
    NotFound,
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn company_for_user(&self, user_id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, user_id, name, location, about, logo, website, x_account, created_at \
             FROM companies WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    /// Persists the post as DRAFT. This write is durable before any checkout
    /// session is opened, so a confirmation callback always finds its job.
    pub async fn create_draft(
        &self,
        company_id: Uuid,
        payload: &CreateJobPayload,
    ) -> Result<JobPost> {
        let job = sqlx::query_as::<_, JobPost>(&format!(
            "INSERT INTO job_posts (
                company_id, title, description, employment_type, location,
                salary_from, salary_to, listing_duration, benefits, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'DRAFT')
            RETURNING {JOB_COLUMNS}"
        ))
        .bind(company_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.employment_type)
        .bind(&payload.location)
        .bind(payload.salary_from)
        .bind(payload.salary_to)
        .bind(payload.listing_duration)
        .bind(&payload.benefits)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn get_public(&self, id: Uuid) -> Result<Option<JobPost>> {
        let job = sqlx::query_as::<_, JobPost>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_posts WHERE id = $1 AND status = 'ACTIVE'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn list_public(&self, limit: i64) -> Result<Vec<JobPost>> {
        let jobs = sqlx::query_as::<_, JobPost>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_posts WHERE status = 'ACTIVE' \
             ORDER BY published_at DESC NULLS LAST LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// Events are recorded in the same transaction that applies them, so a
    /// hit here means the transition already committed and the delivery is a
    /// duplicate.
    pub async fn find_processed_event(&self, event_id: &str) -> Result<Option<WebhookEvent>> {
        let event = sqlx::query_as::<_, WebhookEvent>(
            "SELECT id, event_id, event_type, job_id, received_at \
             FROM webhook_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Applies a verified `checkout.session.completed` event.
    ///
    /// The transition is one atomic conditional UPDATE, not read-then-write:
    /// concurrent duplicate deliveries cannot both take effect, and the
    /// event record lands in the same transaction so a crash between the two
    /// writes cannot strand a half-applied event. Errors here surface as 5xx
    /// so the provider redelivers.
    pub async fn apply_checkout_completed(
        &self,
        event_id: &str,
        event_type: &str,
        job_id: Uuid,
        company_id: Uuid,
    ) -> Result<PublishOutcome> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE job_posts \
             SET status = 'ACTIVE', published_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND company_id = $2 AND status = 'DRAFT'",
        )
        .bind(job_id)
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        let outcome = if updated.rows_affected() == 1 {
            PublishOutcome::Published
        } else {
            let status = sqlx::query_scalar::<_, JobStatus>(
                "SELECT status FROM job_posts WHERE id = $1 AND company_id = $2",
            )
            .bind(job_id)
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;
            match status {
                Some(JobStatus::Active) => PublishOutcome::AlreadyActive,
                Some(JobStatus::Draft) => {
                    return Err(Error::Internal(format!(
                        "Job {} still DRAFT after conditional publish",
                        job_id
                    )));
                }
                None => PublishOutcome::NotFound,
            }
        };

        if outcome != PublishOutcome::NotFound {
            sqlx::query(
                "INSERT INTO webhook_events (event_id, event_type, job_id) \
                 VALUES ($1, $2, $3) ON CONFLICT (event_id) DO NOTHING",
            )
            .bind(event_id)
            .bind(event_type)
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(outcome)
    }
}
