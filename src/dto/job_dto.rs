use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job_post::{JobPost, JobStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 2, max = 120))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    #[validate(length(min = 1))]
    pub employment_type: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0))]
    pub salary_from: i32,
    #[validate(range(min = 0))]
    pub salary_to: i32,
    pub listing_duration: i32,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl CreateJobPayload {
    /// Cross-field checks the derive can't express. Runs with `validate()`
    /// before any row is written.
    pub fn check_business_rules(&self) -> crate::error::Result<()> {
        if self.salary_from > self.salary_to {
            return Err(crate::error::Error::BadRequest(
                "salary_from must not exceed salary_to".to_string(),
            ));
        }
        if crate::services::pricing::price_for(self.listing_duration).is_none() {
            return Err(crate::error::Error::BadRequest(format!(
                "Unknown listing duration: {} days",
                self.listing_duration
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub job_id: Uuid,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
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
}

impl From<JobPost> for JobResponse {
    fn from(job: JobPost) -> Self {
        Self {
            id: job.id,
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            employment_type: job.employment_type,
            location: job.location,
            salary_from: job.salary_from,
            salary_to: job.salary_to,
            listing_duration: job.listing_duration,
            benefits: job.benefits,
            status: job.status,
            published_at: job.published_at,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<JobResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateJobPayload {
        CreateJobPayload {
            title: "Senior Rust Engineer".to_string(),
            description: "Build and operate our payment workflows.".to_string(),
            employment_type: "full-time".to_string(),
            location: "Remote".to_string(),
            salary_from: 120_000,
            salary_to: 160_000,
            listing_duration: 30,
            benefits: vec!["remote".to_string()],
        }
    }

    #[test]
    fn valid_payload_passes() {
        let p = payload();
        assert!(p.validate().is_ok());
        assert!(p.check_business_rules().is_ok());
    }

    #[test]
    fn inverted_salary_range_rejected() {
        let mut p = payload();
        p.salary_from = 200_000;
        assert!(p.check_business_rules().is_err());
    }

    #[test]
    fn unknown_duration_rejected() {
        let mut p = payload();
        p.listing_duration = 45;
        assert!(p.check_business_rules().is_err());
    }

    #[test]
    fn empty_title_rejected() {
        let mut p = payload();
        p.title = String::new();
        assert!(p.validate().is_err());
    }
}
