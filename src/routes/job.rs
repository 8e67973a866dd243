use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::get_config,
    dto::job_dto::{
        CheckoutResponse, CreateJobPayload, JobListQuery, JobListResponse, JobResponse,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    services::pricing,
    services::stripe_service::CheckoutSessionRequest,
    AppState,
};

/// Creates a DRAFT job post and opens a checkout session for it.
///
/// Ordering matters: the payload (including the listing duration) is
/// validated before the draft is written, and the draft is durable before
/// the checkout session exists, so any completed-payment callback will find
/// the job it refers to. If the checkout call fails the draft stays behind,
/// unpaid and invisible.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 200, description = "Draft created, checkout session opened", body = Json<CheckoutResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Requester has no company")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    payload.check_business_rules()?;
    let tier = pricing::price_for(payload.listing_duration)
        .ok_or_else(|| Error::BadRequest("Unknown listing duration".to_string()))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::Unauthorized("Invalid token subject".to_string()))?;
    let company = state
        .job_service
        .company_for_user(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("No company associated with this user".to_string()))?;

    let job = state.job_service.create_draft(company.id, &payload).await?;

    let customer_id = state.billing_service.resolve_customer(user_id).await?;

    let config = get_config();
    let session = state
        .gateway
        .create_checkout_session(CheckoutSessionRequest {
            customer_id,
            job_id: job.id,
            product_name: format!("Job posting - {} days", tier.days),
            product_description: tier.description.to_string(),
            unit_amount: tier.price * 100,
            success_url: format!("{}/payment/success", config.app_base_url),
            cancel_url: format!("{}/payment/cancel", config.app_base_url),
        })
        .await?;

    let redirect_url = session
        .url
        .ok_or_else(|| Error::Internal("Checkout session has no redirect URL".to_string()))?;

    tracing::info!(job_id = %job.id, session_id = %session.id, "checkout session opened");

    Ok(Json(CheckoutResponse {
        job_id: job.id,
        redirect_url,
    }))
}

#[utoipa::path(
    get,
    path = "/api/public/jobs",
    params(
        ("limit" = Option<i64>, Query, description = "Number of items to return")
    ),
    responses(
        (status = 200, description = "Active job posts", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_public_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let jobs = state.job_service.list_public(limit).await?;
    let items: Vec<JobResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(JobListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/api/public/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Job post found", body = Json<JobResponse>),
        (status = 404, description = "No active job post with this id")
    )
)]
#[axum::debug_handler]
pub async fn get_public_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .get_public(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;
    Ok(Json(JobResponse::from(job)))
}
