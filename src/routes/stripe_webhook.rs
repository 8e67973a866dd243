use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode};
use uuid::Uuid;

use crate::{
    config::get_config,
    dto::stripe_dto::{StripeEvent, StripeSessionObject},
    error::{Error, Result},
    services::job_service::PublishOutcome,
    utils::stripe_signature::verify_signature,
    AppState,
};

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Ingests payment-provider callbacks.
///
/// Deliveries are at-least-once and unordered, so everything downstream of
/// signature verification must be safe to repeat. 4xx responses stop the
/// provider's retries (the delivery can never succeed), 5xx asks for a
/// redelivery.
#[utoipa::path(
    post,
    path = "/api/webhook/stripe",
    responses(
        (status = 200, description = "Event applied or intentionally ignored"),
        (status = 400, description = "Invalid signature or uncorrelatable event"),
        (status = 404, description = "Correlated job does not exist"),
        (status = 500, description = "Transient failure, provider should retry")
    )
)]
#[axum::debug_handler]
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    // Signature check comes first; the payload is untrusted bytes until it
    // passes.
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::WebhookSignature("Missing Stripe-Signature header".to_string()))?;
    verify_signature(&get_config().stripe_webhook_secret, &body, signature)?;

    let event: StripeEvent = serde_json::from_slice(&body)?;

    if event.event_type != CHECKOUT_COMPLETED {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "ignoring event");
        return Ok(StatusCode::OK);
    }

    if let Some(seen) = state.job_service.find_processed_event(&event.id).await? {
        tracing::info!(event_id = %event.id, job_id = ?seen.job_id, "event already applied");
        return Ok(StatusCode::OK);
    }

    let session: StripeSessionObject = serde_json::from_value(event.data.object.clone())?;

    let job_id = session.job_id().ok_or_else(|| {
        tracing::error!(event_id = %event.id, "completed session carries no jobId metadata");
        Error::Correlation("No job id in session metadata".to_string())
    })?;
    let job_id = Uuid::parse_str(job_id)
        .map_err(|_| Error::Correlation("Job id in metadata is not a valid id".to_string()))?;

    let customer_id = session
        .customer
        .ok_or_else(|| Error::Correlation("No customer on completed session".to_string()))?;

    let company_id = state
        .billing_service
        .find_company_by_customer(&customer_id)
        .await?
        .ok_or_else(|| {
            tracing::error!(event_id = %event.id, customer_id = %customer_id, "no company for billing customer");
            Error::Correlation("No company matches the billing customer".to_string())
        })?;

    match state
        .job_service
        .apply_checkout_completed(&event.id, &event.event_type, job_id, company_id)
        .await?
    {
        PublishOutcome::Published => {
            tracing::info!(job_id = %job_id, event_id = %event.id, "job published");
            Ok(StatusCode::OK)
        }
        PublishOutcome::AlreadyActive => {
            tracing::info!(job_id = %job_id, event_id = %event.id, "duplicate delivery, job already active");
            Ok(StatusCode::OK)
        }
        PublishOutcome::NotFound => Err(Error::NotFound(format!(
            "Job {} referenced by event {} not found",
            job_id, event.id
        ))),
    }
}
