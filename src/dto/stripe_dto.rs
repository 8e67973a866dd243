use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Customer object returned by `POST /v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Checkout Session object returned by `POST /v1/checkout/sessions`.
/// `url` is where the caller gets redirected to complete payment.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Signed event envelope delivered to the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The session embedded in a `checkout.session.completed` event. Only the
/// fields the pipeline needs; `metadata["jobId"]` is the sole link back to a
/// local job post.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSessionObject {
    pub id: Option<String>,
    pub customer: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl StripeSessionObject {
    pub fn job_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("jobId"))
            .map(String::as_str)
    }
}
