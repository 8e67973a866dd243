use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::stripe_dto::{StripeCheckoutSession, StripeCustomer};
use crate::error::{Error, Result};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub customer_id: String,
    pub job_id: Uuid,
    pub product_name: String,
    pub product_description: String,
    /// Amount in the currency's smallest unit (cents).
    pub unit_amount: i64,
    pub success_url: String,
    pub cancel_url: String,
}

/// Outbound payment-provider surface. The job API only ever needs these two
/// calls; everything else (checkout UI, card processing, retries of the
/// confirmation callback) stays on the provider's side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_customer(&self, email: &str, name: &str) -> Result<StripeCustomer>;

    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<StripeCheckoutSession>;
}

#[derive(Clone)]
pub struct StripeService {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl StripeService {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build http client");
        Self {
            client,
            api_key,
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl PaymentGateway for StripeService {
    async fn create_customer(&self, email: &str, name: &str) -> Result<StripeCustomer> {
        let url = format!("{}/v1/customers", self.api_base);
        let params = [("email", email), ("name", name)];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "stripe create customer failed");
            return Err(Error::Internal(format!(
                "Stripe customer creation failed with status {}",
                status
            )));
        }

        Ok(response.json::<StripeCustomer>().await?)
    }

    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<StripeCheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let unit_amount = request.unit_amount.to_string();
        let job_id = request.job_id.to_string();

        // metadata[jobId] is the correlation key the webhook pipeline relies
        // on; a session without it can never be matched back to a job.
        let params = [
            ("mode", "payment"),
            ("customer", request.customer_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][unit_amount]", unit_amount.as_str()),
            (
                "line_items[0][price_data][product_data][name]",
                request.product_name.as_str(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                request.product_description.as_str(),
            ),
            ("metadata[jobId]", job_id.as_str()),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, job_id = %request.job_id, "stripe checkout session failed");
            return Err(Error::Internal(format!(
                "Stripe checkout session creation failed with status {}",
                status
            )));
        }

        Ok(response.json::<StripeCheckoutSession>().await?)
    }
}
