pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{
    billing_service::BillingService,
    job_service::JobService,
    stripe_service::{PaymentGateway, StripeService},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub gateway: Arc<dyn PaymentGateway>,
    pub billing_service: BillingService,
    pub job_service: JobService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(StripeService::new(config.stripe_secret_key.clone()));
        Self::with_gateway(pool, gateway)
    }

    /// Wires the services around an explicit gateway. Tests use this to
    /// substitute the payment provider.
    pub fn with_gateway(pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        let billing_service = BillingService::new(pool.clone(), gateway.clone());
        let job_service = JobService::new(pool.clone());
        Self {
            pool,
            gateway,
            billing_service,
            job_service,
        }
    }
}
