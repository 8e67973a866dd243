use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::User;
use crate::services::stripe_service::PaymentGateway;

#[derive(Clone)]
pub struct BillingService {
    pool: PgPool,
    gateway: Arc<dyn PaymentGateway>,
}

impl BillingService {
    pub fn new(pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { pool, gateway }
    }

    /// Returns the user's external billing customer id, creating and
    /// persisting one on first use.
    ///
    /// The persist is a single conditional write guarded by
    /// `stripe_customer_id IS NULL`, so two concurrent first payments cannot
    /// both install an id: the loser re-reads and adopts the winner's id.
    pub async fn resolve_customer(&self, user_id: Uuid) -> Result<String> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, stripe_customer_id, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;

        if let Some(existing) = user.stripe_customer_id {
            return Ok(existing);
        }

        let customer = self.gateway.create_customer(&user.email, &user.name).await?;

        let claimed = match sqlx::query_scalar::<_, String>(
            "UPDATE users SET stripe_customer_id = $2 \
             WHERE id = $1 AND stripe_customer_id IS NULL \
             RETURNING stripe_customer_id",
        )
        .bind(user_id)
        .bind(&customer.id)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(claimed) => claimed,
            Err(err) => {
                // The external customer exists but the mapping didn't land.
                // Surface it for reconciliation; the next attempt re-checks
                // before creating another one.
                tracing::error!(
                    user_id = %user_id,
                    stripe_customer_id = %customer.id,
                    error = ?err,
                    "failed to persist billing identity, external customer is orphaned"
                );
                return Err(err.into());
            }
        };

        match claimed {
            Some(id) => Ok(id),
            None => {
                // A concurrent resolver won the claim.
                tracing::warn!(
                    user_id = %user_id,
                    orphaned_customer_id = %customer.id,
                    "billing identity already set, discarding freshly created customer"
                );
                let winner = sqlx::query_scalar::<_, Option<String>>(
                    "SELECT stripe_customer_id FROM users WHERE id = $1",
                )
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
                winner.ok_or_else(|| {
                    Error::Internal("Billing identity claim lost but no winner found".to_string())
                })
            }
        }
    }

    /// Reverse lookup for the webhook pipeline: external customer id to the
    /// company that owns the job posts.
    pub async fn find_company_by_customer(&self, customer_id: &str) -> Result<Option<Uuid>> {
        let company_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT c.id FROM companies c \
             JOIN users u ON u.id = c.user_id \
             WHERE u.stripe_customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company_id)
    }
}
