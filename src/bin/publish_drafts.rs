//! Out-of-band maintenance: bulk-publish every DRAFT job post.
//!
//! The normal path to ACTIVE is a confirmed payment; this exists for
//! operators to force-publish drafts (seeding, comped listings, manual
//! recovery).

use jobboard_backend::{config::init_config, database::pool::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;

    let pool = create_pool().await?;

    let result = sqlx::query(
        "UPDATE job_posts \
         SET status = 'ACTIVE', published_at = NOW(), updated_at = NOW() \
         WHERE status = 'DRAFT'",
    )
    .execute(&pool)
    .await?;

    println!("Published {} draft job(s).", result.rows_affected());
    Ok(())
}
