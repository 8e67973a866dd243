use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use jobboard_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let job_api = Router::new()
        .route("/api/jobs", post(routes::job::create_job))
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    let public_api = Router::new()
        .route("/api/public/jobs", get(routes::job::list_public_jobs))
        .route("/api/public/jobs/:id", get(routes::job::get_public_job))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    // Not rate limited: a shed delivery would only come back as another
    // provider retry anyway.
    let webhook_api = Router::new().route(
        "/api/webhook/stripe",
        post(routes::stripe_webhook::handle_stripe_webhook),
    );

    let app = base_routes
        .merge(job_api)
        .merge(public_api)
        .merge(webhook_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
