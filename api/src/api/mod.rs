use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;

use crate::global::Global;

pub mod auth;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub fn router(global: &Arc<Global>) -> Router {
    Router::new()
        .route("/", get(routes::home::homepage))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/api/generate-application",
            post(routes::generate::generate_application),
        )
        .route("/api/opportunities", get(routes::opportunities::list_opportunities))
        .route(
            "/api/difficulty-stats",
            get(routes::opportunities::difficulty_stats),
        )
        .route("/api/track-award", post(routes::awards::track_award))
        .route("/api/metrics", get(routes::metrics::metrics))
        .route("/api/health", get(routes::health::health))
        // The auth middleware resolves the session token, and if it's valid,
        // adds the auth data to the request extensions. This way we can
        // access the user in the handlers; it does not fail the request if
        // the token is invalid or not present.
        .layer(axum::middleware::from_fn_with_state(
            global.clone(),
            middleware::auth_middleware,
        ))
        .with_state(global.clone())
}

pub async fn run(global: Arc<Global>) -> anyhow::Result<()> {
    let bind_address = global.config().api.bind_address;

    tracing::info!("listening on {bind_address}");

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .context("failed to bind api listener")?;

    axum::serve(listener, router(&global))
        .await
        .context("api server")?;

    Ok(())
}
