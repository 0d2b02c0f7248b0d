use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::context::ApiContext;

// Routes
pub mod estate;
mod health;

// Misc
pub mod auth;
pub(crate) mod context;
mod swagger;

pub async fn setup_and_serve(state: ApiContext) -> anyhow::Result<()> {
    let cors = CorsLayer::permissive();

    let port = state.config.port;
    let env = state.config.environment;
    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        // health stays outside the logging middleware
        .merge(health::router())
        .layer(cors)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", swagger::ApiDoc::openapi()));

    let bind_address = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind to address {}", bind_address))?;

    tracing::info!(
        "estate service is up and running with environment {:?} on port {}",
        &env,
        &port
    );

    axum::serve(listener, app.into_make_service())
        .await
        .context("error running axum server")
}

fn api_router(state: ApiContext) -> Router {
    Router::new()
        .nest("/estate", estate::router(&state))
        .with_state(state)
}
