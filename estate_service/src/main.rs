use std::sync::Arc;

use anyhow::Context;
use estate_entrypoint::ServiceEntrypoint;
use estate_entrypoint::env::Environment;
use estate_search::domain::services::{EngagementServiceImpl, SearchEngineImpl};
use estate_search::outbound::postgres::{PgEngagementStore, PgListingStore, PgUserDirectory};
use push_notify_client::PushNotifyClient;
use sqlx::postgres::PgPoolOptions;

use crate::api::context::ApiContext;
use crate::config::Config;

mod api;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ServiceEntrypoint::default().init();

    let config = Config::from_env().context("expected to be able to generate config")?;
    tracing::trace!("initialized config");

    let (min_connections, max_connections): (u32, u32) = match config.environment {
        Environment::Production => (5, 30),
        Environment::Develop => (3, 20),
        Environment::Local => (3, 10),
    };

    let db = PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to estate db")?;

    estate_db_client::MIGRATIONS
        .run(&db)
        .await
        .context("failed to run database migrations")?;

    let engine = SearchEngineImpl::new(
        PgListingStore::new(db.clone()),
        PgUserDirectory::new(db.clone()),
    );

    let engagement = EngagementServiceImpl::new(PgEngagementStore::new(db.clone()));

    let push_client = PushNotifyClient::new(config.push_service_url.clone());

    let jwt = api::auth::JwtDecoder::new(&config.jwt_secret);

    api::setup_and_serve(ApiContext {
        db,
        engine: Arc::new(engine),
        engagement: Arc::new(engagement),
        push_client: Arc::new(push_client),
        jwt,
        config: Arc::new(config),
    })
    .await
}
