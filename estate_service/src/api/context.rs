use std::sync::Arc;

use axum::extract::FromRef;
use estate_search::domain::services::{EngagementServiceImpl, SearchEngineImpl};
use estate_search::outbound::postgres::{PgEngagementStore, PgListingStore, PgUserDirectory};
use push_notify_client::PushNotifyClient;
use sqlx::PgPool;

use crate::api::auth::JwtDecoder;
use crate::config::Config;

/// The concrete engine wired against postgres.
pub(crate) type Engine = SearchEngineImpl<PgListingStore, PgUserDirectory>;

/// The concrete engagement service wired against postgres.
pub(crate) type Engagement = EngagementServiceImpl<PgEngagementStore>;

#[derive(Clone, FromRef)]
pub(crate) struct ApiContext {
    pub db: PgPool,
    pub engine: Arc<Engine>,
    pub engagement: Arc<Engagement>,
    pub push_client: Arc<PushNotifyClient>,
    pub jwt: JwtDecoder,
    pub config: Arc<Config>,
}
