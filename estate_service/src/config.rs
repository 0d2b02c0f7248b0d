use anyhow::Context;
pub use estate_entrypoint::env::Environment;

/// Configuration parameters for the application.
#[derive(Debug)]
pub struct Config {
    /// The connection URL for the estate Postgres database
    pub database_url: String,
    /// The port to listen for HTTP requests on.
    pub port: usize,
    /// The environment we are in
    pub environment: Environment,
    /// Secret for validating HS256 session tokens from the identity provider
    pub jwt_secret: String,
    /// Push delivery endpoint (Expo-compatible)
    pub push_service_url: String,
}

const DEFAULT_PUSH_URL: &str = "https://exp.host/api/v2/push/send";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be provided")?;
        let port: usize = std::env::var("PORT")
            .unwrap_or("8080".to_string())
            .parse::<usize>()
            .context("PORT must be a number")?;
        let environment = Environment::new_or_prod();
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be provided")?;
        let push_service_url =
            std::env::var("PUSH_SERVICE_URL").unwrap_or(DEFAULT_PUSH_URL.to_string());

        Ok(Config {
            database_url,
            port,
            environment,
            jwt_secret,
            push_service_url,
        })
    }
}
