#![deny(missing_docs)]
//! Standardized binary initialization: one call sets up env loading, the
//! panic hook, and the tracing subscriber appropriate to the environment.

use tracing_subscriber::EnvFilter;

pub mod env;

use env::Environment;

/// unit struct which defines the behaviour for instantiation
#[derive(Debug)]
pub struct ServiceEntrypoint {
    env: Environment,
}

impl Default for ServiceEntrypoint {
    fn default() -> Self {
        ServiceEntrypoint {
            env: Environment::new_or_prod(),
        }
    }
}

/// sentinel struct which guarantees that [ServiceEntrypoint::init] ran
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl ServiceEntrypoint {
    /// create a new instance of [Self] from an input [Environment]
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// consume self, initialize this binary, and return proof of it
    pub fn init(self) -> InitializedEntrypoint {
        dotenv::dotenv().ok();
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        match self.env {
            Environment::Local => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            Environment::Production | Environment::Develop => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        InitializedEntrypoint(())
    }
}
