mod config;
mod repos;
mod system;

pub use config::Config;
pub use repos::Repos;
pub use repos::{IDigestSubscriberRepo, IEventOverrideRepo, IEventRepo, IVenueRepo};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{FixedSys, ISys, RealSys};

#[derive(Clone)]
pub struct SongcircleContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl SongcircleContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let sys = Arc::new(RealSys {
            timezone: config.reference_timezone,
        });
        Self { repos, config, sys }
    }

    pub fn create_inmemory() -> Self {
        let config = Config::new();
        let sys = Arc::new(RealSys {
            timezone: config.reference_timezone,
        });
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> SongcircleContext {
    SongcircleContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
