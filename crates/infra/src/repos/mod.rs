mod digest_subscriber;
mod event;
mod event_override;
mod shared;
mod venue;

pub use digest_subscriber::{
    IDigestSubscriberRepo, InMemoryDigestSubscriberRepo, PostgresDigestSubscriberRepo,
};
pub use event::{IEventRepo, InMemoryEventRepo, PostgresEventRepo};
pub use event_override::{IEventOverrideRepo, InMemoryEventOverrideRepo, PostgresEventOverrideRepo};
pub use venue::{IVenueRepo, InMemoryVenueRepo, PostgresVenueRepo};

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub event_overrides: Arc<dyn IEventOverrideRepo>,
    pub venues: Arc<dyn IVenueRepo>,
    pub digest_subscribers: Arc<dyn IDigestSubscriberRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ...");
        sqlx::query("SELECT 1").execute(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            event_overrides: Arc::new(PostgresEventOverrideRepo::new(pool.clone())),
            venues: Arc::new(PostgresVenueRepo::new(pool.clone())),
            digest_subscribers: Arc::new(PostgresDigestSubscriberRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            event_overrides: Arc::new(InMemoryEventOverrideRepo::new()),
            venues: Arc::new(InMemoryVenueRepo::new()),
            digest_subscribers: Arc::new(InMemoryDigestSubscriberRepo::new()),
        }
    }
}
