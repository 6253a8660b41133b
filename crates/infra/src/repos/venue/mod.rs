mod inmemory;
mod postgres;

pub use inmemory::InMemoryVenueRepo;
pub use postgres::PostgresVenueRepo;

use songcircle_domain::{Venue, ID};

#[async_trait::async_trait]
pub trait IVenueRepo: Send + Sync {
    async fn insert(&self, venue: &Venue) -> anyhow::Result<()>;
    async fn find(&self, venue_id: &ID) -> Option<Venue>;
    async fn find_many(&self, venue_ids: &[ID]) -> anyhow::Result<Vec<Venue>>;
    async fn list(&self) -> anyhow::Result<Vec<Venue>>;
}
