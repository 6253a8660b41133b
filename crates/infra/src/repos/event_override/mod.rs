mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventOverrideRepo;
pub use postgres::PostgresEventOverrideRepo;

use songcircle_domain::{DateKey, DateWindow, OccurrenceOverride, ID};

#[async_trait::async_trait]
pub trait IEventOverrideRepo: Send + Sync {
    /// Last write wins per `(event_id, date_key)`; there is no optimistic
    /// concurrency on override edits.
    async fn upsert(&self, o: &OccurrenceOverride) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride>;
    async fn find_by_events(
        &self,
        event_ids: &[ID],
        window: &DateWindow,
    ) -> anyhow::Result<Vec<OccurrenceOverride>>;
    async fn delete(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride>;
}
