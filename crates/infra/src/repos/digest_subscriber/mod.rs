mod inmemory;
mod postgres;

pub use inmemory::InMemoryDigestSubscriberRepo;
pub use postgres::PostgresDigestSubscriberRepo;

use songcircle_domain::{DigestSubscriber, ID};

#[async_trait::async_trait]
pub trait IDigestSubscriberRepo: Send + Sync {
    async fn insert(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()>;
    async fn save(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()>;
    async fn find(&self, subscriber_id: &ID) -> Option<DigestSubscriber>;
    async fn list_confirmed(&self) -> anyhow::Result<Vec<DigestSubscriber>>;
    async fn delete(&self, subscriber_id: &ID) -> Option<DigestSubscriber>;
}
