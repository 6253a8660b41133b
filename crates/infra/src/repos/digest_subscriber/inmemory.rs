use super::IDigestSubscriberRepo;
use crate::repos::shared::inmemory_repo::*;
use songcircle_domain::{DigestSubscriber, ID};

pub struct InMemoryDigestSubscriberRepo {
    subscribers: std::sync::Mutex<Vec<DigestSubscriber>>,
}

impl InMemoryDigestSubscriberRepo {
    pub fn new() -> Self {
        Self {
            subscribers: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDigestSubscriberRepo for InMemoryDigestSubscriberRepo {
    async fn insert(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()> {
        insert(subscriber, &self.subscribers);
        Ok(())
    }

    async fn save(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()> {
        save(subscriber, &self.subscribers);
        Ok(())
    }

    async fn find(&self, subscriber_id: &ID) -> Option<DigestSubscriber> {
        find(subscriber_id, &self.subscribers)
    }

    async fn list_confirmed(&self) -> anyhow::Result<Vec<DigestSubscriber>> {
        Ok(find_by(&self.subscribers, |s| s.confirmed))
    }

    async fn delete(&self, subscriber_id: &ID) -> Option<DigestSubscriber> {
        delete(subscriber_id, &self.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirmation_flow_and_removal() {
        let repo = InMemoryDigestSubscriberRepo::new();
        let mut subscriber = DigestSubscriber::new("host@example.com");
        repo.insert(&subscriber).await.unwrap();
        assert!(repo.list_confirmed().await.unwrap().is_empty());

        subscriber.confirmed = true;
        repo.save(&subscriber).await.unwrap();
        assert_eq!(repo.list_confirmed().await.unwrap().len(), 1);
        assert!(repo.find(&subscriber.id).await.unwrap().confirmed);

        repo.delete(&subscriber.id).await.unwrap();
        assert!(repo.find(&subscriber.id).await.is_none());
    }
}
