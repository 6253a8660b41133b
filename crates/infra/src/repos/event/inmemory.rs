use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use songcircle_domain::{Event, EventStatus, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<Event>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        save(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        find(event_id, &self.events)
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        Ok(find_by(&self.events, |event| event_ids.contains(&event.id)))
    }

    async fn list_published(&self) -> anyhow::Result<Vec<Event>> {
        Ok(find_by(&self.events, |event| {
            event.published && event.status == EventStatus::Active
        }))
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        delete(event_id, &self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn published_event(title: &str) -> Event {
        Event {
            title: title.into(),
            published: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_replaces_the_stored_event() {
        let repo = InMemoryEventRepo::new();
        let mut event = published_event("Open mic");
        repo.insert(&event).await.unwrap();

        event.title = "Open mic at the Mercury".into();
        repo.save(&event).await.unwrap();

        let found = repo.find(&event.id).await.unwrap();
        assert_eq!(found.title, "Open mic at the Mercury");
    }

    #[tokio::test]
    async fn find_many_returns_only_the_requested_ids() {
        let repo = InMemoryEventRepo::new();
        let wanted = published_event("Showcase");
        let other = published_event("Workshop");
        repo.insert(&wanted).await.unwrap();
        repo.insert(&other).await.unwrap();

        let found = repo.find_many(&[wanted.id.clone()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, wanted.id);
    }

    #[tokio::test]
    async fn delete_removes_the_event_from_listings() {
        let repo = InMemoryEventRepo::new();
        let event = published_event("Songwriter round");
        repo.insert(&event).await.unwrap();

        let deleted = repo.delete(&event.id).await.unwrap();
        assert_eq!(deleted.id, event.id);
        assert!(repo.find(&event.id).await.is_none());
        assert!(repo.list_published().await.unwrap().is_empty());
    }
}
