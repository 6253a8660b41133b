use super::IEventOverrideRepo;
use crate::repos::shared::inmemory_repo::*;
use songcircle_domain::{DateKey, DateWindow, OccurrenceOverride, ID};

pub struct InMemoryEventOverrideRepo {
    overrides: std::sync::Mutex<Vec<OccurrenceOverride>>,
}

impl InMemoryEventOverrideRepo {
    pub fn new() -> Self {
        Self {
            overrides: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventOverrideRepo for InMemoryEventOverrideRepo {
    async fn upsert(&self, o: &OccurrenceOverride) -> anyhow::Result<()> {
        let _ = delete_by(&self.overrides, |existing: &OccurrenceOverride| {
            existing.event_id == o.event_id && existing.date_key == o.date_key
        });
        insert(o, &self.overrides);
        Ok(())
    }

    async fn find(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride> {
        find_by(&self.overrides, |o| {
            o.event_id == *event_id && o.date_key == date_key
        })
        .into_iter()
        .next()
    }

    async fn find_by_events(
        &self,
        event_ids: &[ID],
        window: &DateWindow,
    ) -> anyhow::Result<Vec<OccurrenceOverride>> {
        Ok(find_by(&self.overrides, |o| {
            event_ids.contains(&o.event_id) && window.contains(o.date_key)
        }))
    }

    async fn delete(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride> {
        delete_by(&self.overrides, |o: &OccurrenceOverride| {
            o.event_id == *event_id && o.date_key == date_key
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn upsert_is_last_write_wins_per_event_and_date() {
        let repo = InMemoryEventOverrideRepo::new();
        let event_id = ID::default();
        let date = key("2026-08-24");

        let mut first = OccurrenceOverride::new(event_id.clone(), date);
        first.patch.title = Some("Old title".into());
        repo.upsert(&first).await.unwrap();

        let mut second = OccurrenceOverride::new(event_id.clone(), date);
        second.patch.title = Some("New title".into());
        repo.upsert(&second).await.unwrap();

        let found = repo.find(&event_id, date).await.unwrap();
        assert_eq!(found.patch.title.as_deref(), Some("New title"));

        let window = DateWindow::new(key("2026-08-23"), key("2026-08-29"));
        let all = repo
            .find_by_events(&[event_id.clone()], &window)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn window_scan_excludes_other_events_and_dates() {
        let repo = InMemoryEventOverrideRepo::new();
        let wanted = ID::default();
        let other = ID::default();

        repo.upsert(&OccurrenceOverride::new(wanted.clone(), key("2026-08-24")))
            .await
            .unwrap();
        repo.upsert(&OccurrenceOverride::new(wanted.clone(), key("2026-09-07")))
            .await
            .unwrap();
        repo.upsert(&OccurrenceOverride::new(other, key("2026-08-25")))
            .await
            .unwrap();

        let window = DateWindow::new(key("2026-08-23"), key("2026-08-29"));
        let found = repo.find_by_events(&[wanted], &window).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date_key, key("2026-08-24"));
    }
}
