use super::IVenueRepo;
use crate::repos::shared::inmemory_repo::*;
use songcircle_domain::{Venue, ID};

pub struct InMemoryVenueRepo {
    venues: std::sync::Mutex<Vec<Venue>>,
}

impl InMemoryVenueRepo {
    pub fn new() -> Self {
        Self {
            venues: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IVenueRepo for InMemoryVenueRepo {
    async fn insert(&self, venue: &Venue) -> anyhow::Result<()> {
        insert(venue, &self.venues);
        Ok(())
    }

    async fn find(&self, venue_id: &ID) -> Option<Venue> {
        find(venue_id, &self.venues)
    }

    async fn find_many(&self, venue_ids: &[ID]) -> anyhow::Result<Vec<Venue>> {
        Ok(find_by(&self.venues, |v| venue_ids.contains(&v.id)))
    }

    async fn list(&self) -> anyhow::Result<Vec<Venue>> {
        Ok(find_by(&self.venues, |_| true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_by_id_set() {
        let repo = InMemoryVenueRepo::new();
        let mercury = Venue::new("Mercury Cafe");
        let skylark = Venue::new("Skylark Lounge");
        let walnut = Venue::new("Walnut Room");
        for venue in [&mercury, &skylark, &walnut] {
            repo.insert(venue).await.unwrap();
        }

        assert_eq!(repo.find(&mercury.id).await.unwrap().name, "Mercury Cafe");

        let found = repo
            .find_many(&[mercury.id.clone(), walnut.id.clone()])
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Mercury Cafe", "Walnut Room"]);

        assert_eq!(repo.list().await.unwrap().len(), 3);
    }
}
