use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Display attributes of a listed venue. Coordinates are optional; venues
/// without them never match a radius search but still match exact
/// zip/city lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: ID,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub map_url: Option<String>,
}

impl Venue {
    pub fn new(name: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            address: None,
            city: None,
            state: None,
            zip: None,
            latitude: None,
            longitude: None,
            map_url: None,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

impl Entity for Venue {
    fn id(&self) -> &ID {
        &self.id
    }
}
