use crate::digest::SavedFilter;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A digest recipient. Only confirmed subscribers are considered by the
/// weekly batch; an unset filter means "send the full digest".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestSubscriber {
    pub id: ID,
    pub email: String,
    pub confirmed: bool,
    pub filter: Option<SavedFilter>,
    pub created: i64,
    pub updated: i64,
}

impl DigestSubscriber {
    pub fn new(email: &str) -> Self {
        Self {
            id: Default::default(),
            email: email.to_string(),
            confirmed: false,
            filter: None,
            created: 0,
            updated: 0,
        }
    }
}

impl Entity for DigestSubscriber {
    fn id(&self) -> &ID {
        &self.id
    }
}
