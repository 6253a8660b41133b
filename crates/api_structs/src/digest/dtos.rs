use crate::dtos::EffectiveOccurrenceDTO;
use serde::{Deserialize, Serialize};
use songcircle_domain::{DateKey, Digest, Venue, ID};
use std::collections::HashMap;

/// One digest day, occurrences already sorted by start time.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DigestDayDTO {
    pub date: DateKey,
    pub occurrences: Vec<EffectiveOccurrenceDTO>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DigestDTO {
    pub days: Vec<DigestDayDTO>,
    pub total_count: usize,
    pub venue_count: usize,
}

impl DigestDTO {
    pub fn new(digest: Digest, venue_lookup: &HashMap<ID, Venue>) -> Self {
        let days = digest
            .by_date
            .into_iter()
            .map(|(date, occurrences)| DigestDayDTO {
                date,
                occurrences: occurrences
                    .into_iter()
                    .map(|occurrence| {
                        let venue = occurrence
                            .venue_id()
                            .and_then(|id| venue_lookup.get(id))
                            .cloned();
                        EffectiveOccurrenceDTO::new(occurrence, venue)
                    })
                    .collect(),
            })
            .collect();
        Self {
            days,
            total_count: digest.total_count,
            venue_count: digest.venue_count,
        }
    }
}

/// Outcome of personalizing the digest for one recipient.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DigestDeliveryDTO {
    pub email: String,
    pub digest: DigestDTO,
    /// False when the saved filter was unusable and the recipient got the
    /// unfiltered digest.
    pub filtered: bool,
}
