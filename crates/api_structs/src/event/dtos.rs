use serde::{Deserialize, Serialize};
use songcircle_domain::{
    DateKey, EffectiveLocation, EffectiveOccurrence, Event, EventStatus, EventType, Occurrence,
    ScheduleInterpretation, Venue, ID,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<DateKey>,
    pub day_of_week: Option<String>,
    pub recurrence_rule: Option<String>,
    pub custom_dates: Option<Vec<DateKey>>,
    pub max_occurrences: Option<u32>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub cover_image_url: Option<String>,
    pub venue_id: Option<ID>,
    pub custom_location_name: Option<String>,
    pub custom_location_address: Option<String>,
    pub host_notes: Option<String>,
    pub is_free: Option<bool>,
    pub event_type: EventType,
    pub published: bool,
    pub status: EventStatus,
    pub created: i64,
    pub updated: i64,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            day_of_week: event.day_of_week,
            recurrence_rule: event.recurrence_rule,
            custom_dates: event.custom_dates,
            max_occurrences: event.max_occurrences,
            start_time: event.start_time,
            end_time: event.end_time,
            cover_image_url: event.cover_image_url,
            venue_id: event.venue_id,
            custom_location_name: event.custom_location_name,
            custom_location_address: event.custom_location_address,
            host_notes: event.host_notes,
            is_free: event.is_free,
            event_type: event.event_type,
            published: event.published,
            status: event.status,
            created: event.created,
            updated: event.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterpretationDTO {
    pub is_recurring: bool,
    pub is_confident: bool,
    pub cadence: Option<String>,
}

impl ScheduleInterpretationDTO {
    pub fn new(interpretation: ScheduleInterpretation) -> Self {
        Self {
            is_recurring: interpretation.is_recurring,
            is_confident: interpretation.is_confident,
            cadence: interpretation.cadence,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDTO {
    pub date: DateKey,
    pub is_confident: bool,
}

impl OccurrenceDTO {
    pub fn new(occurrence: Occurrence) -> Self {
        Self {
            date: occurrence.date_key,
            is_confident: occurrence.is_confident,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VenueDTO {
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

impl VenueDTO {
    pub fn new(venue: Venue) -> Self {
        Self {
            id: venue.id.clone(),
            name: venue.name,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            zip: venue.zip,
            latitude: venue.latitude,
            longitude: venue.longitude,
            map_url: venue.map_url,
        }
    }
}

/// Merged occurrence as served to consumers. The venue is resolved to a
/// full DTO when the effective location points at one.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveOccurrenceDTO {
    pub event_id: ID,
    pub date: DateKey,
    pub is_cancelled: bool,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub cover_image_url: Option<String>,
    pub host_notes: Option<String>,
    pub location: EffectiveLocation,
    pub venue: Option<VenueDTO>,
    pub is_free: Option<bool>,
    pub event_type: EventType,
}

impl EffectiveOccurrenceDTO {
    pub fn new(occurrence: EffectiveOccurrence, venue: Option<Venue>) -> Self {
        Self {
            event_id: occurrence.event_id.clone(),
            date: occurrence.date_key,
            is_cancelled: occurrence.is_cancelled,
            title: occurrence.title,
            description: occurrence.description,
            start_time: occurrence.start_time,
            end_time: occurrence.end_time,
            cover_image_url: occurrence.cover_image_url,
            host_notes: occurrence.host_notes,
            location: occurrence.location,
            venue: venue.map(VenueDTO::new),
            is_free: occurrence.is_free,
            event_type: occurrence.event_type,
        }
    }
}
