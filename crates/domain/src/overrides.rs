use crate::date::DateKey;
use crate::event::{Event, EventType};
use crate::occurrence::Occurrence;
use crate::shared::entity::{Entity, ID};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    #[default]
    Active,
    Cancelled,
}

impl OverrideStatus {
    pub fn parse(token: &str) -> Self {
        match token {
            "cancelled" => Self::Cancelled,
            _ => Self::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Field-level patch superseding the base event's values for one date.
/// One explicit optional slot per overridable attribute; `None` means
/// "not overridden", never "cleared".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OverridePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub cover_image_url: Option<String>,
    pub venue_id: Option<ID>,
    pub custom_location_name: Option<String>,
    pub custom_location_address: Option<String>,
    pub host_notes: Option<String>,
}

impl OverridePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-date exception record keyed by `(event_id, date_key)`. Overrides
/// never create occurrences; they only cancel or patch occurrences the
/// expander already produced for that date.
#[derive(Debug, Clone)]
pub struct OccurrenceOverride {
    pub id: ID,
    pub event_id: ID,
    pub date_key: DateKey,
    pub status: OverrideStatus,
    /// Deprecated single-column override time, kept for rows written
    /// before the structured patch existed. Loses to `patch.start_time`.
    pub legacy_start_time: Option<NaiveTime>,
    pub patch: OverridePatch,
    pub created: i64,
    pub updated: i64,
}

impl Entity for OccurrenceOverride {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl OccurrenceOverride {
    pub fn new(event_id: ID, date_key: DateKey) -> Self {
        Self {
            id: Default::default(),
            event_id,
            date_key,
            status: OverrideStatus::Active,
            legacy_start_time: None,
            patch: Default::default(),
            created: 0,
            updated: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OverrideStatus::Cancelled
    }
}

/// First present value out of an ordered list of optional sources. Every
/// per-field precedence chain (patch -> legacy column -> base field) goes
/// through here.
pub fn first_present<T>(sources: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    sources.into_iter().flatten().next()
}

/// Where an effective occurrence takes place. A patched venue reference
/// switches linkage to that venue and drops any custom location; patched
/// custom-location fields do the reverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum EffectiveLocation {
    Venue {
        venue_id: ID,
    },
    Custom {
        name: Option<String>,
        address: Option<String>,
    },
    Unspecified,
}

/// The displayed fields for one specific occurrence after merging the
/// base event with an applicable override. A cancelled occurrence still
/// resolves its fields so the UI can show "Cancelled: <time/place>", but
/// consumers must treat it as non-actionable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveOccurrence {
    pub event_id: ID,
    pub date_key: DateKey,
    pub is_cancelled: bool,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub cover_image_url: Option<String>,
    pub host_notes: Option<String>,
    pub location: EffectiveLocation,
    pub is_free: Option<bool>,
    pub event_type: EventType,
}

impl EffectiveOccurrence {
    pub fn venue_id(&self) -> Option<&ID> {
        match &self.location {
            EffectiveLocation::Venue { venue_id } => Some(venue_id),
            _ => None,
        }
    }
}

fn base_location(event: &Event) -> EffectiveLocation {
    if let Some(venue_id) = &event.venue_id {
        return EffectiveLocation::Venue {
            venue_id: venue_id.clone(),
        };
    }
    if event.custom_location_name.is_some() || event.custom_location_address.is_some() {
        return EffectiveLocation::Custom {
            name: event.custom_location_name.clone(),
            address: event.custom_location_address.clone(),
        };
    }
    EffectiveLocation::Unspecified
}

/// Read-time projection of one occurrence's displayed fields. No
/// persistence side effects.
pub fn apply_override(
    event: &Event,
    occurrence: &Occurrence,
    overridden: Option<&OccurrenceOverride>,
) -> EffectiveOccurrence {
    let overridden = match overridden {
        Some(o) => o,
        None => {
            return EffectiveOccurrence {
                event_id: event.id.clone(),
                date_key: occurrence.date_key,
                is_cancelled: false,
                title: event.title.clone(),
                description: event.description.clone(),
                start_time: event.start_time,
                end_time: event.end_time,
                cover_image_url: event.cover_image_url.clone(),
                host_notes: event.host_notes.clone(),
                location: base_location(event),
                is_free: event.is_free,
                event_type: event.event_type,
            }
        }
    };

    let patch = &overridden.patch;
    let location = if let Some(venue_id) = &patch.venue_id {
        // A rescheduled venue must be resolved independently by the
        // consumer; linking it here clears the custom-location display.
        EffectiveLocation::Venue {
            venue_id: venue_id.clone(),
        }
    } else if patch.custom_location_name.is_some() || patch.custom_location_address.is_some() {
        EffectiveLocation::Custom {
            name: first_present([
                patch.custom_location_name.clone(),
                event.custom_location_name.clone(),
            ]),
            address: first_present([
                patch.custom_location_address.clone(),
                event.custom_location_address.clone(),
            ]),
        }
    } else {
        base_location(event)
    };

    EffectiveOccurrence {
        event_id: event.id.clone(),
        date_key: occurrence.date_key,
        is_cancelled: overridden.is_cancelled(),
        title: first_present([patch.title.clone(), Some(event.title.clone())])
            .unwrap_or_default(),
        description: first_present([patch.description.clone(), event.description.clone()]),
        start_time: first_present([
            patch.start_time,
            overridden.legacy_start_time,
            event.start_time,
        ]),
        end_time: first_present([patch.end_time, event.end_time]),
        cover_image_url: first_present([
            patch.cover_image_url.clone(),
            event.cover_image_url.clone(),
        ]),
        host_notes: first_present([patch.host_notes.clone(), event.host_notes.clone()]),
        location,
        is_free: event.is_free,
        event_type: event.event_type,
    }
}
