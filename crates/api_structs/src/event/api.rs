use crate::dtos::{EffectiveOccurrenceDTO, EventDTO, OccurrenceDTO, ScheduleInterpretationDTO};
use serde::{Deserialize, Serialize};
use songcircle_domain::{DateKey, ID};

pub mod get_event_occurrences {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub start: Option<DateKey>,
        pub end: Option<DateKey>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: EventDTO,
        pub schedule: ScheduleInterpretationDTO,
        pub occurrences: Vec<OccurrenceDTO>,
    }
}

pub mod resolve_series_date {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    // The date stays a raw string here: a malformed value falls back to
    // the next upcoming occurrence instead of failing deserialization.
    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub date: Option<String>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event_id: ID,
        pub requested_date: Option<String>,
        pub resolved_date: Option<DateKey>,
        pub redirected: bool,
        pub advisory: Option<String>,
    }
}

pub mod get_effective_occurrence {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
        pub date: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub occurrence: EffectiveOccurrenceDTO,
    }
}
