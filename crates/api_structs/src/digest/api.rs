use crate::dtos::{DigestDTO, DigestDeliveryDTO};
use serde::{Deserialize, Serialize};
use songcircle_domain::DateKey;

pub mod get_weekly_digest {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub date: Option<DateKey>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub week_start: DateKey,
        pub week_end: DateKey,
        pub digest: DigestDTO,
    }
}

pub mod deliver_digests {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub week_start: DateKey,
        pub week_end: DateKey,
        pub deliveries: Vec<DigestDeliveryDTO>,
        /// Recipients skipped because their personalized digest was empty.
        pub skipped: usize,
        pub posted_to_webhook: bool,
    }
}
