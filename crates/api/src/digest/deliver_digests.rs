use crate::error::SongcircleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use songcircle_api_structs::deliver_digests::APIResponse;
use songcircle_api_structs::dtos::{DigestDTO, DigestDeliveryDTO};
use songcircle_domain::{
    build_digest, filter_for_recipient, week_window, DateKey, DateWindow, Digest, DigestSubscriber,
    Entity, Venue, ID,
};
use songcircle_infra::SongcircleContext;
use std::collections::HashMap;
use tracing::{error, warn};

fn handle_error(e: UseCaseErrors) -> SongcircleError {
    match e {
        UseCaseErrors::StorageError => SongcircleError::InternalError,
    }
}

pub async fn deliver_digests_controller(
    ctx: web::Data<SongcircleContext>,
) -> Result<HttpResponse, SongcircleError> {
    run_digest_batch(&ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(handle_error)
}

/// Builds this week's digest, personalizes it per confirmed subscriber and
/// posts the batch to the delivery webhook when one is configured. Shared
/// by the admin endpoint and the Sunday job.
pub async fn run_digest_batch(ctx: &SongcircleContext) -> Result<APIResponse, UseCaseErrors> {
    let usecase = DeliverDigestsUseCase {
        today: ctx.sys.today(),
    };
    let res = execute(usecase, ctx).await?;

    let venue_lookup: HashMap<ID, Venue> = res
        .venues
        .into_iter()
        .map(|venue| (venue.id().clone(), venue))
        .collect();
    let deliveries: Vec<DigestDeliveryDTO> = res
        .deliveries
        .into_iter()
        .map(|delivery| DigestDeliveryDTO {
            email: delivery.subscriber.email,
            digest: DigestDTO::new(delivery.digest, &venue_lookup),
            filtered: delivery.filtered,
        })
        .collect();

    let mut response = APIResponse {
        week_start: res.week.start(),
        week_end: res.week.end(),
        deliveries,
        skipped: res.skipped,
        posted_to_webhook: false,
    };

    if let Some(webhook) = &ctx.config.digest_delivery_webhook {
        response.posted_to_webhook = post_batch(webhook, &response).await;
    }

    Ok(response)
}

async fn post_batch(webhook: &str, batch: &APIResponse) -> bool {
    let client = reqwest::Client::new();
    match client.post(webhook).json(batch).send().await {
        Ok(res) if res.status().is_success() => true,
        Ok(res) => {
            error!(
                "Digest delivery webhook returned an error status: {}",
                res.status()
            );
            false
        }
        Err(e) => {
            error!("Error posting digest batch to delivery webhook: {:?}", e);
            false
        }
    }
}

#[derive(Debug)]
pub struct DeliverDigestsUseCase {
    pub today: DateKey,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[derive(Debug)]
pub struct DigestDelivery {
    pub subscriber: DigestSubscriber,
    pub digest: Digest,
    /// False when no saved filter was applied, either because the
    /// subscriber has none or because theirs was unusable.
    pub filtered: bool,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub week: DateWindow,
    pub deliveries: Vec<DigestDelivery>,
    pub skipped: usize,
    pub venues: Vec<Venue>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDigestsUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "DeliverDigests";

    async fn execute(&mut self, ctx: &SongcircleContext) -> Result<Self::Response, Self::Errors> {
        let week = week_window(self.today);

        let events = ctx
            .repos
            .events
            .list_published()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        let event_ids: Vec<ID> = events.iter().map(|e| e.id.clone()).collect();
        let overrides = ctx
            .repos
            .event_overrides
            .find_by_events(&event_ids, &week)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        let venues = ctx
            .repos
            .venues
            .list()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        let subscribers = ctx
            .repos
            .digest_subscribers
            .list_confirmed()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let digest = build_digest(&events, &week, &overrides);

        let mut deliveries = Vec::new();
        let mut skipped = 0;
        for subscriber in subscribers {
            let (personalized, filtered) = match &subscriber.filter {
                Some(filter) => match filter_for_recipient(
                    &digest,
                    filter,
                    &venues,
                    ctx.config.default_radius_miles,
                ) {
                    Ok(personalized) => (personalized, true),
                    // An unusable filter never aborts the batch; the
                    // recipient gets the full digest instead.
                    Err(e) => {
                        warn!(
                            "Unusable saved filter for {}: {:?}, sending unfiltered digest",
                            subscriber.email, e
                        );
                        (digest.clone(), false)
                    }
                },
                None => (digest.clone(), false),
            };

            if personalized.is_empty() {
                skipped += 1;
                continue;
            }
            deliveries.push(DigestDelivery {
                subscriber,
                digest: personalized,
                filtered,
            });
        }

        Ok(UseCaseResponse {
            week,
            deliveries,
            skipped,
            venues,
        })
    }
}
