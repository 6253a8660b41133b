use crate::error::SongcircleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use songcircle_api_structs::dtos::DigestDTO;
use songcircle_api_structs::get_weekly_digest::*;
use songcircle_domain::{build_digest, week_window, DateKey, DateWindow, Digest, Entity, Venue, ID};
use songcircle_infra::SongcircleContext;
use std::collections::HashMap;

fn handle_error(e: UseCaseErrors) -> SongcircleError {
    match e {
        UseCaseErrors::StorageError => SongcircleError::InternalError,
    }
}

pub async fn get_weekly_digest_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SongcircleContext>,
) -> Result<HttpResponse, SongcircleError> {
    let usecase = GetWeeklyDigestUseCase {
        date: query_params.date,
        today: ctx.sys.today(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            let venue_lookup: HashMap<ID, Venue> = res
                .venues
                .into_iter()
                .map(|venue| (venue.id().clone(), venue))
                .collect();
            HttpResponse::Ok().json(APIResponse {
                week_start: res.week.start(),
                week_end: res.week.end(),
                digest: DigestDTO::new(res.digest, &venue_lookup),
            })
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetWeeklyDigestUseCase {
    /// Any date inside the wanted week; the window snaps to the enclosing
    /// Sunday through Saturday.
    pub date: Option<DateKey>,
    pub today: DateKey,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub week: DateWindow,
    pub digest: Digest,
    pub venues: Vec<Venue>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetWeeklyDigestUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetWeeklyDigest";

    async fn execute(&mut self, ctx: &SongcircleContext) -> Result<Self::Response, Self::Errors> {
        let week = week_window(self.date.unwrap_or(self.today));

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

        let digest = build_digest(&events, &week, &overrides);

        Ok(UseCaseResponse {
            week,
            digest,
            venues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songcircle_domain::{Event, OccurrenceOverride, OverrideStatus};
    use songcircle_infra::FixedSys;
    use std::sync::Arc;

    fn test_ctx(today: &str) -> SongcircleContext {
        let mut ctx = SongcircleContext::create_inmemory();
        ctx.sys = Arc::new(FixedSys(today.parse().unwrap()));
        ctx
    }

    #[actix_web::test]
    async fn week_snaps_to_sunday_through_saturday() {
        let ctx = test_ctx("2026-08-26");
        let usecase = GetWeeklyDigestUseCase {
            date: None,
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.week.start(), "2026-08-23".parse().unwrap());
        assert_eq!(res.week.end(), "2026-08-29".parse().unwrap());
    }

    #[actix_web::test]
    async fn unpublished_and_cancelled_are_left_out() {
        let ctx = test_ctx("2026-08-23");

        let published = Event {
            title: "Open mic".into(),
            day_of_week: Some("Monday".into()),
            recurrence_rule: Some("weekly".into()),
            published: true,
            ..Default::default()
        };
        let draft = Event {
            title: "Draft workshop".into(),
            day_of_week: Some("Monday".into()),
            recurrence_rule: Some("weekly".into()),
            published: false,
            ..Default::default()
        };
        ctx.repos.events.insert(&published).await.unwrap();
        ctx.repos.events.insert(&draft).await.unwrap();

        let cancelled_date: DateKey = "2026-08-24".parse().unwrap();
        let mut o = OccurrenceOverride::new(published.id.clone(), cancelled_date);
        o.status = OverrideStatus::Cancelled;
        ctx.repos.event_overrides.upsert(&o).await.unwrap();

        let usecase = GetWeeklyDigestUseCase {
            date: None,
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(res.digest.is_empty());
    }

    #[actix_web::test]
    async fn explicit_date_selects_that_week() {
        let ctx = test_ctx("2026-08-23");
        let event = Event {
            title: "Showcase".into(),
            custom_dates: Some(vec!["2026-09-09".parse().unwrap()]),
            published: true,
            ..Default::default()
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let usecase = GetWeeklyDigestUseCase {
            date: Some("2026-09-07".parse().unwrap()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.week.start(), "2026-09-06".parse().unwrap());
        assert_eq!(res.digest.total_count, 1);
    }
}
