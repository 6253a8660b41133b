use crate::error::SongcircleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use songcircle_api_structs::resolve_series_date::*;
use songcircle_domain::{DateKey, DateWindow, ID};
use songcircle_infra::SongcircleContext;

fn handle_error(e: UseCaseErrors) -> SongcircleError {
    match e {
        UseCaseErrors::NotFound(event_id) => {
            SongcircleError::NotFound(format!("The event with id: {}, was not found.", event_id))
        }
    }
}

pub async fn resolve_series_date_controller(
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SongcircleContext>,
) -> Result<HttpResponse, SongcircleError> {
    let usecase = ResolveSeriesDateUseCase {
        event_id: path_params.event_id.clone(),
        requested_date: query_params.date.clone(),
        today: ctx.sys.today(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                event_id: res.event_id,
                requested_date: res.requested_date,
                resolved_date: res.resolved_date,
                redirected: res.redirected,
                advisory: res.advisory,
            })
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct ResolveSeriesDateUseCase {
    pub event_id: ID,
    pub requested_date: Option<String>,
    pub today: DateKey,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub event_id: ID,
    pub requested_date: Option<String>,
    pub resolved_date: Option<DateKey>,
    pub redirected: bool,
    pub advisory: Option<String>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ResolveSeriesDateUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "ResolveSeriesDate";

    // A malformed or off-schedule date never fails the request. It falls
    // back to the first upcoming occurrence and reports the redirect.
    async fn execute(&mut self, ctx: &SongcircleContext) -> Result<Self::Response, Self::Errors> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::NotFound(self.event_id.clone())),
        };

        let window = DateWindow::new(
            self.today,
            self.today.add_days(ctx.config.schedule_horizon_days),
        );
        let occurrences = event.expand(&window);

        let requested = self
            .requested_date
            .as_deref()
            .and_then(|raw| raw.parse::<DateKey>().ok());

        let response = |resolved_date, redirected, advisory| UseCaseResponse {
            event_id: self.event_id.clone(),
            requested_date: self.requested_date.clone(),
            resolved_date,
            redirected,
            advisory,
        };

        if let Some(date) = requested {
            if occurrences.iter().any(|o| o.date_key == date) {
                return Ok(response(Some(date), false, None));
            }
        }

        let fallback = occurrences.first().map(|o| o.date_key);
        let redirected = self.requested_date.is_some() && fallback.is_some();
        let advisory = match (&self.requested_date, fallback) {
            (Some(raw), Some(_)) => Some(format!(
                "{} is not on this event's schedule, showing the next upcoming date instead.",
                raw
            )),
            (_, None) => Some("This event has no upcoming dates.".into()),
            (None, Some(_)) => None,
        };

        Ok(response(fallback, redirected, advisory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songcircle_domain::Event;
    use songcircle_infra::FixedSys;
    use std::sync::Arc;

    fn test_ctx(today: &str) -> SongcircleContext {
        let mut ctx = SongcircleContext::create_inmemory();
        ctx.sys = Arc::new(FixedSys(today.parse().unwrap()));
        ctx
    }

    async fn seeded_ctx(today: &str) -> (SongcircleContext, Event) {
        let ctx = test_ctx(today);
        let event = Event {
            title: "Songwriter round".into(),
            day_of_week: Some("Thursday".into()),
            recurrence_rule: Some("weekly".into()),
            published: true,
            ..Default::default()
        };
        ctx.repos.events.insert(&event).await.unwrap();
        (ctx, event)
    }

    #[actix_web::test]
    async fn valid_scheduled_date_resolves_without_redirect() {
        let (ctx, event) = seeded_ctx("2026-08-23").await;
        let usecase = ResolveSeriesDateUseCase {
            event_id: event.id.clone(),
            // 2026-08-27 is a Thursday.
            requested_date: Some("2026-08-27".into()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.resolved_date, Some("2026-08-27".parse().unwrap()));
        assert!(!res.redirected);
        assert!(res.advisory.is_none());
    }

    #[actix_web::test]
    async fn off_schedule_date_falls_back_with_advisory() {
        let (ctx, event) = seeded_ctx("2026-08-23").await;
        let usecase = ResolveSeriesDateUseCase {
            event_id: event.id.clone(),
            // A Friday, never on the Thursday schedule.
            requested_date: Some("2026-08-28".into()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.resolved_date, Some("2026-08-27".parse().unwrap()));
        assert!(res.redirected);
        assert!(res.advisory.is_some());
    }

    #[actix_web::test]
    async fn malformed_date_falls_back_instead_of_failing() {
        let (ctx, event) = seeded_ctx("2026-08-23").await;
        let usecase = ResolveSeriesDateUseCase {
            event_id: event.id.clone(),
            requested_date: Some("not-a-date".into()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.resolved_date, Some("2026-08-27".parse().unwrap()));
        assert!(res.redirected);
    }

    #[actix_web::test]
    async fn event_without_upcoming_dates_reports_advisory() {
        let ctx = test_ctx("2026-08-23");
        let event = Event {
            title: "One off".into(),
            custom_dates: Some(vec!["2026-01-10".parse().unwrap()]),
            published: true,
            ..Default::default()
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let usecase = ResolveSeriesDateUseCase {
            event_id: event.id.clone(),
            requested_date: Some("2026-01-10".into()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.resolved_date, None);
        assert!(!res.redirected);
        assert!(res.advisory.is_some());
    }
}
