use crate::error::SongcircleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use songcircle_api_structs::dtos::{EventDTO, OccurrenceDTO, ScheduleInterpretationDTO};
use songcircle_api_structs::get_event_occurrences::*;
use songcircle_domain::{DateKey, DateWindow, Event, Occurrence, ScheduleInterpretation, ID};
use songcircle_infra::SongcircleContext;

fn handle_error(e: UseCaseErrors) -> SongcircleError {
    match e {
        UseCaseErrors::NotFound(event_id) => {
            SongcircleError::NotFound(format!("The event with id: {}, was not found.", event_id))
        }
    }
}

pub async fn get_event_occurrences_controller(
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SongcircleContext>,
) -> Result<HttpResponse, SongcircleError> {
    let usecase = GetEventOccurrencesUseCase {
        event_id: path_params.event_id.clone(),
        start: query_params.start,
        end: query_params.end,
        today: ctx.sys.today(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                event: EventDTO::new(res.event),
                schedule: ScheduleInterpretationDTO::new(res.schedule),
                occurrences: res
                    .occurrences
                    .into_iter()
                    .map(OccurrenceDTO::new)
                    .collect(),
            })
        })
        .map_err(handle_error)
}

/// Clamps the requested window to the configured horizon. Missing bounds
/// default to today and today plus the horizon.
fn capped_window(
    start: Option<DateKey>,
    end: Option<DateKey>,
    today: DateKey,
    horizon_days: i64,
) -> DateWindow {
    let start = start.unwrap_or(today);
    let latest = start.add_days(horizon_days);
    let end = match end {
        Some(end) if end <= latest => end,
        _ => latest,
    };
    DateWindow::new(start, end)
}

#[derive(Debug)]
pub struct GetEventOccurrencesUseCase {
    pub event_id: ID,
    pub start: Option<DateKey>,
    pub end: Option<DateKey>,
    pub today: DateKey,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub event: Event,
    pub schedule: ScheduleInterpretation,
    pub occurrences: Vec<Occurrence>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventOccurrencesUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetEventOccurrences";

    async fn execute(&mut self, ctx: &SongcircleContext) -> Result<Self::Response, Self::Errors> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::NotFound(self.event_id.clone())),
        };

        let window = capped_window(
            self.start,
            self.end,
            self.today,
            ctx.config.schedule_horizon_days,
        );
        let schedule = event.interpretation();
        let occurrences = event.expand(&window);

        Ok(UseCaseResponse {
            event,
            schedule,
            occurrences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songcircle_infra::FixedSys;
    use std::sync::Arc;

    fn test_ctx(today: &str) -> SongcircleContext {
        let mut ctx = SongcircleContext::create_inmemory();
        ctx.sys = Arc::new(FixedSys(today.parse().unwrap()));
        ctx
    }

    fn weekly_event() -> Event {
        Event {
            title: "Open mic".into(),
            day_of_week: Some("Tuesday".into()),
            recurrence_rule: Some("weekly".into()),
            published: true,
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn unknown_event_is_not_found() {
        let ctx = test_ctx("2026-08-23");
        let usecase = GetEventOccurrencesUseCase {
            event_id: ID::default(),
            start: None,
            end: None,
            today: ctx.sys.today(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn expands_weekly_event_over_default_window() {
        let ctx = test_ctx("2026-08-23");
        let event = weekly_event();
        ctx.repos.events.insert(&event).await.unwrap();

        let usecase = GetEventOccurrencesUseCase {
            event_id: event.id.clone(),
            start: None,
            end: None,
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(res.schedule.is_recurring);
        assert!(res.schedule.is_confident);
        // 2026-08-23 is a Sunday, so the first Tuesday is the 25th.
        assert_eq!(res.occurrences[0].date_key, "2026-08-25".parse().unwrap());
        // 90 day horizon covers 13 Tuesdays.
        assert_eq!(res.occurrences.len(), 13);
    }

    #[actix_web::test]
    async fn client_window_is_clamped_to_horizon() {
        let ctx = test_ctx("2026-08-23");
        let event = weekly_event();
        ctx.repos.events.insert(&event).await.unwrap();

        let usecase = GetEventOccurrencesUseCase {
            event_id: event.id.clone(),
            start: Some("2026-09-01".parse().unwrap()),
            end: Some("2036-09-01".parse().unwrap()),
            today: ctx.sys.today(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        let last = res.occurrences.last().unwrap();
        assert!(last.date_key <= "2026-11-30".parse().unwrap());
    }
}
