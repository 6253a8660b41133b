use crate::error::SongcircleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use songcircle_api_structs::get_effective_occurrence::*;
use songcircle_api_structs::dtos::EffectiveOccurrenceDTO;
use songcircle_domain::{apply_override, DateKey, DateWindow, EffectiveOccurrence, Venue, ID};
use songcircle_infra::SongcircleContext;

fn handle_error(e: UseCaseErrors) -> SongcircleError {
    match e {
        UseCaseErrors::InvalidDate(raw) => {
            SongcircleError::BadClientData(format!("The provided date: {} is not a valid YYYY-MM-DD date.", raw))
        }
        UseCaseErrors::EventNotFound(event_id) => {
            SongcircleError::NotFound(format!("The event with id: {}, was not found.", event_id))
        }
        UseCaseErrors::NoOccurrence(date) => SongcircleError::NotFound(format!(
            "The event has no occurrence on: {}.",
            date
        )),
    }
}

pub async fn get_effective_occurrence_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<SongcircleContext>,
) -> Result<HttpResponse, SongcircleError> {
    let usecase = GetEffectiveOccurrenceUseCase {
        event_id: path_params.event_id.clone(),
        date: path_params.date.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                occurrence: EffectiveOccurrenceDTO::new(res.occurrence, res.venue),
            })
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetEffectiveOccurrenceUseCase {
    pub event_id: ID,
    pub date: String,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidDate(String),
    EventNotFound(ID),
    NoOccurrence(DateKey),
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub occurrence: EffectiveOccurrence,
    pub venue: Option<Venue>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEffectiveOccurrenceUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetEffectiveOccurrence";

    async fn execute(&mut self, ctx: &SongcircleContext) -> Result<Self::Response, Self::Errors> {
        let date = self
            .date
            .parse::<DateKey>()
            .map_err(|_| UseCaseErrors::InvalidDate(self.date.clone()))?;

        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::EventNotFound(self.event_id.clone())),
        };

        let window = DateWindow::new(date, date);
        let occurrence = event
            .expand(&window)
            .into_iter()
            .find(|o| o.date_key == date)
            .ok_or(UseCaseErrors::NoOccurrence(date))?;

        let overridden = ctx.repos.event_overrides.find(&self.event_id, date).await;
        let effective = apply_override(&event, &occurrence, overridden.as_ref());

        // The merged location may point at a different venue than the base
        // event does, so the venue is resolved after the merge.
        let venue = match effective.venue_id() {
            Some(venue_id) => ctx.repos.venues.find(venue_id).await,
            None => None,
        };

        Ok(UseCaseResponse {
            occurrence: effective,
            venue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songcircle_domain::{Event, OccurrenceOverride, OverrideStatus};
    use songcircle_infra::FixedSys;
    use std::sync::Arc;

    fn test_ctx() -> SongcircleContext {
        let mut ctx = SongcircleContext::create_inmemory();
        ctx.sys = Arc::new(FixedSys("2026-08-23".parse().unwrap()));
        ctx
    }

    fn weekly_event(venue_id: Option<ID>) -> Event {
        Event {
            title: "Open mic".into(),
            day_of_week: Some("Monday".into()),
            recurrence_rule: Some("weekly".into()),
            venue_id,
            published: true,
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn malformed_date_is_rejected() {
        let ctx = test_ctx();
        let usecase = GetEffectiveOccurrenceUseCase {
            event_id: ID::default(),
            date: "08/24/2026".into(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::InvalidDate(_))
        ));
    }

    #[actix_web::test]
    async fn date_off_the_schedule_is_not_found() {
        let ctx = test_ctx();
        let event = weekly_event(None);
        ctx.repos.events.insert(&event).await.unwrap();

        let usecase = GetEffectiveOccurrenceUseCase {
            event_id: event.id.clone(),
            // A Tuesday on a Monday schedule.
            date: "2026-08-25".into(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::NoOccurrence(_))
        ));
    }

    #[actix_web::test]
    async fn patched_venue_is_resolved_independently() {
        let ctx = test_ctx();
        let base_venue = Venue::new("Mercury Cafe");
        let patched_venue = Venue::new("Skylark Lounge");
        ctx.repos.venues.insert(&base_venue).await.unwrap();
        ctx.repos.venues.insert(&patched_venue).await.unwrap();

        let event = weekly_event(Some(base_venue.id.clone()));
        ctx.repos.events.insert(&event).await.unwrap();

        let date: DateKey = "2026-08-24".parse().unwrap();
        let mut o = OccurrenceOverride::new(event.id.clone(), date);
        o.patch.venue_id = Some(patched_venue.id.clone());
        ctx.repos.event_overrides.upsert(&o).await.unwrap();

        let usecase = GetEffectiveOccurrenceUseCase {
            event_id: event.id.clone(),
            date: "2026-08-24".into(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.venue.unwrap().id, patched_venue.id);
    }

    #[actix_web::test]
    async fn cancelled_occurrence_is_served_as_cancelled() {
        let ctx = test_ctx();
        let event = weekly_event(None);
        ctx.repos.events.insert(&event).await.unwrap();

        let date: DateKey = "2026-08-24".parse().unwrap();
        let mut o = OccurrenceOverride::new(event.id.clone(), date);
        o.status = OverrideStatus::Cancelled;
        ctx.repos.event_overrides.upsert(&o).await.unwrap();

        let usecase = GetEffectiveOccurrenceUseCase {
            event_id: event.id.clone(),
            date: "2026-08-24".into(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(res.occurrence.is_cancelled);
    }
}
