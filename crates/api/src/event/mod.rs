mod get_effective_occurrence;
mod get_event_occurrences;
mod resolve_series_date;

use actix_web::web;
use get_effective_occurrence::get_effective_occurrence_controller;
use get_event_occurrences::get_event_occurrences_controller;
use resolve_series_date::resolve_series_date_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/occurrences",
        web::get().to(get_event_occurrences_controller),
    );
    cfg.route(
        "/events/{event_id}/resolve-date",
        web::get().to(resolve_series_date_controller),
    );
    cfg.route(
        "/events/{event_id}/occurrences/{date}",
        web::get().to(get_effective_occurrence_controller),
    );
}
