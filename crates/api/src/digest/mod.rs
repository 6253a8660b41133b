pub mod deliver_digests;
mod get_weekly_digest;

use actix_web::web;
use deliver_digests::deliver_digests_controller;
use get_weekly_digest::get_weekly_digest_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/digest", web::get().to(get_weekly_digest_controller));
    cfg.route("/digest/deliveries", web::post().to(deliver_digests_controller));
}
