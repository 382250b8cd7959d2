use actix_web::web;

use super::views::health_check;

pub fn util_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health_check").route(web::get().to(health_check)));
}
