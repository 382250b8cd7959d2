use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::routes::{
    destination_route, excursion_route, payment_route, purchase_route, user_route, util_route,
};

pub fn main_route(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();
    cfg.service(web::scope("/util").configure(util_route))
        .service(web::scope("/user").configure(user_route))
        .service(web::scope("/destination").configure(destination_route))
        .service(web::scope("/excursion").configure(excursion_route))
        .service(web::scope("/purchase").configure(purchase_route))
        .service(web::scope("/payment").configure(payment_route))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()));
}
