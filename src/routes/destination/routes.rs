use actix_web::web;

use super::handlers::{
    create_destination_handler, deactivate_destination_handler, get_destination,
    list_destinations, update_destination_handler,
};
use crate::routes::user::schemas::UserRole;
use crate::routes::user::{RequireAuth, RoleValidation};

pub fn destination_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_destinations))
            .route(
                web::post()
                    .to(create_destination_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            ),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_destination))
            .route(
                web::patch()
                    .to(update_destination_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            )
            .route(
                web::delete()
                    .to(deactivate_destination_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            ),
    );
}
