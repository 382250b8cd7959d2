use actix_web::web;

use super::handlers::{
    create_excursion_handler, deactivate_excursion_handler, get_excursion, list_excursions,
    update_excursion_handler,
};
use crate::routes::user::schemas::UserRole;
use crate::routes::user::{RequireAuth, RoleValidation};

pub fn excursion_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_excursions))
            .route(
                web::post()
                    .to(create_excursion_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            ),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_excursion))
            .route(
                web::patch()
                    .to(update_excursion_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            )
            .route(
                web::delete()
                    .to(deactivate_excursion_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            ),
    );
}
