use actix_web::web;

use super::handlers::{
    delete_purchase_handler, get_own_purchase, get_purchase, initiate_checkout_handler,
    list_own_purchases, list_purchases, update_purchase_handler,
};
use crate::routes::user::schemas::UserRole;
use crate::routes::user::{RequireAuth, RoleValidation};

pub fn purchase_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/checkout")
            .route(web::post().to(initiate_checkout_handler).wrap(RequireAuth)),
    );
    cfg.service(web::resource("/own").route(web::get().to(list_own_purchases).wrap(RequireAuth)));
    cfg.service(
        web::resource("/own/{id}").route(web::get().to(get_own_purchase).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("").route(
            web::get()
                .to(list_purchases)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/{id}")
            .route(
                web::get()
                    .to(get_purchase)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            )
            .route(
                web::patch()
                    .to(update_purchase_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            )
            .route(
                web::delete()
                    .to(delete_purchase_handler)
                    .wrap(RoleValidation {
                        allowed_roles: vec![UserRole::Admin],
                    })
                    .wrap(RequireAuth),
            ),
    );
}
