use actix_web::web;

use super::handlers::{
    approve_payment_handler, create_manual_payment_handler, delete_payment_handler, list_payments,
    payment_notification, refund_payment_handler,
};
use crate::routes::user::schemas::UserRole;
use crate::routes::user::{RequireAuth, RoleValidation};

pub fn payment_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/notification").route(web::post().to(payment_notification)));
    cfg.service(
        web::resource("/purchase/{purchase_id}").route(
            web::get()
                .to(list_payments)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/manual").route(
            web::post()
                .to(create_manual_payment_handler)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/{id}/approve").route(
            web::post()
                .to(approve_payment_handler)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/{id}/refund").route(
            web::post()
                .to(refund_payment_handler)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/{id}").route(
            web::delete()
                .to(delete_payment_handler)
                .wrap(RoleValidation {
                    allowed_roles: vec![UserRole::Admin],
                })
                .wrap(RequireAuth),
        ),
    );
}
