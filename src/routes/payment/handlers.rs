use actix_web::{web, HttpRequest};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use subtle::ConstantTimeEq;
use utoipa::TupleUnit;

use super::schemas::{CreateManualPaymentRequest, PaymentData, PaymentNotificationRequest};
use super::utils::{
    approve_payment, create_manual_payment, delete_payment, fetch_payments_for_purchase,
    mark_payment_refunded, record_gateway_payment,
};
use crate::configuration::CheckoutSettings;
use crate::constants::CHECKOUT_SIGNATURE_HEADER;
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

fn require_webhook_secret(
    req: &HttpRequest,
    checkout_settings: &CheckoutSettings,
) -> Result<(), GenericError> {
    let expected = checkout_settings.webhook_secret.expose_secret();
    let provided = req
        .headers()
        .get(CHECKOUT_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");
    if provided.is_empty() || provided.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() != 1 {
        return Err(GenericError::UnauthenticatedError(
            "Invalid webhook signature".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/payment/purchase/{purchase_id}",
    tag = "Payment",
    description = "Lists all payments recorded against a purchase (admin).",
    responses(
        (status=200, description= "Payment list", body= GenericResponse<Vec<PaymentData>>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "List payments API", skip(pool), fields(admin = %user.id))]
pub async fn list_payments(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Vec<PaymentData>>>, GenericError> {
    let data = fetch_payments_for_purchase(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched payments",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/manual",
    tag = "Payment",
    description = "Records an administrator-entered payment and moves the purchase balance.",
    request_body(content = CreateManualPaymentRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment recorded", body= GenericResponse<PaymentData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
        (status=422, description= "Non-positive amount", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Create manual payment API", skip(pool), fields(admin = %user.id, purchase_id = %body.purchase_id))]
pub async fn create_manual_payment_handler(
    body: CreateManualPaymentRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    let data = create_manual_payment(&pool, body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully recorded payment",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/{id}/approve",
    tag = "Payment",
    description = "Approves a pending payment and moves the purchase balance.",
    responses(
        (status=200, description= "Payment approved", body= GenericResponse<PaymentData>),
        (status=404, description= "Payment not found", body= GenericResponse<TupleUnit>),
        (status=422, description= "Payment is not pending", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Approve payment API", skip(pool), fields(admin = %user.id))]
pub async fn approve_payment_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    let data = approve_payment(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully approved payment",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/{id}/refund",
    tag = "Payment",
    description = "Marks a payment as refunded. The purchase running total is not decremented.",
    responses(
        (status=200, description= "Payment marked refunded", body= GenericResponse<PaymentData>),
        (status=404, description= "Payment not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Refund payment API", skip(pool), fields(admin = %user.id))]
pub async fn refund_payment_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    let data = mark_payment_refunded(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully marked payment as refunded",
        Some(data),
    )))
}

#[utoipa::path(
    delete,
    path = "/payment/{id}",
    tag = "Payment",
    description = "Deletes a pending payment.",
    responses(
        (status=200, description= "Payment deleted", body= GenericResponse<TupleUnit>),
        (status=404, description= "Payment not found", body= GenericResponse<TupleUnit>),
        (status=422, description= "Payment is not pending", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Delete payment API", skip(pool), fields(admin = %user.id))]
pub async fn delete_payment_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    delete_payment(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully deleted payment",
        Some(()),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/notification",
    tag = "Payment",
    description = "Gateway webhook: materializes a checkout outcome as a payment row.",
    request_body(content = PaymentNotificationRequest, description = "Request Body"),
    responses(
        (status=200, description= "Notification processed", body= GenericResponse<PaymentData>),
        (status=401, description= "Invalid webhook signature", body= GenericResponse<TupleUnit>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    name = "Payment notification API",
    skip(pool, req, checkout_settings),
    fields(purchase_id = %body.purchase_id, session_id = %body.session_id)
)]
pub async fn payment_notification(
    body: PaymentNotificationRequest,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    checkout_settings: web::Data<CheckoutSettings>,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    require_webhook_secret(&req, &checkout_settings)?;
    let data = record_gateway_payment(&pool, body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully processed payment notification",
        Some(data),
    )))
}
