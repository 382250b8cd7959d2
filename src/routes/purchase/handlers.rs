use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::models::PurchaseDetailModel;
use super::schemas::{
    AdminPurchaseData, CheckoutData, CheckoutRequest, PurchaseData, PurchaseListFilter,
    UpdatePurchaseRequest,
};
use super::utils::{
    delete_purchase, fetch_purchase, fetch_purchase_for_user, fetch_purchases,
    fetch_purchases_for_user, initiate_checkout, update_purchase,
};
use crate::checkout_client::CheckoutClient;
use crate::configuration::CheckoutSettings;
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::{GenericResponse, Pagination};

#[utoipa::path(
    post,
    path = "/purchase/checkout",
    tag = "Purchase",
    description = "Creates a pending purchase and a hosted checkout session, returning the redirect URL.",
    request_body(content = CheckoutRequest, description = "Request Body"),
    responses(
        (status=200, description= "Checkout session created", body= GenericResponse<CheckoutData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=404, description= "Excursion not found", body= GenericResponse<TupleUnit>),
        (status=422, description= "Invalid booking parameters", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    name = "Initiate checkout API",
    skip(pool, checkout_client, checkout_settings),
    fields(user_id = %user.id, excursion_id = %body.excursion_id)
)]
pub async fn initiate_checkout_handler(
    body: CheckoutRequest,
    pool: web::Data<PgPool>,
    checkout_client: web::Data<CheckoutClient>,
    checkout_settings: web::Data<CheckoutSettings>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<CheckoutData>>, GenericError> {
    let data = initiate_checkout(&pool, &checkout_client, &checkout_settings, &user, body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created checkout session",
        Some(data),
    )))
}

#[utoipa::path(
    get,
    path = "/purchase/own",
    tag = "Purchase",
    description = "Lists the authenticated customer's purchases.",
    responses(
        (status=200, description= "Purchase list", body= GenericResponse<Vec<PurchaseData>>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "List own purchases API", skip(pool), fields(user_id = %user.id))]
pub async fn list_own_purchases(
    pool: web::Data<PgPool>,
    pagination: web::Query<Pagination>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Vec<PurchaseData>>>, GenericError> {
    // Customer listing degrades to an empty page when the store is down.
    let data = fetch_purchases_for_user(&pool, user.id, &pagination)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch purchases for user: {:?}", e);
            vec![]
        });
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched purchases",
        Some(
            data.into_iter()
                .map(PurchaseDetailModel::into_customer_schema)
                .collect(),
        ),
    )))
}

#[utoipa::path(
    get,
    path = "/purchase/own/{id}",
    tag = "Purchase",
    description = "Fetches one of the authenticated customer's purchases.",
    responses(
        (status=200, description= "Purchase", body= GenericResponse<PurchaseData>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Get own purchase API", skip(pool), fields(user_id = %user.id))]
pub async fn get_own_purchase(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<PurchaseData>>, GenericError> {
    let data = fetch_purchase_for_user(&pool, user.id, path.into_inner())
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch the purchase".to_string(), e))?
        .ok_or_else(|| GenericError::NotFoundError("Purchase not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched purchase",
        Some(data.into_customer_schema()),
    )))
}

#[utoipa::path(
    get,
    path = "/purchase",
    tag = "Purchase",
    description = "Lists all purchases with owner and excursion details (admin).",
    responses(
        (status=200, description= "Purchase list", body= GenericResponse<Vec<AdminPurchaseData>>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "List purchases API", skip(pool), fields(admin = %user.id))]
pub async fn list_purchases(
    pool: web::Data<PgPool>,
    filter: web::Query<PurchaseListFilter>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Vec<AdminPurchaseData>>>, GenericError> {
    let data = fetch_purchases(&pool, &filter)
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch purchases".to_string(), e))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched purchases",
        Some(
            data.into_iter()
                .map(PurchaseDetailModel::into_admin_schema)
                .collect(),
        ),
    )))
}

#[utoipa::path(
    get,
    path = "/purchase/{id}",
    tag = "Purchase",
    description = "Fetches a purchase with owner and excursion details (admin).",
    responses(
        (status=200, description= "Purchase", body= GenericResponse<AdminPurchaseData>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Get purchase API", skip(pool), fields(admin = %user.id))]
pub async fn get_purchase(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<AdminPurchaseData>>, GenericError> {
    let data = fetch_purchase(&pool, path.into_inner())
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch the purchase".to_string(), e))?
        .ok_or_else(|| GenericError::NotFoundError("Purchase not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched purchase",
        Some(data.into_admin_schema()),
    )))
}

#[utoipa::path(
    patch,
    path = "/purchase/{id}",
    tag = "Purchase",
    description = "Patches status, refund status and/or expiry of a purchase (admin). An empty patch succeeds without changes.",
    request_body(content = UpdatePurchaseRequest, description = "Request Body"),
    responses(
        (status=200, description= "Purchase updated", body= GenericResponse<AdminPurchaseData>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Update purchase API", skip(pool), fields(admin = %user.id))]
pub async fn update_purchase_handler(
    body: UpdatePurchaseRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<AdminPurchaseData>>, GenericError> {
    let data = update_purchase(&pool, path.into_inner(), body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated purchase",
        Some(data.into_admin_schema()),
    )))
}

#[utoipa::path(
    delete,
    path = "/purchase/{id}",
    tag = "Purchase",
    description = "Deletes a purchase that has no payments (admin).",
    responses(
        (status=200, description= "Purchase deleted", body= GenericResponse<TupleUnit>),
        (status=404, description= "Purchase not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Purchase has payments", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Delete purchase API", skip(pool), fields(admin = %user.id))]
pub async fn delete_purchase_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    delete_purchase(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully deleted purchase",
        Some(()),
    )))
}
