use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    CreateExcursionRequest, ExcursionData, ExcursionListFilter, UpdateExcursionRequest,
};
use super::utils::{
    create_excursion, deactivate_excursion, fetch_excursion, fetch_excursions, update_excursion,
};
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    get,
    path = "/excursion",
    tag = "Excursion",
    description = "Lists active excursions, optionally filtered by destination.",
    responses(
        (status=200, description= "Excursion list", body= GenericResponse<Vec<ExcursionData>>),
    )
)]
#[tracing::instrument(name = "List excursions", skip(pool))]
pub async fn list_excursions(
    pool: web::Data<PgPool>,
    filter: web::Query<ExcursionListFilter>,
) -> Result<web::Json<GenericResponse<Vec<ExcursionData>>>, GenericError> {
    // Catalog listing degrades to an empty page when the store is down.
    let data = fetch_excursions(&pool, &filter, false)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch excursions: {:?}", e);
            vec![]
        });
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched excursions",
        Some(data),
    )))
}

#[utoipa::path(
    get,
    path = "/excursion/{id}",
    tag = "Excursion",
    description = "Fetches a single excursion.",
    responses(
        (status=200, description= "Excursion", body= GenericResponse<ExcursionData>),
        (status=404, description= "Excursion not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Get excursion", skip(pool))]
pub async fn get_excursion(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<web::Json<GenericResponse<ExcursionData>>, GenericError> {
    let data = fetch_excursion(&pool, path.into_inner())
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch the excursion".to_string(), e))?
        .ok_or_else(|| GenericError::NotFoundError("Excursion not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched excursion",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/excursion",
    tag = "Excursion",
    description = "Creates an excursion (admin).",
    request_body(content = CreateExcursionRequest, description = "Request Body"),
    responses(
        (status=200, description= "Excursion created", body= GenericResponse<ExcursionData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Create excursion API", skip(pool), fields(admin = %user.id))]
pub async fn create_excursion_handler(
    body: CreateExcursionRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<ExcursionData>>, GenericError> {
    let data = create_excursion(&pool, body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created excursion",
        Some(data),
    )))
}

#[utoipa::path(
    patch,
    path = "/excursion/{id}",
    tag = "Excursion",
    description = "Updates an excursion (admin). Price changes do not touch existing purchases.",
    request_body(content = UpdateExcursionRequest, description = "Request Body"),
    responses(
        (status=200, description= "Excursion updated", body= GenericResponse<ExcursionData>),
        (status=404, description= "Excursion not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Update excursion API", skip(pool), fields(admin = %user.id))]
pub async fn update_excursion_handler(
    body: UpdateExcursionRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<ExcursionData>>, GenericError> {
    let data = update_excursion(&pool, path.into_inner(), body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated excursion",
        Some(data),
    )))
}

#[utoipa::path(
    delete,
    path = "/excursion/{id}",
    tag = "Excursion",
    description = "Removes an excursion from the catalog (admin). The row is kept for referencing purchases.",
    responses(
        (status=200, description= "Excursion removed", body= GenericResponse<TupleUnit>),
        (status=404, description= "Excursion not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Deactivate excursion API", skip(pool), fields(admin = %user.id))]
pub async fn deactivate_excursion_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    deactivate_excursion(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully removed excursion",
        Some(()),
    )))
}
